use ferrous_forward_domain::wire::{
    decode_header, decode_message, encode_header, encode_message, Flags, Header, Opcode,
    ResponseCode, HEADER_LEN,
};
use ferrous_forward_domain::{DomainError, Message, ResourceRecord};
use std::net::Ipv4Addr;

mod helpers;
use helpers::MessageBuilder;

#[test]
fn test_flags_0x8000_is_a_plain_response() {
    let flags = Flags::from_u16(0x8000);

    assert!(flags.qr);
    assert_eq!(flags.opcode, Opcode::Query);
    assert!(!flags.aa);
    assert!(!flags.tc);
    assert!(!flags.rd);
    assert!(!flags.ra);
    assert_eq!(flags.z, 0);
    assert_eq!(flags.rcode, ResponseCode::NoError);
    assert_eq!(flags.to_u16(), 0x8000);
}

#[test]
fn test_every_flag_bit() {
    let flags = Flags {
        qr: true,
        opcode: Opcode::Status,
        aa: true,
        tc: true,
        rd: true,
        ra: true,
        z: 0b101,
        rcode: ResponseCode::NxDomain,
    };

    // 1 0010 1 1 1 1 101 0011
    assert_eq!(flags.to_u16(), 0b1001_0111_1101_0011);
    assert_eq!(Flags::from_u16(flags.to_u16()), flags);
}

#[test]
fn test_header_is_big_endian() {
    let header = Header {
        id: 0x04D2,
        flags: Flags::from_u16(0x0100),
        question_count: 1,
        answer_count: 2,
        authority_count: 3,
        additional_count: 4,
    };

    let bytes = encode_header(&header);
    assert_eq!(
        bytes,
        [0x04, 0xD2, 0x01, 0x00, 0x00, 0x01, 0x00, 0x02, 0x00, 0x03, 0x00, 0x04]
    );
    assert_eq!(decode_header(&bytes).unwrap(), header);
}

#[test]
fn test_short_header_is_truncated() {
    let err = decode_header(&[0x04, 0xD2, 0x01]).unwrap_err();
    assert_eq!(
        err,
        DomainError::TruncatedMessage {
            needed: HEADER_LEN,
            available: 3
        }
    );

    let err = decode_message(&[]).unwrap_err();
    assert!(matches!(err, DomainError::TruncatedMessage { .. }));
}

#[test]
fn test_message_roundtrip() {
    let messages = vec![
        MessageBuilder::query(1234).question("codecrafters.io").build(),
        MessageBuilder::query(7)
            .question("example.com")
            .question("example.org")
            .question("EXAMPLE.net")
            .build(),
        MessageBuilder::response(0xFFFF)
            .question("example.com")
            .answer("example.com", [93, 184, 216, 34])
            .answer("example.com", [93, 184, 216, 35])
            .build(),
        MessageBuilder::response(42)
            .question("txt.example")
            .record(ResourceRecord {
                name: "txt.example".to_string(),
                record_type: 16,
                class: 1,
                ttl: 0,
                data: b"\x05hello".to_vec(),
            })
            .build(),
        MessageBuilder::response(9).build(),
    ];

    for message in messages {
        let bytes = message.encode().unwrap();
        let decoded = Message::decode(&bytes).unwrap();
        assert_eq!(decoded, message);
    }
}

#[test]
fn test_trailing_sections_are_passed_through() {
    let mut message = MessageBuilder::response(5)
        .question("example.com")
        .answer("example.com", [1, 2, 3, 4])
        .build();
    message.header.additional_count = 1;
    // OPT pseudo-record
    message.trailing_sections = vec![0x00, 0x00, 0x29, 0x10, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];

    let bytes = message.encode().unwrap();
    let decoded = decode_message(&bytes).unwrap();

    assert_eq!(decoded.header.additional_count, 1);
    assert_eq!(decoded.trailing_sections, message.trailing_sections);
    assert_eq!(decoded, message);
}

#[test]
fn test_encode_message_checks_answer_count() {
    let message = MessageBuilder::response(1)
        .question("example.com")
        .answer("example.com", [1, 1, 1, 1])
        .build();
    let mut header = message.header;
    header.answer_count = 0;

    let err = encode_message(&header, &message.questions, &message.answers).unwrap_err();
    assert!(matches!(err, DomainError::Encoding(_)));
}

#[test]
fn test_compressed_question_shares_suffix() {
    let header = Header {
        question_count: 2,
        ..Header::new(0x04D2, Flags::default())
    };
    let mut buf = encode_header(&header).to_vec();

    // Question 1 at offset 12: mail.example.com A IN
    buf.push(4);
    buf.extend_from_slice(b"mail");
    let example_at = buf.len() as u8;
    buf.push(7);
    buf.extend_from_slice(b"example");
    buf.push(3);
    buf.extend_from_slice(b"com");
    buf.push(0);
    buf.extend_from_slice(&[0x00, 0x01, 0x00, 0x01]);

    // Question 2: www + pointer to "example.com"
    buf.push(3);
    buf.extend_from_slice(b"www");
    buf.extend_from_slice(&[0xC0, example_at]);
    buf.extend_from_slice(&[0x00, 0x01, 0x00, 0x01]);

    let message = decode_message(&buf).unwrap();
    assert_eq!(message.questions.len(), 2);
    assert_eq!(message.questions[0].name, "mail.example.com");
    assert_eq!(message.questions[1].name, "www.example.com");
    assert!(message.questions[0].name.ends_with("example.com"));
    assert!(message.questions[1].name.ends_with("example.com"));
    assert_eq!(message.questions[1].query_type, 1);
    assert_eq!(message.questions[1].query_class, 1);
    assert!(message.trailing_sections.is_empty());
}

#[test]
fn test_compressed_answer_name() {
    let query = MessageBuilder::query(3).question("example.com").build();
    let mut buf = query.encode().unwrap();
    buf[7] = 1; // ANCOUNT = 1
    buf[2] |= 0x80;

    buf.extend_from_slice(&[0xC0, 0x0C]);
    buf.extend_from_slice(&[0x00, 0x01, 0x00, 0x01]);
    buf.extend_from_slice(&60u32.to_be_bytes());
    buf.extend_from_slice(&[0x00, 0x04, 10, 0, 0, 1]);

    let message = decode_message(&buf).unwrap();
    assert_eq!(message.answers.len(), 1);
    assert_eq!(message.answers[0].name, "example.com");
    assert_eq!(message.answers[0].ttl, 60);
    assert_eq!(message.answers[0].ipv4(), Some(Ipv4Addr::new(10, 0, 0, 1)));
}

#[test]
fn test_declared_questions_missing() {
    let mut bytes = MessageBuilder::query(1).question("example.com").build().encode().unwrap();
    bytes[5] = 2; // QDCOUNT = 2, only one present

    let err = decode_message(&bytes).unwrap_err();
    assert!(matches!(err, DomainError::MalformedMessage(_)), "{:?}", err);
}

#[test]
fn test_declared_answers_missing() {
    let mut bytes = MessageBuilder::response(1).question("example.com").build().encode().unwrap();
    bytes[7] = 1; // ANCOUNT = 1, none present

    let err = decode_message(&bytes).unwrap_err();
    assert!(matches!(err, DomainError::MalformedMessage(_)), "{:?}", err);
}

#[test]
fn test_question_cut_inside_type_field() {
    let bytes = MessageBuilder::query(1).question("example.com").build().encode().unwrap();
    let cut = &bytes[..bytes.len() - 3];

    let err = decode_message(cut).unwrap_err();
    assert!(err.is_wire_format());
}

#[test]
fn test_self_pointing_question_fails() {
    let header = Header {
        question_count: 1,
        ..Header::new(1, Flags::default())
    };
    let mut buf = encode_header(&header).to_vec();
    buf.extend_from_slice(&[0xC0, 0x0C, 0x00, 0x01, 0x00, 0x01]);

    let err = decode_message(&buf).unwrap_err();
    assert!(matches!(err, DomainError::MalformedName(_)));
}
