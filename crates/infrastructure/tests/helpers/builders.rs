#![allow(dead_code)]
use ferrous_forward_domain::wire::CLASS_IN;
use ferrous_forward_domain::{Flags, Header, Message, Question, RecordType};

/// Standard recursive query for the A records of `names`.
pub fn query_bytes(id: u16, names: &[&str]) -> Vec<u8> {
    let flags = Flags {
        rd: true,
        ..Flags::default()
    };
    Message {
        header: Header {
            question_count: names.len() as u16,
            ..Header::new(id, flags)
        },
        questions: names
            .iter()
            .map(|name| Question::new(*name, RecordType::A.to_u16(), CLASS_IN))
            .collect(),
        answers: vec![],
        trailing_sections: vec![],
    }
    .encode()
    .unwrap()
}
