#![allow(dead_code)]
use ferrous_forward_domain::wire::CLASS_IN;
use ferrous_forward_domain::{
    Flags, Header, Message, Opcode, Question, RecordType, ResourceRecord, ResponseCode,
};
use std::net::Ipv4Addr;

pub struct MessageBuilder {
    id: u16,
    flags: Flags,
    questions: Vec<Question>,
    answers: Vec<ResourceRecord>,
}

impl MessageBuilder {
    pub fn query(id: u16) -> Self {
        Self {
            id,
            flags: Flags {
                rd: true,
                ..Flags::default()
            },
            questions: vec![],
            answers: vec![],
        }
    }

    pub fn opcode(mut self, opcode: Opcode) -> Self {
        self.flags.opcode = opcode;
        self
    }

    pub fn response(mut self) -> Self {
        self.flags.qr = true;
        self
    }

    pub fn question(mut self, name: &str) -> Self {
        self.questions
            .push(Question::new(name, RecordType::A.to_u16(), CLASS_IN));
        self
    }

    pub fn build(self) -> Message {
        Message {
            header: Header {
                question_count: self.questions.len() as u16,
                answer_count: self.answers.len() as u16,
                ..Header::new(self.id, self.flags)
            },
            questions: self.questions,
            answers: self.answers,
            trailing_sections: vec![],
        }
    }

    pub fn bytes(self) -> Vec<u8> {
        self.build().encode().unwrap()
    }
}

/// Upstream answer to `query`: same ID and question, one A record per
/// address, RA set.
pub fn upstream_reply(query: &[u8], rcode: ResponseCode, addresses: &[[u8; 4]]) -> Vec<u8> {
    let query = Message::decode(query).unwrap();
    let name = query.questions[0].name.clone();
    let answers: Vec<ResourceRecord> = addresses
        .iter()
        .map(|octets| ResourceRecord::address(&name, 60, Ipv4Addr::from(*octets)))
        .collect();

    Message {
        header: Header {
            question_count: query.questions.len() as u16,
            answer_count: answers.len() as u16,
            ..Header::new(
                query.header.id,
                Flags {
                    qr: true,
                    ra: true,
                    rcode,
                    ..query.header.flags
                },
            )
        },
        questions: query.questions,
        answers,
        trailing_sections: vec![],
    }
    .encode()
    .unwrap()
}
