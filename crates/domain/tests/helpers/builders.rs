#![allow(dead_code)]
use ferrous_forward_domain::wire::CLASS_IN;
use ferrous_forward_domain::{Flags, Header, Message, Question, RecordType, ResourceRecord};
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

    pub fn response(id: u16) -> Self {
        Self {
            id,
            flags: Flags {
                qr: true,
                rd: true,
                ra: true,
                ..Flags::default()
            },
            questions: vec![],
            answers: vec![],
        }
    }

    pub fn flags(mut self, flags: Flags) -> Self {
        self.flags = flags;
        self
    }

    pub fn question(mut self, name: &str) -> Self {
        self.questions
            .push(Question::new(name, RecordType::A.to_u16(), CLASS_IN));
        self
    }

    pub fn question_of_type(mut self, name: &str, record_type: RecordType) -> Self {
        self.questions
            .push(Question::new(name, record_type.to_u16(), CLASS_IN));
        self
    }

    pub fn answer(mut self, name: &str, address: [u8; 4]) -> Self {
        self.answers
            .push(ResourceRecord::address(name, 300, Ipv4Addr::from(address)));
        self
    }

    pub fn record(mut self, record: ResourceRecord) -> Self {
        self.answers.push(record);
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
}
