use super::name::{decode_name, write_name};
use super::WireReader;
use crate::DomainError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Question {
    pub name: String,
    pub query_type: u16,
    pub query_class: u16,
}

impl Question {
    pub fn new(name: impl Into<String>, query_type: u16, query_class: u16) -> Self {
        Self {
            name: name.into(),
            query_type,
            query_class,
        }
    }

    /// Same name (ASCII case-insensitive), type and class.
    pub fn matches(&self, other: &Question) -> bool {
        self.query_type == other.query_type
            && self.query_class == other.query_class
            && self.name.eq_ignore_ascii_case(&other.name)
    }
}

pub fn encode_question(question: &Question, out: &mut Vec<u8>) -> Result<(), DomainError> {
    write_name(&question.name, out)?;
    out.extend_from_slice(&question.query_type.to_be_bytes());
    out.extend_from_slice(&question.query_class.to_be_bytes());
    Ok(())
}

/// Decodes one question at `offset`, returning it with the offset that follows.
pub fn decode_question(buf: &[u8], offset: usize) -> Result<(Question, usize), DomainError> {
    let mut reader = WireReader::at(buf, offset);
    let question = read_question(&mut reader)?;
    Ok((question, reader.position()))
}

pub(crate) fn read_question(reader: &mut WireReader<'_>) -> Result<Question, DomainError> {
    let (name, next) = decode_name(reader.buffer(), reader.position())?;
    reader.seek(next);
    let query_type = reader.read_u16()?;
    let query_class = reader.read_u16()?;
    Ok(Question {
        name,
        query_type,
        query_class,
    })
}
