use super::header::{decode_header, encode_header, Header, HEADER_LEN};
use super::question::{encode_question, read_question, Question};
use super::record::{encode_record, read_record, ResourceRecord};
use super::WireReader;
use crate::DomainError;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Message {
    pub header: Header,
    pub questions: Vec<Question>,
    pub answers: Vec<ResourceRecord>,
    /// Authority and additional sections, kept as the raw bytes that follow
    /// the answer section.
    pub trailing_sections: Vec<u8>,
}

impl Message {
    pub fn decode(buf: &[u8]) -> Result<Self, DomainError> {
        decode_message(buf)
    }

    /// Encodes header, questions and answers, then re-emits the trailing
    /// sections verbatim.
    pub fn encode(&self) -> Result<Vec<u8>, DomainError> {
        let mut out = encode_message(&self.header, &self.questions, &self.answers)?;
        out.extend_from_slice(&self.trailing_sections);
        Ok(out)
    }
}

/// Concatenates header, questions and answers.
///
/// Section counts are taken from `header` as given; a count that disagrees with
/// the number of entries supplied is an error, never patched.
pub fn encode_message(
    header: &Header,
    questions: &[Question],
    answers: &[ResourceRecord],
) -> Result<Vec<u8>, DomainError> {
    if usize::from(header.question_count) != questions.len() {
        return Err(DomainError::Encoding(format!(
            "header declares {} questions, {} supplied",
            header.question_count,
            questions.len()
        )));
    }
    if usize::from(header.answer_count) != answers.len() {
        return Err(DomainError::Encoding(format!(
            "header declares {} answers, {} supplied",
            header.answer_count,
            answers.len()
        )));
    }

    let mut out = Vec::with_capacity(512);
    out.extend_from_slice(&encode_header(header));
    for question in questions {
        encode_question(question, &mut out)?;
    }
    for answer in answers {
        encode_record(answer, &mut out)?;
    }
    Ok(out)
}

/// Decodes the header, exactly `question_count` questions and exactly
/// `answer_count` answers. Whatever follows is kept undecoded.
pub fn decode_message(buf: &[u8]) -> Result<Message, DomainError> {
    let header = decode_header(buf)?;
    let mut reader = WireReader::at(buf, HEADER_LEN);

    let mut questions = Vec::with_capacity(usize::from(header.question_count).min(16));
    for index in 0..header.question_count {
        ensure_entry_available(&reader, "question", index, header.question_count)?;
        questions.push(read_question(&mut reader)?);
    }

    let mut answers = Vec::with_capacity(usize::from(header.answer_count).min(32));
    for index in 0..header.answer_count {
        ensure_entry_available(&reader, "answer", index, header.answer_count)?;
        answers.push(read_record(&mut reader)?);
    }

    Ok(Message {
        header,
        questions,
        answers,
        trailing_sections: reader.rest().to_vec(),
    })
}

fn ensure_entry_available(
    reader: &WireReader<'_>,
    section: &str,
    index: u16,
    declared: u16,
) -> Result<(), DomainError> {
    if reader.remaining() == 0 {
        return Err(DomainError::MalformedMessage(format!(
            "header declares {} {} entries, message ends after {}",
            declared, section, index
        )));
    }
    Ok(())
}
