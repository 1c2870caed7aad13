use super::group::{ForwardGroup, ForwardOutcome};
use ferrous_forward_domain::wire::{encode_message, rewrite_id};
use ferrous_forward_domain::{DomainError, Flags, Header, Opcode, Question, ResponseCode};

/// Response carrying no answers, echoing `questions` when they encode.
///
/// Never fails: a question set that cannot be re-encoded yields a bare
/// header with zero counts.
pub fn error_reply(
    id: u16,
    opcode: Opcode,
    recursion_desired: bool,
    questions: &[Question],
    rcode: ResponseCode,
) -> Vec<u8> {
    let flags = Flags {
        qr: true,
        opcode,
        rd: recursion_desired,
        rcode,
        ..Flags::default()
    };
    let mut header = Header::new(id, flags);

    if let Ok(count) = u16::try_from(questions.len()) {
        header.question_count = count;
        if let Ok(bytes) = encode_message(&header, questions, &[]) {
            return bytes;
        }
    }

    header.question_count = 0;
    encode_message(&header, &[], &[]).unwrap_or_default()
}

/// Reply bytes for a group whose members all resolved successfully or not.
///
/// `outcomes` follows question order.
pub fn assemble(
    group: &ForwardGroup,
    outcomes: &[&ForwardOutcome],
) -> Result<(Vec<u8>, ResponseCode), DomainError> {
    if let [ForwardOutcome::Relayed { raw }] = outcomes {
        let mut payload = raw.clone();
        rewrite_id(&mut payload, group.key.client_id)?;
        return Ok((payload, outcomes[0].rcode()));
    }

    let rcode = outcomes
        .iter()
        .map(|outcome| outcome.rcode())
        .find(|rcode| rcode.is_error())
        .unwrap_or(ResponseCode::NoError);

    let mut answers = Vec::new();
    let mut truncated = false;
    let mut answered = 0usize;
    let mut recursion_available = 0usize;
    for outcome in outcomes {
        if let ForwardOutcome::Answered {
            flags,
            answers: records,
        } = outcome
        {
            answered += 1;
            truncated |= flags.tc;
            if flags.ra {
                recursion_available += 1;
            }
            if !flags.rcode.is_error() {
                answers.extend(records.iter().cloned());
            }
        }
    }

    let flags = Flags {
        qr: true,
        opcode: group.opcode,
        aa: false,
        tc: truncated,
        rd: group.recursion_desired,
        ra: answered > 0 && recursion_available == answered,
        z: 0,
        rcode,
    };
    let header = Header {
        question_count: count_of(group.questions.len(), "questions")?,
        answer_count: count_of(answers.len(), "answers")?,
        ..Header::new(group.key.client_id, flags)
    };

    let payload = encode_message(&header, &group.questions, &answers)?;
    Ok((payload, rcode))
}

fn count_of(len: usize, section: &str) -> Result<u16, DomainError> {
    u16::try_from(len)
        .map_err(|_| DomainError::Encoding(format!("{} {} exceed the header count", len, section)))
}
