use ferrous_forward_domain::{Flags, Opcode, Question, ResourceRecord, ResponseCode};
use smallvec::SmallVec;
use std::net::SocketAddr;
use std::time::{Duration, Instant};

/// Identifies one client query: the sender and the ID it chose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupKey {
    pub client: SocketAddr,
    pub client_id: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForwardMode {
    /// One upstream query per question, replies merged on completion.
    Split,
    /// Single question sent as received; the reply is relayed as received.
    Passthrough,
}

/// Terminal state of a released group. An open group is one still present in
/// the coordinator's table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum GroupState {
    Complete,
    /// Timed out, an upstream send failed, or the merged RCODE is an error.
    Failed,
}

/// What came back for one forwarded sub-query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForwardOutcome {
    Answered {
        flags: Flags,
        answers: Vec<ResourceRecord>,
    },
    Relayed {
        raw: Vec<u8>,
    },
    /// Synthesized locally after an upstream send failure.
    Failed {
        rcode: ResponseCode,
    },
}

impl ForwardOutcome {
    pub fn rcode(&self) -> ResponseCode {
        match self {
            ForwardOutcome::Answered { flags, .. } => flags.rcode,
            ForwardOutcome::Relayed { raw } => raw
                .get(3)
                .map(|low| ResponseCode::from_u8(low & 0x0F))
                .unwrap_or(ResponseCode::ServFail),
            ForwardOutcome::Failed { rcode } => *rcode,
        }
    }

    pub fn is_local_failure(&self) -> bool {
        matches!(self, ForwardOutcome::Failed { .. })
    }
}

#[derive(Debug, Clone)]
pub struct PendingForward {
    pub generated_id: u16,
    pub group: GroupKey,
    pub original_question: Question,
    pub received: Option<ForwardOutcome>,
    pub created_at: Instant,
}

impl PendingForward {
    pub fn new(generated_id: u16, group: GroupKey, question: Question, now: Instant) -> Self {
        Self {
            generated_id,
            group,
            original_question: question,
            received: None,
            created_at: now,
        }
    }

}

/// The sub-forwards spawned by one client query, in question order.
#[derive(Debug, Clone)]
pub struct ForwardGroup {
    pub key: GroupKey,
    pub opcode: Opcode,
    pub recursion_desired: bool,
    pub questions: Vec<Question>,
    pub members: SmallVec<[u16; 4]>,
    pub mode: ForwardMode,
    pub created_at: Instant,
}

impl ForwardGroup {
    pub fn is_expired(&self, now: Instant, timeout: Duration) -> bool {
        now.saturating_duration_since(self.created_at) >= timeout
    }
}
