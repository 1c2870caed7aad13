use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Truncated DNS message: need {needed} bytes, {available} available")]
    TruncatedMessage { needed: usize, available: usize },

    #[error("Malformed DNS message: {0}")]
    MalformedMessage(String),

    #[error("Malformed domain name: {0}")]
    MalformedName(String),

    #[error("Cannot encode DNS message: {0}")]
    Encoding(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Upstream timeout after {elapsed_ms}ms for client query {client_id:#06x}")]
    UpstreamTimeout { client_id: u16, elapsed_ms: u128 },

    #[error("Invalid upstream address: {0}")]
    InvalidUpstream(String),

    #[error("I/O error: {0}")]
    IoError(String),
}

impl DomainError {
    /// True for errors raised while parsing bytes received from the network.
    pub fn is_wire_format(&self) -> bool {
        matches!(
            self,
            DomainError::TruncatedMessage { .. }
                | DomainError::MalformedMessage(_)
                | DomainError::MalformedName(_)
        )
    }
}

impl From<std::io::Error> for DomainError {
    fn from(e: std::io::Error) -> Self {
        DomainError::IoError(e.to_string())
    }
}
