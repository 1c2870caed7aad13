use async_trait::async_trait;
use ferrous_forward_domain::DomainError;
use std::net::SocketAddr;

/// One received UDP payload and the address it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Datagram {
    pub payload: Vec<u8>,
    pub from: SocketAddr,
}

/// Best-effort datagram socket.
///
/// `receive` must be cancel safe: the event loop races it against other
/// sources and drops the losing futures.
#[async_trait]
pub trait DatagramChannel: Send + Sync {
    async fn receive(&self) -> Result<Datagram, DomainError>;

    async fn send(&self, payload: &[u8], to: SocketAddr) -> Result<(), DomainError>;

    fn local_addr(&self) -> Result<SocketAddr, DomainError>;
}
