//! UDP datagram channel (RFC 1035 §4.2.1)
//!
//! Messages are sent as-is (no framing). One channel serves the clients, a
//! second one carries every upstream sub-query.

use async_trait::async_trait;
use ferrous_forward_application::ports::{Datagram, DatagramChannel};
use ferrous_forward_domain::DomainError;
use socket2::{Domain, Protocol, Socket, Type};
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use tokio::net::UdpSocket;
use tracing::{debug, trace};

/// Largest datagram accepted; covers EDNS(0) payload sizes.
const MAX_DATAGRAM_SIZE: usize = 4096;

const SOCKET_BUFFER_SIZE: usize = 512 * 1024;

pub struct UdpChannel {
    socket: UdpSocket,
}

impl UdpChannel {
    /// Binds the client-facing socket.
    pub fn bind(addr: SocketAddr) -> Result<Self, DomainError> {
        let socket = create_udp_socket(addr, true)?;
        debug!(addr = %socket.local_addr()?, "UDP channel bound");
        Ok(Self { socket })
    }

    /// Binds an ephemeral socket of the same family as `remote`.
    pub fn bind_for(remote: SocketAddr) -> Result<Self, DomainError> {
        let local = if remote.is_ipv4() {
            SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0))
        } else {
            SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0))
        };
        let socket = create_udp_socket(local, false)?;
        debug!(addr = %socket.local_addr()?, remote = %remote, "Upstream channel bound");
        Ok(Self { socket })
    }
}

fn create_udp_socket(addr: SocketAddr, reuse: bool) -> Result<UdpSocket, DomainError> {
    let domain = if addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };
    let socket = Socket::new(domain, Type::DGRAM, Some(Protocol::UDP))?;
    if addr.is_ipv6() {
        socket.set_only_v6(false)?;
    }
    if reuse {
        socket.set_reuse_address(true)?;
    }
    socket.set_recv_buffer_size(SOCKET_BUFFER_SIZE)?;
    socket.set_send_buffer_size(SOCKET_BUFFER_SIZE)?;
    socket.bind(&addr.into())?;
    socket.set_nonblocking(true)?;
    let std_socket: std::net::UdpSocket = socket.into();
    Ok(UdpSocket::from_std(std_socket)?)
}

#[async_trait]
impl DatagramChannel for UdpChannel {
    async fn receive(&self) -> Result<Datagram, DomainError> {
        let mut buf = vec![0u8; MAX_DATAGRAM_SIZE];
        let (len, from) = self.socket.recv_from(&mut buf).await?;
        buf.truncate(len);
        trace!(from = %from, bytes = len, "UDP datagram received");
        Ok(Datagram { payload: buf, from })
    }

    async fn send(&self, payload: &[u8], to: SocketAddr) -> Result<(), DomainError> {
        let sent = self.socket.send_to(payload, to).await?;
        if sent != payload.len() {
            return Err(DomainError::IoError(format!(
                "short UDP send to {}: {} of {} bytes",
                to,
                sent,
                payload.len()
            )));
        }
        trace!(to = %to, bytes = sent, "UDP datagram sent");
        Ok(())
    }

    fn local_addr(&self) -> Result<SocketAddr, DomainError> {
        Ok(self.socket.local_addr()?)
    }
}
