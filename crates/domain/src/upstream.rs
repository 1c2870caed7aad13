use crate::DomainError;
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;

/// Upstream resolver address. Hostnames stay unresolved until startup.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UpstreamAddr {
    Resolved(SocketAddr),
    Unresolved { hostname: Arc<str>, port: u16 },
}

impl UpstreamAddr {
    pub fn socket_addr(&self) -> Option<SocketAddr> {
        match self {
            UpstreamAddr::Resolved(addr) => Some(*addr),
            UpstreamAddr::Unresolved { .. } => None,
        }
    }

    /// Returns (hostname, port) if this address is unresolved.
    pub fn unresolved_parts(&self) -> Option<(&str, u16)> {
        match self {
            UpstreamAddr::Unresolved { hostname, port } => Some((hostname, *port)),
            UpstreamAddr::Resolved(_) => None,
        }
    }
}

impl fmt::Display for UpstreamAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpstreamAddr::Resolved(addr) => write!(f, "{}", addr),
            UpstreamAddr::Unresolved { hostname, port } => write!(f, "{}:{}", hostname, port),
        }
    }
}

fn parse_host_port(s: &str) -> Option<(&str, u16)> {
    if s.starts_with('[') {
        let end = s.find(']')?;
        let host = &s[1..end];
        let port_str = s[end + 1..].strip_prefix(':')?;
        let port = port_str.parse::<u16>().ok()?;
        Some((host, port))
    } else {
        let (host, port_str) = s.rsplit_once(':')?;
        let port = port_str.parse::<u16>().ok()?;
        Some((host, port))
    }
}

impl FromStr for UpstreamAddr {
    type Err = DomainError;

    /// Accepts `IP:PORT`, `[IPv6]:PORT` or `HOST:PORT`, optionally prefixed
    /// with `udp://`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let addr_str = s.trim();
        let addr_str = addr_str.strip_prefix("udp://").unwrap_or(addr_str);

        if let Ok(addr) = addr_str.parse::<SocketAddr>() {
            return Ok(UpstreamAddr::Resolved(addr));
        }

        match parse_host_port(addr_str) {
            Some((host, port)) if !host.is_empty() && !host.contains('/') => {
                Ok(UpstreamAddr::Unresolved {
                    hostname: host.into(),
                    port,
                })
            }
            _ => Err(DomainError::InvalidUpstream(format!(
                "'{}'. Expected IP:PORT, HOST:PORT or udp://HOST:PORT",
                s
            ))),
        }
    }
}
