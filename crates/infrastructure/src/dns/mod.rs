pub mod transport;

pub use transport::{resolve_upstream, UdpChannel};
