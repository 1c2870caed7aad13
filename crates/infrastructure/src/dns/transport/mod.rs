pub mod resolver;
pub mod udp;

pub use resolver::{resolve_all, resolve_upstream};
pub use udp::UdpChannel;
