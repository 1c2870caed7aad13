mod datagram_channel;

pub use datagram_channel::{Datagram, DatagramChannel};
