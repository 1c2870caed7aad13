//! Ferrous Forward Application Layer
//!
//! Holds the forwarding coordinator and the event loop that drives it. I/O is
//! reached only through the [`ports::DatagramChannel`] port.
pub mod ports;
pub mod services;
pub mod use_cases;
