//! Ferrous Forward Infrastructure Layer
//!
//! UDP sockets behind the application's `DatagramChannel` port, and upstream
//! address resolution.
pub mod dns;
