#![allow(unused_imports)]
pub mod builders;
pub mod dns_server_mock;

pub use builders::query_bytes;
pub use dns_server_mock::MockDnsServer;
