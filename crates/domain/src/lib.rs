//! Ferrous Forward Domain Layer
pub mod config;
pub mod dns_record;
pub mod errors;
pub mod upstream;
pub mod wire;

pub use config::{CliOverrides, Config, ConfigError};
pub use dns_record::RecordType;
pub use errors::DomainError;
pub use upstream::UpstreamAddr;
pub use wire::{Flags, Header, Message, Opcode, Question, ResourceRecord, ResponseCode};
