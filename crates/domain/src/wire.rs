//! DNS wire format (RFC 1035 §4.1)
//!
//! Pure encode/decode functions over byte slices. Decoded values own their
//! data; nothing here keeps a reference into the datagram it came from.

pub mod header;
pub mod message;
pub mod name;
pub mod question;
mod reader;
pub mod record;

pub use header::{
    decode_header, encode_header, peek_id, rewrite_id, Flags, Header, Opcode, ResponseCode,
    HEADER_LEN,
};
pub use message::{decode_message, encode_message, Message};
pub use name::{decode_name, encode_name, MAX_LABEL_LEN, MAX_NAME_LEN, MAX_POINTER_HOPS};
pub use question::{decode_question, encode_question, Question};
pub use record::{decode_record, encode_record, ResourceRecord};

pub(crate) use reader::WireReader;

/// Class IN.
pub const CLASS_IN: u16 = 1;
