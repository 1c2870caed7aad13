use crate::DomainError;
use std::fmt;

pub const HEADER_LEN: usize = 12;

/// The transaction ID occupies the first two header bytes.
const ID_LEN: usize = 2;

const QR_BIT: u16 = 0x8000;
const AA_BIT: u16 = 0x0400;
const TC_BIT: u16 = 0x0200;
const RD_BIT: u16 = 0x0100;
const RA_BIT: u16 = 0x0080;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Opcode {
    #[default]
    Query,
    IQuery,
    Status,
    Notify,
    Update,
    Unassigned(u8),
}

impl Opcode {
    pub fn from_u8(value: u8) -> Self {
        match value & 0x0F {
            0 => Opcode::Query,
            1 => Opcode::IQuery,
            2 => Opcode::Status,
            4 => Opcode::Notify,
            5 => Opcode::Update,
            other => Opcode::Unassigned(other),
        }
    }

    pub fn to_u8(self) -> u8 {
        match self {
            Opcode::Query => 0,
            Opcode::IQuery => 1,
            Opcode::Status => 2,
            Opcode::Notify => 4,
            Opcode::Update => 5,
            Opcode::Unassigned(value) => value & 0x0F,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ResponseCode {
    #[default]
    NoError,
    FormErr,
    ServFail,
    NxDomain,
    NotImp,
    Refused,
    Other(u8),
}

impl ResponseCode {
    pub fn from_u8(value: u8) -> Self {
        match value & 0x0F {
            0 => ResponseCode::NoError,
            1 => ResponseCode::FormErr,
            2 => ResponseCode::ServFail,
            3 => ResponseCode::NxDomain,
            4 => ResponseCode::NotImp,
            5 => ResponseCode::Refused,
            other => ResponseCode::Other(other),
        }
    }

    pub fn to_u8(self) -> u8 {
        match self {
            ResponseCode::NoError => 0,
            ResponseCode::FormErr => 1,
            ResponseCode::ServFail => 2,
            ResponseCode::NxDomain => 3,
            ResponseCode::NotImp => 4,
            ResponseCode::Refused => 5,
            ResponseCode::Other(value) => value & 0x0F,
        }
    }

    pub fn is_error(self) -> bool {
        self != ResponseCode::NoError
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseCode::NoError => "NOERROR",
            ResponseCode::FormErr => "FORMERR",
            ResponseCode::ServFail => "SERVFAIL",
            ResponseCode::NxDomain => "NXDOMAIN",
            ResponseCode::NotImp => "NOTIMP",
            ResponseCode::Refused => "REFUSED",
            ResponseCode::Other(_) => "RCODE",
        }
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseCode::Other(value) => write!(f, "RCODE{}", value),
            _ => f.write_str(self.as_str()),
        }
    }
}

/// Second 16-bit word of the header:
/// `QR | OPCODE(4) | AA | TC | RD | RA | Z(3) | RCODE(4)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Flags {
    pub qr: bool,
    pub opcode: Opcode,
    pub aa: bool,
    pub tc: bool,
    pub rd: bool,
    pub ra: bool,
    pub z: u8,
    pub rcode: ResponseCode,
}

impl Flags {
    pub fn from_u16(raw: u16) -> Self {
        Self {
            qr: raw & QR_BIT != 0,
            opcode: Opcode::from_u8(((raw >> 11) & 0x0F) as u8),
            aa: raw & AA_BIT != 0,
            tc: raw & TC_BIT != 0,
            rd: raw & RD_BIT != 0,
            ra: raw & RA_BIT != 0,
            z: ((raw >> 4) & 0x07) as u8,
            rcode: ResponseCode::from_u8((raw & 0x0F) as u8),
        }
    }

    pub fn to_u16(&self) -> u16 {
        let mut raw = (u16::from(self.opcode.to_u8()) << 11)
            | (u16::from(self.z & 0x07) << 4)
            | u16::from(self.rcode.to_u8());
        if self.qr {
            raw |= QR_BIT;
        }
        if self.aa {
            raw |= AA_BIT;
        }
        if self.tc {
            raw |= TC_BIT;
        }
        if self.rd {
            raw |= RD_BIT;
        }
        if self.ra {
            raw |= RA_BIT;
        }
        raw
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Header {
    pub id: u16,
    pub flags: Flags,
    pub question_count: u16,
    pub answer_count: u16,
    pub authority_count: u16,
    pub additional_count: u16,
}

impl Header {
    /// Header with the given ID and flags and all section counts at zero.
    pub fn new(id: u16, flags: Flags) -> Self {
        Self {
            id,
            flags,
            ..Self::default()
        }
    }
}

pub fn encode_header(header: &Header) -> [u8; HEADER_LEN] {
    let mut out = [0u8; HEADER_LEN];
    out[0..2].copy_from_slice(&header.id.to_be_bytes());
    out[2..4].copy_from_slice(&header.flags.to_u16().to_be_bytes());
    out[4..6].copy_from_slice(&header.question_count.to_be_bytes());
    out[6..8].copy_from_slice(&header.answer_count.to_be_bytes());
    out[8..10].copy_from_slice(&header.authority_count.to_be_bytes());
    out[10..12].copy_from_slice(&header.additional_count.to_be_bytes());
    out
}

pub fn decode_header(buf: &[u8]) -> Result<Header, DomainError> {
    if buf.len() < HEADER_LEN {
        return Err(DomainError::TruncatedMessage {
            needed: HEADER_LEN,
            available: buf.len(),
        });
    }

    let word = |i: usize| u16::from_be_bytes([buf[i], buf[i + 1]]);

    Ok(Header {
        id: word(0),
        flags: Flags::from_u16(word(2)),
        question_count: word(4),
        answer_count: word(6),
        authority_count: word(8),
        additional_count: word(10),
    })
}

/// Reads the transaction ID without decoding anything else.
pub fn peek_id(buf: &[u8]) -> Option<u16> {
    buf.get(0..ID_LEN).map(|b| u16::from_be_bytes([b[0], b[1]]))
}

/// Overwrites the transaction ID of an encoded message in place.
pub fn rewrite_id(buf: &mut [u8], id: u16) -> Result<(), DomainError> {
    let available = buf.len();
    let slot = buf.get_mut(0..ID_LEN).ok_or(DomainError::TruncatedMessage {
        needed: ID_LEN,
        available,
    })?;
    slot.copy_from_slice(&id.to_be_bytes());
    Ok(())
}
