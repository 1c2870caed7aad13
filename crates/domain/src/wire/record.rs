use super::name::{decode_name, write_name};
use super::WireReader;
use crate::dns_record::RecordType;
use crate::DomainError;
use std::net::Ipv4Addr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRecord {
    pub name: String,
    pub record_type: u16,
    pub class: u16,
    pub ttl: u32,
    /// RDATA, copied verbatim.
    pub data: Vec<u8>,
}

impl ResourceRecord {
    /// An IN/A record carrying `address`.
    pub fn address(name: impl Into<String>, ttl: u32, address: Ipv4Addr) -> Self {
        Self {
            name: name.into(),
            record_type: RecordType::A.to_u16(),
            class: super::CLASS_IN,
            ttl,
            data: address.octets().to_vec(),
        }
    }

    /// The IPv4 payload of an A record, `None` for anything else.
    pub fn ipv4(&self) -> Option<Ipv4Addr> {
        if self.record_type != RecordType::A.to_u16() {
            return None;
        }
        let octets: [u8; 4] = self.data.as_slice().try_into().ok()?;
        Some(Ipv4Addr::from(octets))
    }
}

pub fn encode_record(record: &ResourceRecord, out: &mut Vec<u8>) -> Result<(), DomainError> {
    let rdlength = u16::try_from(record.data.len()).map_err(|_| {
        DomainError::Encoding(format!(
            "RDATA for '{}' is {} bytes, limit is {}",
            record.name,
            record.data.len(),
            u16::MAX
        ))
    })?;

    write_name(&record.name, out)?;
    out.extend_from_slice(&record.record_type.to_be_bytes());
    out.extend_from_slice(&record.class.to_be_bytes());
    out.extend_from_slice(&record.ttl.to_be_bytes());
    out.extend_from_slice(&rdlength.to_be_bytes());
    out.extend_from_slice(&record.data);
    Ok(())
}

pub fn decode_record(buf: &[u8], offset: usize) -> Result<(ResourceRecord, usize), DomainError> {
    let mut reader = WireReader::at(buf, offset);
    let record = read_record(&mut reader)?;
    Ok((record, reader.position()))
}

pub(crate) fn read_record(reader: &mut WireReader<'_>) -> Result<ResourceRecord, DomainError> {
    let (name, next) = decode_name(reader.buffer(), reader.position())?;
    reader.seek(next);
    let record_type = reader.read_u16()?;
    let class = reader.read_u16()?;
    let ttl = reader.read_u32()?;
    let rdlength = reader.read_u16()?;
    let data = reader.take(usize::from(rdlength))?.to_vec();

    Ok(ResourceRecord {
        name,
        record_type,
        class,
        ttl,
        data,
    })
}
