//! Domain name encoding (RFC 1035 §3.1) and decompression (§4.1.4).

use crate::DomainError;

pub const MAX_LABEL_LEN: usize = 63;

/// Maximum encoded length of a name, length bytes and terminator included.
pub const MAX_NAME_LEN: usize = 255;

/// Upper bound on compression pointers followed while decoding one name.
pub const MAX_POINTER_HOPS: usize = 16;

const POINTER_MASK: u8 = 0xC0;

/// Encodes a dotted domain as length-prefixed labels followed by a zero byte.
///
/// `""` and `"."` encode the root name. A single trailing dot is ignored.
/// Master-file escapes carry arbitrary label bytes: `\.`, `\\` and `\DDD`.
pub fn encode_name(domain: &str) -> Result<Vec<u8>, DomainError> {
    let mut out = Vec::with_capacity(domain.len() + 2);
    write_name(domain, &mut out)?;
    Ok(out)
}

pub(crate) fn write_name(domain: &str, out: &mut Vec<u8>) -> Result<(), DomainError> {
    let start = out.len();
    let written = parse_labels(domain).and_then(|labels| {
        for label in &labels {
            if label.len() > MAX_LABEL_LEN {
                return Err(DomainError::Encoding(format!(
                    "label in '{}' is {} bytes, limit is {}",
                    domain,
                    label.len(),
                    MAX_LABEL_LEN
                )));
            }
            out.push(label.len() as u8);
            out.extend_from_slice(label);
        }
        out.push(0);

        let encoded = out.len() - start;
        if encoded > MAX_NAME_LEN {
            return Err(DomainError::Encoding(format!(
                "name '{}' encodes to {} bytes, limit is {}",
                domain, encoded, MAX_NAME_LEN
            )));
        }
        Ok(())
    });

    if written.is_err() {
        out.truncate(start);
    }
    written
}

/// Splits a presentation-format name into raw label bytes, resolving escapes.
fn parse_labels(domain: &str) -> Result<Vec<Vec<u8>>, DomainError> {
    let mut labels = Vec::new();
    if domain.is_empty() || domain == "." {
        return Ok(labels);
    }

    let bytes = domain.as_bytes();
    let mut label = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'.' => {
                if label.is_empty() {
                    return Err(DomainError::Encoding(format!(
                        "empty label in '{}'",
                        domain
                    )));
                }
                labels.push(std::mem::take(&mut label));
                i += 1;
            }
            b'\\' => match bytes.get(i + 1) {
                Some(digit) if digit.is_ascii_digit() => {
                    let value = bytes
                        .get(i + 1..i + 4)
                        .filter(|digits| digits.iter().all(u8::is_ascii_digit))
                        .map(|digits| {
                            digits
                                .iter()
                                .fold(0u16, |acc, d| acc * 10 + u16::from(d - b'0'))
                        })
                        .and_then(|value| u8::try_from(value).ok())
                        .ok_or_else(|| {
                            DomainError::Encoding(format!(
                                "bad decimal escape at byte {} of '{}'",
                                i, domain
                            ))
                        })?;
                    label.push(value);
                    i += 4;
                }
                Some(&escaped) => {
                    label.push(escaped);
                    i += 2;
                }
                None => {
                    return Err(DomainError::Encoding(format!(
                        "dangling escape at the end of '{}'",
                        domain
                    )));
                }
            },
            byte => {
                label.push(byte);
                i += 1;
            }
        }
    }
    if !label.is_empty() {
        labels.push(label);
    }
    Ok(labels)
}

/// Appends one label in presentation format.
fn push_label(name: &mut String, label: &[u8]) {
    for &byte in label {
        match byte {
            b'.' | b'\\' => {
                name.push('\\');
                name.push(char::from(byte));
            }
            0x21..=0x7E => name.push(char::from(byte)),
            _ => name.push_str(&format!("\\{:03}", byte)),
        }
    }
}

/// Decodes the name starting at `offset`, following compression pointers.
///
/// Returns the dotted name (no trailing dot, `""` for the root, label bytes
/// escaped as in [`encode_name`]) and the offset
/// just past the name as it appears at `offset`: after the terminator, or after
/// the first pointer when the name is compressed.
pub fn decode_name(buf: &[u8], offset: usize) -> Result<(String, usize), DomainError> {
    let mut name = String::new();
    let mut pos = offset;
    let mut resume_at: Option<usize> = None;
    let mut hops = 0usize;
    let mut encoded_len = 0usize;

    loop {
        let len = *buf.get(pos).ok_or_else(|| {
            DomainError::MalformedName(format!(
                "label length at offset {} is past the end of a {}-byte message",
                pos,
                buf.len()
            ))
        })?;

        match len & POINTER_MASK {
            POINTER_MASK => {
                let low = *buf.get(pos + 1).ok_or_else(|| {
                    DomainError::MalformedName(format!("pointer at offset {} is cut short", pos))
                })?;
                let target = (usize::from(len & !POINTER_MASK) << 8) | usize::from(low);

                if resume_at.is_none() {
                    resume_at = Some(pos + 2);
                }
                hops += 1;
                if hops > MAX_POINTER_HOPS {
                    return Err(DomainError::MalformedName(format!(
                        "more than {} compression pointers, starting at offset {}",
                        MAX_POINTER_HOPS, offset
                    )));
                }
                if target >= buf.len() {
                    return Err(DomainError::MalformedName(format!(
                        "pointer at offset {} targets {}, message is {} bytes",
                        pos,
                        target,
                        buf.len()
                    )));
                }
                pos = target;
            }
            0x00 if len == 0 => {
                return Ok((name, resume_at.unwrap_or(pos + 1)));
            }
            0x00 => {
                let start = pos + 1;
                let end = start + usize::from(len);
                if end > buf.len() {
                    return Err(DomainError::MalformedName(format!(
                        "label of {} bytes at offset {} runs past the end of the message",
                        len, pos
                    )));
                }

                encoded_len += 1 + usize::from(len);
                if encoded_len + 1 > MAX_NAME_LEN {
                    return Err(DomainError::MalformedName(format!(
                        "name at offset {} is longer than {} bytes",
                        offset, MAX_NAME_LEN
                    )));
                }

                if !name.is_empty() {
                    name.push('.');
                }
                push_label(&mut name, &buf[start..end]);
                pos = end;
            }
            _ => {
                return Err(DomainError::MalformedName(format!(
                    "unsupported label type {:#04x} at offset {}",
                    len, pos
                )));
            }
        }
    }
}
