use std::fmt;

/// Record types the forwarder can name in logs. Anything else is carried as a
/// raw `u16` and never interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordType {
    A,
    NS,
    CNAME,
    SOA,
    PTR,
    MX,
    TXT,
    AAAA,
    SRV,
    OPT,
}

const KNOWN_TYPES: [(RecordType, u16, &str); 10] = [
    (RecordType::A, 1, "A"),
    (RecordType::NS, 2, "NS"),
    (RecordType::CNAME, 5, "CNAME"),
    (RecordType::SOA, 6, "SOA"),
    (RecordType::PTR, 12, "PTR"),
    (RecordType::MX, 15, "MX"),
    (RecordType::TXT, 16, "TXT"),
    (RecordType::AAAA, 28, "AAAA"),
    (RecordType::SRV, 33, "SRV"),
    (RecordType::OPT, 41, "OPT"),
];

impl RecordType {
    fn entry(self) -> (RecordType, u16, &'static str) {
        KNOWN_TYPES
            .iter()
            .copied()
            .find(|(known, _, _)| *known == self)
            .unwrap_or((self, 0, "?"))
    }

    pub fn as_str(&self) -> &'static str {
        self.entry().2
    }

    pub fn to_u16(&self) -> u16 {
        self.entry().1
    }

    pub fn from_u16(code: u16) -> Option<Self> {
        KNOWN_TYPES
            .iter()
            .find(|(_, known, _)| *known == code)
            .map(|(record_type, _, _)| *record_type)
    }

    /// Mnemonic for known codes, RFC 3597 `TYPEnn` otherwise.
    pub fn describe(code: u16) -> String {
        match Self::from_u16(code) {
            Some(record_type) => record_type.as_str().to_string(),
            None => format!("TYPE{}", code),
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
