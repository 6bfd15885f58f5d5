use std::fmt;

use nom::number::complete::be_u16;
use nom::IResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(non_camel_case_types)]
pub enum ProtocolVersion {
    TLS1_0,
    TLS1_1,
    TLS1_2,
    TLS1_3,
    Unknown(u16),
}

impl Default for ProtocolVersion {
    fn default() -> Self {
        Self::Unknown(0)
    }
}

impl ProtocolVersion {
    pub fn from_u16(value: u16) -> Self {
        match value {
            0x0301 => ProtocolVersion::TLS1_0,
            0x0302 => ProtocolVersion::TLS1_1,
            0x0303 => ProtocolVersion::TLS1_2,
            0x0304 => ProtocolVersion::TLS1_3,
            _ => ProtocolVersion::Unknown(value),
        }
    }

    pub fn as_u16(&self) -> u16 {
        match self {
            ProtocolVersion::TLS1_0 => 0x0301,
            ProtocolVersion::TLS1_1 => 0x0302,
            ProtocolVersion::TLS1_2 => 0x0303,
            ProtocolVersion::TLS1_3 => 0x0304,
            ProtocolVersion::Unknown(value) => *value,
        }
    }

    /// TLS 1.3 and later use the 1.3 key schedule and treat
    /// ChangeCipherSpec as a compatibility shim only.
    pub fn is_tls13_plus(&self) -> bool {
        self.as_u16() >= 0x0304
    }

    pub fn parse(input: &[u8]) -> IResult<&[u8], ProtocolVersion> {
        let (input, version) = be_u16(input)?;
        Ok((input, ProtocolVersion::from_u16(version)))
    }

    pub fn serialize(&self, output: &mut Vec<u8>) {
        output.extend_from_slice(&self.as_u16().to_be_bytes());
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolVersion::TLS1_0 => write!(f, "TLS 1.0"),
            ProtocolVersion::TLS1_1 => write!(f, "TLS 1.1"),
            ProtocolVersion::TLS1_2 => write!(f, "TLS 1.2"),
            ProtocolVersion::TLS1_3 => write!(f, "TLS 1.3"),
            ProtocolVersion::Unknown(value) => write!(f, "Unknown(0x{:04x})", value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip() {
        for value in [0x0301, 0x0302, 0x0303, 0x0304, 0x0300] {
            let version = ProtocolVersion::from_u16(value);
            assert_eq!(version.as_u16(), value);

            let mut serialized = Vec::new();
            version.serialize(&mut serialized);
            let (rest, parsed) = ProtocolVersion::parse(&serialized).unwrap();
            assert_eq!(parsed, version);
            assert!(rest.is_empty());
        }
    }

    #[test]
    fn tls13_bucket() {
        assert!(ProtocolVersion::TLS1_3.is_tls13_plus());
        assert!(!ProtocolVersion::TLS1_2.is_tls13_plus());
        assert!(!ProtocolVersion::TLS1_0.is_tls13_plus());
    }
}
