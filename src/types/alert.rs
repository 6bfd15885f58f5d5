use std::fmt;

/// Alert descriptions emitted by this engine (RFC 8446 section 6).
///
/// Only the descriptions the sub-protocol modules can raise are listed;
/// the full alert protocol lives with the record layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertDescription {
    UnexpectedMessage,
    HandshakeFailure,
    IllegalParameter,
    DecodeError,
    InternalError,
}

impl AlertDescription {
    pub fn as_u8(&self) -> u8 {
        use AlertDescription::*;
        match self {
            UnexpectedMessage => 10,
            HandshakeFailure => 40,
            IllegalParameter => 47,
            DecodeError => 50,
            InternalError => 80,
        }
    }
}

impl fmt::Display for AlertDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use AlertDescription::*;
        match self {
            UnexpectedMessage => write!(f, "unexpected_message"),
            HandshakeFailure => write!(f, "handshake_failure"),
            IllegalParameter => write!(f, "illegal_parameter"),
            DecodeError => write!(f, "decode_error"),
            InternalError => write!(f, "internal_error"),
        }
    }
}
