use thiserror::Error;

use crate::types::AlertDescription;

/// Failures in the handshake sub-protocol engine.
///
/// Every variant is fatal to the connection: the caller is expected to emit
/// the alert from [`Error::alert`] and close the transport. There is no
/// local recovery or retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    #[error("Malformed wire bytes: {0}")]
    DecodeError(&'static str),

    #[error("Unexpected message: {0}")]
    UnexpectedMessage(&'static str),

    #[error("Handshake failure: {0}")]
    HandshakeFailure(&'static str),

    #[error("Illegal parameter: {0}")]
    IllegalParameter(&'static str),

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(&'static str),

    #[error("Field too long for 16-bit length prefix: {0}")]
    OversizedField(usize),

    #[error("Invalid configuration: {0}")]
    ConfigError(&'static str),
}

impl Error {
    /// The fatal alert description to send before closing the connection.
    pub fn alert(&self) -> AlertDescription {
        use Error::*;
        match self {
            DecodeError(_) => AlertDescription::DecodeError,
            UnexpectedMessage(_) => AlertDescription::UnexpectedMessage,
            HandshakeFailure(_) => AlertDescription::HandshakeFailure,
            IllegalParameter(_) => AlertDescription::IllegalParameter,
            // Local faults, never attacker-triggerable.
            UnsupportedOperation(_) | OversizedField(_) | ConfigError(_) => {
                AlertDescription::InternalError
            }
        }
    }
}
