#![forbid(unsafe_code)]
#![warn(clippy::all)]

//! Sans-IO engine for two TLS handshake sub-protocols: the legacy
//! ChangeCipherSpec message (TLS 1.0-1.2, compatibility shim in 1.3) and
//! the HelloRetryRequest cookie extension (TLS 1.3).
//!
//! The surrounding handshake driver owns message framing and I/O; this
//! crate owns the wire codecs, the cipher installation triggered by
//! ChangeCipherSpec, and the cookie exchange across a HelloRetryRequest
//! round. Every failure is fatal to the connection and maps to a TLS
//! alert via [`Error::alert`].

pub mod change_cipher_spec;
pub mod codec;
pub mod cookie;
pub mod crypto;
pub mod dispatch;
pub mod types;

mod config;
mod context;
mod error;
mod record;

pub use config::{Config, ConfigBuilder};
pub use context::{ExtensionSlot, HandshakeContext, TransportContext};
pub use error::Error;
pub use record::RecordLayer;
