mod alert;
mod cipher_suite;
mod ctype;
mod ext;
mod version;

pub use alert::AlertDescription;
pub use cipher_suite::{BulkCipher, CipherSuite, MacAlgorithm};
pub use ctype::ContentType;
pub use ext::{Extension, ExtensionType};
pub use version::ProtocolVersion;

/// Which side of the connection a handshake context belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Client,
    Server,
}

impl Role {
    /// The opposite side. Used to swap traffic key names when mirroring
    /// the peer's cipher installation.
    pub fn peer(&self) -> Role {
        match self {
            Role::Client => Role::Server,
            Role::Server => Role::Client,
        }
    }
}
