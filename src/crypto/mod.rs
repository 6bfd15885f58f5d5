mod cipher;
mod keying;

pub use cipher::{Authenticator, MacAuthenticator, ReadCipher, WriteCipher};
pub use keying::{KeyDerivation, LegacyKeyDerivation, SecretKey, Tls13KeyDerivation, TrafficKeyName};
