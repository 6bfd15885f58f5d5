//! Bulk cipher construction for record protection.
//!
//! Mirrors the factory split of the record layer: a [`BulkCipher`] plus a
//! protocol version selects a generator, and a suite/version combination
//! with no generator yields `None` (the caller maps that to a fatal
//! `illegal_parameter` alert). The engine installs the resulting objects
//! on the record layer; actual record encryption happens there.

use std::fmt;

use aes_gcm::KeyInit;
use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha256;

use crate::crypto::SecretKey;
use crate::types::{BulkCipher, MacAlgorithm, ProtocolVersion};
use crate::Error;

/// Record integrity authenticator.
///
/// AEAD suites need no MAC key, only a version-bound null authenticator;
/// CBC suites carry an HMAC keyed with the role's MAC traffic key.
pub enum Authenticator {
    AeadNull(ProtocolVersion),
    Mac(MacAuthenticator),
}

impl Authenticator {
    pub fn aead_null(version: ProtocolVersion) -> Self {
        Authenticator::AeadNull(version)
    }

    pub fn mac(algorithm: MacAlgorithm, key: &SecretKey) -> Result<Self, Error> {
        match algorithm {
            MacAlgorithm::Null => Err(Error::UnsupportedOperation(
                "MAC authenticator requires a MAC algorithm",
            )),
            MacAlgorithm::HmacSha256 => {
                let mac = <Hmac<Sha256> as Mac>::new_from_slice(key)
                    .map_err(|_| Error::UnsupportedOperation("invalid MAC key length"))?;
                Ok(Authenticator::Mac(MacAuthenticator { mac }))
            }
        }
    }

    pub fn is_aead_null(&self) -> bool {
        matches!(self, Authenticator::AeadNull(_))
    }

    /// Version the authenticator was bound to at construction.
    pub fn version(&self) -> Option<ProtocolVersion> {
        match self {
            Authenticator::AeadNull(version) => Some(*version),
            Authenticator::Mac(_) => None,
        }
    }
}

impl fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Authenticator::AeadNull(version) => write!(f, "AeadNull({})", version),
            Authenticator::Mac(_) => write!(f, "Mac(HmacSha256)"),
        }
    }
}

/// HMAC over the record pseudo-header and fragment.
pub struct MacAuthenticator {
    mac: Hmac<Sha256>,
}

impl MacAuthenticator {
    /// Compute the record MAC over bytes assembled by the record layer.
    pub fn compute(&self, authenticated: &[u8]) -> Vec<u8> {
        let mut mac = self.mac.clone();
        mac.update(authenticated);
        mac.finalize().into_bytes().to_vec()
    }
}

enum CipherState {
    Gcm128(aes_gcm::Aes128Gcm),
    Gcm256(aes_gcm::Aes256Gcm),
    Cbc { key: SecretKey, chain_iv: [u8; 16] },
}

impl fmt::Debug for CipherState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CipherState::Gcm128(_) => write!(f, "Gcm128"),
            CipherState::Gcm256(_) => write!(f, "Gcm256"),
            CipherState::Cbc { key, chain_iv } => {
                write!(f, "Cbc({} byte key, {} byte iv)", key.len(), chain_iv.len())
            }
        }
    }
}

#[derive(Debug)]
struct CipherCore {
    version: ProtocolVersion,
    state: CipherState,
    iv: SecretKey,
    authenticator: Authenticator,
}

/// Read-direction record protection, bound to one direction of one
/// connection. Superseded, never mutated, on renegotiation.
#[derive(Debug)]
pub struct ReadCipher {
    core: CipherCore,
}

/// Write-direction record protection.
#[derive(Debug)]
pub struct WriteCipher {
    core: CipherCore,
}

macro_rules! cipher_accessors {
    ($t:ident) => {
        impl $t {
            pub fn version(&self) -> ProtocolVersion {
                self.core.version
            }

            pub fn is_aead(&self) -> bool {
                matches!(
                    self.core.state,
                    CipherState::Gcm128(_) | CipherState::Gcm256(_)
                )
            }

            pub fn authenticator(&self) -> &Authenticator {
                &self.core.authenticator
            }

            /// Fixed IV from the key block (GCM salt or CBC chaining seed).
            pub fn fixed_iv(&self) -> &[u8] {
                &self.core.iv[..]
            }
        }
    };
}

cipher_accessors!(ReadCipher);
cipher_accessors!(WriteCipher);

impl BulkCipher {
    pub fn create_read_cipher(
        &self,
        authenticator: Authenticator,
        version: ProtocolVersion,
        key: &SecretKey,
        iv: &SecretKey,
        random: &mut dyn RngCore,
    ) -> Option<ReadCipher> {
        let core = self.create_core(authenticator, version, key, iv, random)?;
        Some(ReadCipher { core })
    }

    pub fn create_write_cipher(
        &self,
        authenticator: Authenticator,
        version: ProtocolVersion,
        key: &SecretKey,
        iv: &SecretKey,
        random: &mut dyn RngCore,
    ) -> Option<WriteCipher> {
        let core = self.create_core(authenticator, version, key, iv, random)?;
        Some(WriteCipher { core })
    }

    /// Generator availability per version, in the shape of the record
    /// layer's cipher table: GCM exists for TLS 1.2 only, CBC for
    /// TLS 1.0 through 1.2, nothing legacy for 1.3.
    fn create_core(
        &self,
        authenticator: Authenticator,
        version: ProtocolVersion,
        key: &SecretKey,
        iv: &SecretKey,
        random: &mut dyn RngCore,
    ) -> Option<CipherCore> {
        use ProtocolVersion::*;

        let state = match (self, version) {
            (BulkCipher::Aes128Gcm, TLS1_2) => {
                CipherState::Gcm128(aes_gcm::Aes128Gcm::new_from_slice(key).ok()?)
            }
            (BulkCipher::Aes256Gcm, TLS1_2) => {
                CipherState::Gcm256(aes_gcm::Aes256Gcm::new_from_slice(key).ok()?)
            }
            (BulkCipher::Aes128Cbc | BulkCipher::Aes256Cbc, TLS1_0 | TLS1_1 | TLS1_2) => {
                let mut chain_iv = [0u8; 16];
                if version == TLS1_0 {
                    // TLS 1.0 chains from the key block IV.
                    if iv.len() != 16 {
                        return None;
                    }
                    chain_iv.copy_from_slice(iv);
                } else {
                    // TLS 1.1+ uses an explicit per-record IV; seed it.
                    random.fill_bytes(&mut chain_iv);
                }
                CipherState::Cbc {
                    key: key.clone(),
                    chain_iv,
                }
            }
            _ => return None,
        };

        Some(CipherCore {
            version,
            state,
            iv: iv.clone(),
            authenticator,
        })
    }
}
