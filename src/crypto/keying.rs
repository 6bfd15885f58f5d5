//! Traffic key material and the per-role key derivation adapter.

use std::fmt;
use std::ops::Deref;

use zeroize::Zeroizing;

use crate::types::{CipherSuite, Role};
use crate::Error;

/// Derived symmetric key material. Zeroed on drop, opaque in Debug output.
#[derive(Clone)]
pub struct SecretKey(Zeroizing<Vec<u8>>);

impl SecretKey {
    pub fn new(bytes: Vec<u8>) -> Self {
        SecretKey(Zeroizing::new(bytes))
    }
}

impl Deref for SecretKey {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretKey({} bytes)", self.0.len())
    }
}

/// Names of the traffic secrets a legacy key block is split into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrafficKeyName {
    ClientMacKey,
    ServerMacKey,
    ClientWriteKey,
    ServerWriteKey,
    ClientWriteIv,
    ServerWriteIv,
}

impl TrafficKeyName {
    pub fn mac_key(role: Role) -> Self {
        match role {
            Role::Client => TrafficKeyName::ClientMacKey,
            Role::Server => TrafficKeyName::ServerMacKey,
        }
    }

    pub fn write_key(role: Role) -> Self {
        match role {
            Role::Client => TrafficKeyName::ClientWriteKey,
            Role::Server => TrafficKeyName::ServerWriteKey,
        }
    }

    pub fn write_iv(role: Role) -> Self {
        match role {
            Role::Client => TrafficKeyName::ClientWriteIv,
            Role::Server => TrafficKeyName::ServerWriteIv,
        }
    }
}

/// Key derivation negotiated for the handshake.
///
/// ChangeCipherSpec only ever operates on the legacy variant; presenting
/// the 1.3 variant to it is an internal fault, not a peer-triggerable one.
#[derive(Debug)]
pub enum KeyDerivation {
    Legacy(LegacyKeyDerivation),
    Tls13(Tls13KeyDerivation),
}

impl KeyDerivation {
    pub fn as_legacy(&self) -> Option<&LegacyKeyDerivation> {
        match self {
            KeyDerivation::Legacy(kd) => Some(kd),
            KeyDerivation::Tls13(_) => None,
        }
    }
}

/// Pre-1.3 key block split into named traffic secrets.
///
/// The block is laid out client-before-server: MAC keys, then write keys,
/// then write IVs (RFC 5246 section 6.3). AEAD suites have zero-length MAC
/// keys, so the MAC slots are absent for them.
#[derive(Debug)]
pub struct LegacyKeyDerivation {
    client_mac_key: Option<SecretKey>,
    server_mac_key: Option<SecretKey>,
    client_write_key: SecretKey,
    server_write_key: SecretKey,
    client_write_iv: SecretKey,
    server_write_iv: SecretKey,
}

impl LegacyKeyDerivation {
    /// Split a derived key block according to the suite's key lengths.
    pub fn from_key_block(suite: CipherSuite, key_block: &[u8]) -> Result<Self, Error> {
        let (mac_len, key_len, iv_len) = suite.key_lengths();
        let expected = 2 * (mac_len + key_len + iv_len);
        if key_block.len() != expected {
            return Err(Error::HandshakeFailure("key block length mismatch"));
        }

        let mut rest = key_block;
        let mut next = |len: usize| {
            let (chunk, tail) = rest.split_at(len);
            rest = tail;
            SecretKey::new(chunk.to_vec())
        };

        let client_mac = next(mac_len);
        let server_mac = next(mac_len);
        let client_mac_key = (mac_len > 0).then_some(client_mac);
        let server_mac_key = (mac_len > 0).then_some(server_mac);

        Ok(LegacyKeyDerivation {
            client_mac_key,
            server_mac_key,
            client_write_key: next(key_len),
            server_write_key: next(key_len),
            client_write_iv: next(iv_len),
            server_write_iv: next(iv_len),
        })
    }

    /// Fetch a named traffic secret. Returns `None` when the suite does
    /// not derive that secret (MAC keys on AEAD suites).
    pub fn traffic_key(&self, name: TrafficKeyName) -> Option<SecretKey> {
        use TrafficKeyName::*;
        match name {
            ClientMacKey => self.client_mac_key.clone(),
            ServerMacKey => self.server_mac_key.clone(),
            ClientWriteKey => Some(self.client_write_key.clone()),
            ServerWriteKey => Some(self.server_write_key.clone()),
            ClientWriteIv => Some(self.client_write_iv.clone()),
            ServerWriteIv => Some(self.server_write_iv.clone()),
        }
    }
}

/// Placeholder for the TLS 1.3 key schedule, which lives outside this
/// engine. Its presence is what the legacy ChangeCipherSpec path rejects.
#[derive(Debug)]
pub struct Tls13KeyDerivation;
