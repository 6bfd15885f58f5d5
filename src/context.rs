//! Connection-scoped state the sub-protocol modules read and mutate.
//!
//! A [`TransportContext`] lives for the connection and owns the record
//! layer slots plus the registered content-type consumers. A
//! [`HandshakeContext`] lives for one handshake attempt and is discarded
//! or superseded wholesale; nothing here is shared between connections.

use std::sync::Arc;

use tinyvec::ArrayVec;

use crate::change_cipher_spec;
use crate::cookie::CookieSpec;
use crate::crypto::KeyDerivation;
use crate::record::RecordLayer;
use crate::types::{CipherSuite, ContentType, ExtensionType, ProtocolVersion, Role};
use crate::{Config, Error};

/// Slots in the handshake's negotiated-extension map. Keyed by direction:
/// a cookie received in a ClientHello is distinct from one received in a
/// HelloRetryRequest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtensionSlot {
    ChCookie,
    HrrCookie,
}

/// State for one handshake attempt.
#[derive(Debug)]
pub struct HandshakeContext {
    pub role: Role,
    pub negotiated_version: ProtocolVersion,
    pub negotiated_suite: CipherSuite,
    pub key_derivation: Option<KeyDerivation>,
    config: Arc<Config>,
    ch_cookie: Option<CookieSpec>,
    hrr_cookie: Option<CookieSpec>,
}

impl HandshakeContext {
    fn new(
        config: Arc<Config>,
        role: Role,
        negotiated_version: ProtocolVersion,
        negotiated_suite: CipherSuite,
    ) -> Self {
        HandshakeContext {
            role,
            negotiated_version,
            negotiated_suite,
            key_derivation: None,
            config,
            ch_cookie: None,
            hrr_cookie: None,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn set_key_derivation(&mut self, key_derivation: KeyDerivation) {
        self.key_derivation = Some(key_derivation);
    }

    /// Whether an extension is available under the current configuration
    /// and negotiated protocol. An unavailable extension is a policy
    /// no-op for all its producers and consumers, never an error.
    pub fn is_available(&self, extension: ExtensionType) -> bool {
        match extension {
            ExtensionType::Cookie => {
                self.config.cookie_enabled() && self.negotiated_version.is_tls13_plus()
            }
            _ => false,
        }
    }

    pub fn extension(&self, slot: ExtensionSlot) -> Option<&CookieSpec> {
        match slot {
            ExtensionSlot::ChCookie => self.ch_cookie.as_ref(),
            ExtensionSlot::HrrCookie => self.hrr_cookie.as_ref(),
        }
    }

    /// Store a decoded extension value. A later store for the same slot
    /// supersedes the earlier one (retry loop reproduction).
    pub fn set_extension(&mut self, slot: ExtensionSlot, spec: CookieSpec) {
        match slot {
            ExtensionSlot::ChCookie => self.ch_cookie = Some(spec),
            ExtensionSlot::HrrCookie => self.hrr_cookie = Some(spec),
        }
    }
}

/// Connection-scoped context: record layer slots, registered content-type
/// consumers and the handshake in progress (if any).
#[derive(Debug)]
pub struct TransportContext {
    config: Arc<Config>,
    pub record_layer: RecordLayer,
    pub handshake: Option<HandshakeContext>,
    registered: ArrayVec<[u8; 4]>,
}

impl TransportContext {
    pub fn new(config: Arc<Config>) -> Self {
        TransportContext {
            config,
            record_layer: RecordLayer::new(),
            handshake: None,
            registered: ArrayVec::new(),
        }
    }

    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    /// Start a handshake attempt, registering the ChangeCipherSpec
    /// consumer for its one permitted delivery.
    pub fn begin_handshake(
        &mut self,
        role: Role,
        negotiated_version: ProtocolVersion,
        negotiated_suite: CipherSuite,
    ) -> &mut HandshakeContext {
        self.register(ContentType::ChangeCipherSpec);
        self.handshake.insert(HandshakeContext::new(
            self.config.clone(),
            role,
            negotiated_version,
            negotiated_suite,
        ))
    }

    /// Discard the handshake context (completion or abort).
    pub fn finish_handshake(&mut self) {
        self.handshake = None;
    }

    pub fn register(&mut self, content_type: ContentType) {
        let value = content_type.as_u8();
        if !self.registered.contains(&value) {
            self.registered.push(value);
        }
    }

    pub fn deregister(&mut self, content_type: ContentType) {
        let value = content_type.as_u8();
        self.registered.retain(|v| *v != value);
    }

    pub fn is_registered(&self, content_type: ContentType) -> bool {
        self.registered.contains(&content_type.as_u8())
    }

    /// Route a record body to the registered consumer for its content
    /// type. A content type with no registered consumer is rejected
    /// before the body is even looked at; this is what makes a second
    /// ChangeCipherSpec delivery fail fast.
    pub fn consume_record(&mut self, content_type: ContentType, body: &[u8]) -> Result<(), Error> {
        if !self.is_registered(content_type) {
            return Err(Error::UnexpectedMessage(
                "no consumer registered for content type",
            ));
        }

        match content_type {
            ContentType::ChangeCipherSpec => {
                let tls13 = self
                    .handshake
                    .as_ref()
                    .map(|hc| hc.negotiated_version.is_tls13_plus())
                    .unwrap_or(false);
                if tls13 {
                    change_cipher_spec::consume_tls13(self, body)
                } else {
                    change_cipher_spec::consume(self, body)
                }
            }
            _ => Err(Error::UnexpectedMessage("unhandled content type")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_deregister() {
        let mut tc = TransportContext::new(Arc::new(Config::default()));
        assert!(!tc.is_registered(ContentType::ChangeCipherSpec));

        tc.register(ContentType::ChangeCipherSpec);
        tc.register(ContentType::ChangeCipherSpec);
        assert!(tc.is_registered(ContentType::ChangeCipherSpec));

        tc.deregister(ContentType::ChangeCipherSpec);
        assert!(!tc.is_registered(ContentType::ChangeCipherSpec));
    }

    #[test]
    fn extension_slots_are_independent() {
        let mut tc = TransportContext::new(Arc::new(Config::default()));
        let hc = tc.begin_handshake(
            Role::Server,
            ProtocolVersion::TLS1_3,
            CipherSuite::ECDHE_RSA_AES128_GCM_SHA256,
        );

        hc.set_extension(ExtensionSlot::ChCookie, CookieSpec::new(vec![1]));
        assert!(hc.extension(ExtensionSlot::HrrCookie).is_none());
        assert_eq!(&**hc.extension(ExtensionSlot::ChCookie).unwrap(), &[1]);

        // Superseded, not appended.
        hc.set_extension(ExtensionSlot::ChCookie, CookieSpec::new(vec![2]));
        assert_eq!(&**hc.extension(ExtensionSlot::ChCookie).unwrap(), &[2]);
    }
}
