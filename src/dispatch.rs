//! Tagged-variant dispatch for the extension producer/consumer roles.
//!
//! The surrounding handshake driver invokes extensions at fixed points
//! in the message sequence. Rather than trait objects per role, a static
//! table maps (extension type, message, action) to a plain function; the
//! per-version and per-role branching happens inside the handlers
//! against the handshake context.

use once_cell::sync::Lazy;

use crate::context::HandshakeContext;
use crate::cookie;
use crate::types::{Extension, ExtensionType};
use crate::Error;

/// An extension role handler. Producers return the encoded extension
/// payload (or `None` when the extension is omitted); consumers and
/// update steps return `None`.
pub type ExtensionHandler =
    fn(&mut HandshakeContext, &[u8]) -> Result<Option<Vec<u8>>, Error>;

/// The handshake message an extension handler is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakePhase {
    ClientHello,
    HelloRetryRequest,
}

/// What the driver is doing at the attachment point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Produce,
    Consume,
    /// Post-parse commit step, run after the whole message is consumed.
    Update,
    /// Re-emit previously negotiated content unchanged.
    Reproduce,
}

struct Entry {
    extension: ExtensionType,
    phase: HandshakePhase,
    action: Action,
    handler: ExtensionHandler,
}

static HANDLERS: Lazy<Vec<Entry>> = Lazy::new(|| {
    use Action::*;
    use HandshakePhase::*;

    vec![
        Entry {
            extension: ExtensionType::Cookie,
            phase: ClientHello,
            action: Produce,
            handler: cookie::produce_ch_cookie,
        },
        Entry {
            extension: ExtensionType::Cookie,
            phase: ClientHello,
            action: Consume,
            handler: cookie::consume_ch_cookie,
        },
        Entry {
            extension: ExtensionType::Cookie,
            phase: ClientHello,
            action: Update,
            handler: cookie::update_ch_cookie,
        },
        Entry {
            extension: ExtensionType::Cookie,
            phase: HelloRetryRequest,
            action: Produce,
            handler: cookie::produce_hrr_cookie,
        },
        Entry {
            extension: ExtensionType::Cookie,
            phase: HelloRetryRequest,
            action: Consume,
            handler: cookie::consume_hrr_cookie,
        },
        Entry {
            extension: ExtensionType::Cookie,
            phase: HelloRetryRequest,
            action: Reproduce,
            handler: cookie::reproduce_hrr_cookie,
        },
    ]
});

pub fn lookup(
    extension: ExtensionType,
    phase: HandshakePhase,
    action: Action,
) -> Option<ExtensionHandler> {
    HANDLERS
        .iter()
        .find(|e| e.extension == extension && e.phase == phase && e.action == action)
        .map(|e| e.handler)
}

/// Run the handler registered for this slot. An extension with no
/// handler for the slot is passed over; unknown extensions are never an
/// error at this layer.
pub fn handle(
    hc: &mut HandshakeContext,
    extension: ExtensionType,
    phase: HandshakePhase,
    action: Action,
    input: &[u8],
) -> Result<Option<Vec<u8>>, Error> {
    match lookup(extension, phase, action) {
        Some(handler) => handler(hc, input),
        None => Ok(None),
    }
}

/// Walk a serialized extension block, routing each entry to the consumer
/// registered for the phase. Extensions with no consumer are passed over;
/// a truncated or overlong entry is a fatal decode error.
pub fn consume_extensions(
    hc: &mut HandshakeContext,
    phase: HandshakePhase,
    block: &[u8],
) -> Result<(), Error> {
    let mut input = block;
    while !input.is_empty() {
        let (rest, ext) = Extension::parse(input)
            .map_err(|_| Error::DecodeError("malformed extension block"))?;
        handle(hc, ext.extension_type, phase, Action::Consume, ext.extension_data)?;
        input = rest;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::types::{CipherSuite, ProtocolVersion, Role};
    use crate::{Config, ExtensionSlot, TransportContext};

    #[test]
    fn cookie_roles_are_wired() {
        for phase in [HandshakePhase::ClientHello, HandshakePhase::HelloRetryRequest] {
            assert!(lookup(ExtensionType::Cookie, phase, Action::Produce).is_some());
            assert!(lookup(ExtensionType::Cookie, phase, Action::Consume).is_some());
        }
        assert!(lookup(
            ExtensionType::Cookie,
            HandshakePhase::ClientHello,
            Action::Update
        )
        .is_some());
        assert!(lookup(
            ExtensionType::Cookie,
            HandshakePhase::HelloRetryRequest,
            Action::Reproduce
        )
        .is_some());
        // No reproduction on the ClientHello side.
        assert!(lookup(
            ExtensionType::Cookie,
            HandshakePhase::ClientHello,
            Action::Reproduce
        )
        .is_none());
    }

    #[test]
    fn unknown_extension_is_skipped() {
        let mut tc = TransportContext::new(Arc::new(Config::default()));
        let hc = tc.begin_handshake(
            Role::Server,
            ProtocolVersion::TLS1_3,
            CipherSuite::ECDHE_RSA_AES128_GCM_SHA256,
        );

        let result = handle(
            hc,
            ExtensionType::Unknown(0xFF01),
            HandshakePhase::ClientHello,
            Action::Consume,
            &[0xDE, 0xAD],
        );
        assert_eq!(result, Ok(None));
    }

    #[test]
    fn dispatch_reaches_cookie_consumer() {
        let mut tc = TransportContext::new(Arc::new(Config::default()));
        let hc = tc.begin_handshake(
            Role::Server,
            ProtocolVersion::TLS1_3,
            CipherSuite::ECDHE_RSA_AES128_GCM_SHA256,
        );

        handle(
            hc,
            ExtensionType::Cookie,
            HandshakePhase::ClientHello,
            Action::Consume,
            &[0x00, 0x01, 0x7E],
        )
        .unwrap();
        assert_eq!(&**hc.extension(ExtensionSlot::ChCookie).unwrap(), &[0x7E]);
    }

    #[test]
    fn block_walker_stashes_cookie_and_skips_unknown() {
        let mut tc = TransportContext::new(Arc::new(Config::default()));
        let hc = tc.begin_handshake(
            Role::Server,
            ProtocolVersion::TLS1_3,
            CipherSuite::ECDHE_RSA_AES128_GCM_SHA256,
        );

        let mut block = Vec::new();
        Extension::new(ExtensionType::Unknown(0xFF01), &[0xDE, 0xAD])
            .serialize(&mut block)
            .unwrap();
        Extension::new(ExtensionType::Cookie, &[0x00, 0x02, 0x55, 0x66])
            .serialize(&mut block)
            .unwrap();

        consume_extensions(hc, HandshakePhase::ClientHello, &block).unwrap();
        assert_eq!(&**hc.extension(ExtensionSlot::ChCookie).unwrap(), &[0x55, 0x66]);
    }

    #[test]
    fn block_walker_rejects_truncated_entry() {
        let mut tc = TransportContext::new(Arc::new(Config::default()));
        let hc = tc.begin_handshake(
            Role::Server,
            ProtocolVersion::TLS1_3,
            CipherSuite::ECDHE_RSA_AES128_GCM_SHA256,
        );

        // Declares 4 payload bytes, carries 1.
        let block = [0x00, 0x2C, 0x00, 0x04, 0xAA];
        let err = consume_extensions(hc, HandshakePhase::ClientHello, &block);
        assert_eq!(
            err.unwrap_err(),
            Error::DecodeError("malformed extension block")
        );
    }
}
