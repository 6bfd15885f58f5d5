//! ChangeCipherSpec sub-protocol (content type 20).
//!
//! For handshakes up to TLS 1.2 this switches one direction of the record
//! layer from the pending to the active cipher. For TLS 1.3 the message
//! survives only as a middlebox compatibility shim: the body is still
//! validated, but nothing is installed.
//!
//! Exactly one delivery is permitted per handshake per direction. The
//! consumer deregisters itself before looking at the body, so a second
//! record of this content type fails in dispatch no matter what it
//! carries.

use log::debug;

use crate::crypto::{Authenticator, TrafficKeyName};
use crate::{Error, TransportContext};

/// The only valid message body: a single byte with value 1.
pub const BODY: [u8; 1] = [0x01];

fn validate_body(body: &[u8]) -> Result<(), Error> {
    if body.len() != 1 || body[0] != 0x01 {
        return Err(Error::UnexpectedMessage("malformed ChangeCipherSpec body"));
    }
    Ok(())
}

/// Switch the write direction to the newly negotiated cipher and return
/// the message body for the caller to frame as a record.
///
/// Only meaningful for legacy handshakes; a missing or 1.3 key
/// derivation is an internal fault.
pub fn produce(tc: &mut TransportContext) -> Result<Vec<u8>, Error> {
    let hc = tc
        .handshake
        .as_ref()
        .ok_or(Error::HandshakeFailure("no handshake in progress"))?;
    let kd = hc
        .key_derivation
        .as_ref()
        .and_then(|kd| kd.as_legacy())
        .ok_or(Error::UnsupportedOperation(
            "ChangeCipherSpec requires a legacy key derivation",
        ))?;

    let role = hc.role;
    let suite = hc.negotiated_suite;
    let version = hc.negotiated_version;
    let bulk = suite.bulk_cipher();

    let authenticator = if bulk.is_aead() {
        Authenticator::aead_null(version)
    } else {
        let mac_key = kd
            .traffic_key(TrafficKeyName::mac_key(role))
            .ok_or(Error::HandshakeFailure("no MAC key derived for local role"))?;
        Authenticator::mac(suite.mac_algorithm(), &mac_key)?
    };

    let write_key = kd
        .traffic_key(TrafficKeyName::write_key(role))
        .ok_or(Error::HandshakeFailure("no write key derived for local role"))?;
    let write_iv = kd
        .traffic_key(TrafficKeyName::write_iv(role))
        .ok_or(Error::HandshakeFailure("no write IV derived for local role"))?;

    let cipher = bulk
        .create_write_cipher(
            authenticator,
            version,
            &write_key,
            &write_iv,
            &mut rand::thread_rng(),
        )
        .ok_or(Error::IllegalParameter(
            "no write cipher for negotiated suite and version",
        ))?;

    tc.record_layer.change_write_ciphers(cipher);
    debug!("Changed write cipher: {:?} ({})", suite, version);

    Ok(BODY.to_vec())
}

/// Consume a received ChangeCipherSpec and switch the read direction.
pub fn consume(tc: &mut TransportContext, body: &[u8]) -> Result<(), Error> {
    // One delivery per handshake per direction; drop the registration
    // before anything else so a replay fails in dispatch.
    tc.deregister(crate::types::ContentType::ChangeCipherSpec);

    validate_body(body)?;

    let hc = tc
        .handshake
        .as_ref()
        .ok_or(Error::HandshakeFailure("no handshake in progress"))?;
    let kd = match &hc.key_derivation {
        Some(kd) => kd.as_legacy().ok_or(Error::UnsupportedOperation(
            "ChangeCipherSpec requires a legacy key derivation",
        ))?,
        None => {
            return Err(Error::UnexpectedMessage(
                "ChangeCipherSpec before key material negotiated",
            ))
        }
    };

    // Mirror the producer with the peer's key names.
    let peer = hc.role.peer();
    let suite = hc.negotiated_suite;
    let version = hc.negotiated_version;
    let bulk = suite.bulk_cipher();

    let authenticator = if bulk.is_aead() {
        Authenticator::aead_null(version)
    } else {
        let mac_key = kd
            .traffic_key(TrafficKeyName::mac_key(peer))
            .ok_or(Error::HandshakeFailure("no MAC key derived for peer role"))?;
        Authenticator::mac(suite.mac_algorithm(), &mac_key)?
    };

    let read_key = kd
        .traffic_key(TrafficKeyName::write_key(peer))
        .ok_or(Error::HandshakeFailure("no write key derived for peer role"))?;
    let read_iv = kd
        .traffic_key(TrafficKeyName::write_iv(peer))
        .ok_or(Error::HandshakeFailure("no write IV derived for peer role"))?;

    let cipher = bulk
        .create_read_cipher(
            authenticator,
            version,
            &read_key,
            &read_iv,
            &mut rand::thread_rng(),
        )
        .ok_or(Error::IllegalParameter(
            "no read cipher for negotiated suite and version",
        ))?;

    tc.record_layer.change_read_ciphers(cipher);
    debug!("Changed read cipher: {:?} ({})", suite, version);

    Ok(())
}

/// TLS 1.3 compatibility consumer: validate and discard.
pub fn consume_tls13(tc: &mut TransportContext, body: &[u8]) -> Result<(), Error> {
    tc.deregister(crate::types::ContentType::ChangeCipherSpec);

    validate_body(body)?;

    debug!("Discarded compatibility ChangeCipherSpec");
    Ok(())
}
