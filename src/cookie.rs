//! Cookie extension (RFC 8446 section 4.2.2).
//!
//! A server can defer per-connection state across a HelloRetryRequest by
//! handing the client a stateless cookie, which the client echoes in its
//! retried ClientHello. Four producer/consumer roles cover the two
//! directions, plus a reproducer for a server re-sending an unchanged
//! cookie and an update step that validates the echoed cookie once the
//! full ClientHello is parsed.
//!
//! All roles share one policy: if the extension is not available under
//! the current configuration the role is a silent no-op. Malformed wire
//! bytes are always a fatal decode error.

use std::fmt;
use std::ops::Deref;

use hmac::{Hmac, Mac};
use log::{debug, trace};
use rand::RngCore;
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::codec;
use crate::context::{ExtensionSlot, HandshakeContext};
use crate::types::{ExtensionType, ProtocolVersion};
use crate::Error;

/// A decoded cookie extension payload. Immutable after creation; a retry
/// round stores a fresh value rather than mutating this one.
#[derive(Clone, PartialEq, Eq)]
pub struct CookieSpec(Vec<u8>);

impl CookieSpec {
    pub fn new(cookie: Vec<u8>) -> Self {
        CookieSpec(cookie)
    }

    /// Decode `uint16 length || opaque cookie[length]`.
    ///
    /// Anything under 3 bytes cannot hold the length field plus content
    /// and is rejected before the length is even read. Semantic
    /// validation is deferred to the cookie manager.
    pub fn parse(input: &[u8]) -> Result<(&[u8], CookieSpec), Error> {
        if input.len() < 3 {
            return Err(Error::DecodeError("insufficient cookie extension data"));
        }
        let (rest, cookie) = codec::read_bytes16(input)?;
        Ok((rest, CookieSpec(cookie.to_vec())))
    }

    pub fn serialize(&self, output: &mut Vec<u8>) -> Result<(), Error> {
        codec::write_bytes16(output, &self.0)
    }
}

impl Deref for CookieSpec {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Debug for CookieSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CookieSpec({:02x?})", &self.0)
    }
}

/// ClientHello producer: echo a previously received HelloRetryRequest
/// cookie. A zero-length stored cookie is treated as absent.
pub fn produce_ch_cookie(
    hc: &mut HandshakeContext,
    _input: &[u8],
) -> Result<Option<Vec<u8>>, Error> {
    if !hc.is_available(ExtensionType::Cookie) {
        trace!("Ignore unavailable cookie extension");
        return Ok(None);
    }

    let Some(spec) = hc.extension(ExtensionSlot::HrrCookie) else {
        return Ok(None);
    };
    if spec.is_empty() {
        return Ok(None);
    }

    let mut output = Vec::with_capacity(2 + spec.len());
    spec.serialize(&mut output)?;
    Ok(Some(output))
}

/// ClientHello consumer: decode and stash the echoed cookie. No
/// validation happens here; that waits for [`update_ch_cookie`] once the
/// whole ClientHello has been parsed.
pub fn consume_ch_cookie(
    hc: &mut HandshakeContext,
    input: &[u8],
) -> Result<Option<Vec<u8>>, Error> {
    if !hc.is_available(ExtensionType::Cookie) {
        trace!("Ignore unavailable cookie extension");
        return Ok(None);
    }

    let (_, spec) = CookieSpec::parse(input)?;
    hc.set_extension(ExtensionSlot::ChCookie, spec);
    Ok(None)
}

/// ClientHello post-processing: hand the echoed cookie to the cookie
/// manager for version-specific validation against the full ClientHello.
/// The extension is optional, so an absent cookie is fine; a rejected
/// one is fatal.
pub fn update_ch_cookie(
    hc: &mut HandshakeContext,
    client_hello: &[u8],
) -> Result<Option<Vec<u8>>, Error> {
    let Some(spec) = hc.extension(ExtensionSlot::ChCookie) else {
        return Ok(None);
    };

    if !hc
        .config()
        .cookie_manager()
        .is_cookie_valid(hc, client_hello, spec)
    {
        return Err(Error::UnexpectedMessage("unrecognized cookie"));
    }
    Ok(None)
}

/// HelloRetryRequest producer: mint a fresh cookie bound to the current
/// ClientHello.
pub fn produce_hrr_cookie(
    hc: &mut HandshakeContext,
    client_hello: &[u8],
) -> Result<Option<Vec<u8>>, Error> {
    if !hc.is_available(ExtensionType::Cookie) {
        trace!("Ignore unavailable cookie extension");
        return Ok(None);
    }

    let cookie = hc.config().cookie_manager().create_cookie(hc, client_hello);
    debug!("Minted HelloRetryRequest cookie ({} bytes)", cookie.len());

    let mut output = Vec::with_capacity(2 + cookie.len());
    codec::write_bytes16(&mut output, &cookie)?;
    Ok(Some(output))
}

/// HelloRetryRequest consumer (client side): stash the cookie for the
/// retried ClientHello to echo.
pub fn consume_hrr_cookie(
    hc: &mut HandshakeContext,
    input: &[u8],
) -> Result<Option<Vec<u8>>, Error> {
    if !hc.is_available(ExtensionType::Cookie) {
        trace!("Ignore unavailable cookie extension");
        return Ok(None);
    }

    let (_, spec) = CookieSpec::parse(input)?;
    hc.set_extension(ExtensionSlot::HrrCookie, spec);
    Ok(None)
}

/// HelloRetryRequest reproducer: a second retry re-emits the cookie the
/// client already echoed, byte for byte. Never re-mints.
pub fn reproduce_hrr_cookie(
    hc: &mut HandshakeContext,
    _input: &[u8],
) -> Result<Option<Vec<u8>>, Error> {
    if !hc.is_available(ExtensionType::Cookie) {
        trace!("Ignore unavailable cookie extension");
        return Ok(None);
    }

    let Some(spec) = hc.extension(ExtensionSlot::ChCookie) else {
        return Ok(None);
    };
    if spec.is_empty() {
        return Ok(None);
    }

    let mut output = Vec::with_capacity(2 + spec.len());
    spec.serialize(&mut output)?;
    Ok(Some(output))
}

/// Mints and validates stateless retry cookies.
///
/// Semantic cookie validation lives behind this trait so deployments can
/// bind cookies to whatever they consider the client's proof of
/// reachability.
pub trait HelloCookieManager: fmt::Debug + Send + Sync {
    /// Mint a cookie bound to the current ClientHello content.
    fn create_cookie(&self, hc: &HandshakeContext, client_hello: &[u8]) -> Vec<u8>;

    /// Check a cookie echoed by the client against the full ClientHello.
    fn is_cookie_valid(&self, hc: &HandshakeContext, client_hello: &[u8], cookie: &[u8]) -> bool;
}

/// Default cookie manager: HMAC-SHA256 over the ClientHello with a
/// random per-process secret. Token layout:
/// `uint16 protocol_version || opaque8 mac`.
pub struct HmacCookieManager {
    secret: Zeroizing<[u8; 32]>,
}

impl HmacCookieManager {
    pub fn new() -> Self {
        let mut secret = Zeroizing::new([0u8; 32]);
        rand::thread_rng().fill_bytes(&mut *secret);
        HmacCookieManager { secret }
    }

    fn compute_mac(&self, client_hello: &[u8]) -> Option<Vec<u8>> {
        let mut mac = Hmac::<Sha256>::new_from_slice(&*self.secret).ok()?;
        mac.update(client_hello);
        Some(mac.finalize().into_bytes().to_vec())
    }
}

impl Default for HmacCookieManager {
    fn default() -> Self {
        HmacCookieManager::new()
    }
}

impl fmt::Debug for HmacCookieManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HmacCookieManager")
    }
}

impl HelloCookieManager for HmacCookieManager {
    fn create_cookie(&self, hc: &HandshakeContext, client_hello: &[u8]) -> Vec<u8> {
        let mac = self.compute_mac(client_hello).unwrap_or_default();
        let mut cookie = Vec::with_capacity(3 + mac.len());
        hc.negotiated_version.serialize(&mut cookie);
        // A SHA-256 tag always fits the 8-bit length.
        cookie.push(mac.len() as u8);
        cookie.extend_from_slice(&mac);
        cookie
    }

    fn is_cookie_valid(&self, hc: &HandshakeContext, client_hello: &[u8], cookie: &[u8]) -> bool {
        let Ok((rest, version)) = ProtocolVersion::parse(cookie) else {
            return false;
        };
        if version != hc.negotiated_version {
            return false;
        }
        let Ok((_, tag)) = codec::read_bytes8(rest) else {
            return false;
        };

        let Ok(mut mac) = Hmac::<Sha256>::new_from_slice(&*self.secret) else {
            return false;
        };
        mac.update(client_hello);
        // Constant-time comparison.
        mac.verify_slice(tag).is_ok()
    }
}
