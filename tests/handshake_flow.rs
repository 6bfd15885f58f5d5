use std::sync::Arc;

use subtls::change_cipher_spec;
use subtls::cookie::CookieSpec;
use subtls::crypto::{KeyDerivation, LegacyKeyDerivation};
use subtls::dispatch::{self, Action, HandshakePhase};
use subtls::types::{CipherSuite, ContentType, Extension, ExtensionType, ProtocolVersion, Role};
use subtls::{Config, Error, ExtensionSlot, TransportContext};

fn transport(config: &Arc<Config>, role: Role, version: ProtocolVersion, suite: CipherSuite) -> TransportContext {
    let mut tc = TransportContext::new(config.clone());
    tc.begin_handshake(role, version, suite);
    tc
}

fn legacy_keys(tc: &mut TransportContext, suite: CipherSuite, key_block: &[u8]) {
    let kd = LegacyKeyDerivation::from_key_block(suite, key_block).unwrap();
    tc.handshake.as_mut().unwrap().set_key_derivation(KeyDerivation::Legacy(kd));
}

#[test]
fn hello_retry_cookie_round() {
    let _ = env_logger::try_init();

    let suite = CipherSuite::ECDHE_RSA_AES128_GCM_SHA256;
    let server_config = Arc::new(Config::default());
    let client_config = Arc::new(Config::default());

    let mut server = transport(&server_config, Role::Server, ProtocolVersion::TLS1_3, suite);
    let mut client = transport(&client_config, Role::Client, ProtocolVersion::TLS1_3, suite);

    // Initial ClientHello carries no cookie.
    let client_hc = client.handshake.as_mut().unwrap();
    let initial = dispatch::handle(
        client_hc,
        ExtensionType::Cookie,
        HandshakePhase::ClientHello,
        Action::Produce,
        &[],
    )
    .unwrap();
    assert_eq!(initial, None);

    // Server answers with a HelloRetryRequest carrying a minted cookie.
    let client_hello = b"ClientHello: versions, key shares, suites";
    let server_hc = server.handshake.as_mut().unwrap();
    let payload = dispatch::handle(
        server_hc,
        ExtensionType::Cookie,
        HandshakePhase::HelloRetryRequest,
        Action::Produce,
        client_hello,
    )
    .unwrap()
    .expect("cookie available, extension expected");

    let mut hrr_extensions = Vec::new();
    Extension::new(ExtensionType::Cookie, &payload)
        .serialize(&mut hrr_extensions)
        .unwrap();

    // Client walks the extension block and stashes the cookie.
    let client_hc = client.handshake.as_mut().unwrap();
    dispatch::consume_extensions(client_hc, HandshakePhase::HelloRetryRequest, &hrr_extensions)
        .unwrap();

    // The retried ClientHello echoes the cookie byte for byte.
    let echoed = dispatch::handle(
        client_hc,
        ExtensionType::Cookie,
        HandshakePhase::ClientHello,
        Action::Produce,
        &[],
    )
    .unwrap()
    .expect("stored cookie must be echoed");
    assert_eq!(echoed, payload);

    // Server consumes it and the post-parse update validates it.
    let server_hc = server.handshake.as_mut().unwrap();
    dispatch::handle(
        server_hc,
        ExtensionType::Cookie,
        HandshakePhase::ClientHello,
        Action::Consume,
        &echoed,
    )
    .unwrap();
    dispatch::handle(
        server_hc,
        ExtensionType::Cookie,
        HandshakePhase::ClientHello,
        Action::Update,
        client_hello,
    )
    .unwrap();

    // A second HelloRetryRequest reproduces the stored cookie unchanged.
    let reproduced = dispatch::handle(
        server_hc,
        ExtensionType::Cookie,
        HandshakePhase::HelloRetryRequest,
        Action::Reproduce,
        &[],
    )
    .unwrap()
    .expect("stored cookie must be reproduced");
    assert_eq!(reproduced, payload);
}

#[test]
fn tampered_cookie_terminates_handshake() {
    let _ = env_logger::try_init();

    let suite = CipherSuite::ECDHE_RSA_AES128_GCM_SHA256;
    let config = Arc::new(Config::default());
    let mut server = transport(&config, Role::Server, ProtocolVersion::TLS1_3, suite);

    let client_hello = b"retried ClientHello";
    let server_hc = server.handshake.as_mut().unwrap();
    let payload = dispatch::handle(
        server_hc,
        ExtensionType::Cookie,
        HandshakePhase::HelloRetryRequest,
        Action::Produce,
        client_hello,
    )
    .unwrap()
    .unwrap();

    // Echo with one bit flipped in the cookie body.
    let mut tampered = payload.clone();
    let last = tampered.len() - 1;
    tampered[last] ^= 0x40;
    dispatch::handle(
        server_hc,
        ExtensionType::Cookie,
        HandshakePhase::ClientHello,
        Action::Consume,
        &tampered,
    )
    .unwrap();

    let err = dispatch::handle(
        server_hc,
        ExtensionType::Cookie,
        HandshakePhase::ClientHello,
        Action::Update,
        client_hello,
    );
    let err = err.unwrap_err();
    assert_eq!(err, Error::UnexpectedMessage("unrecognized cookie"));
    assert_eq!(err.alert().to_string(), "unexpected_message");
}

#[test]
fn client_without_cookie_extension_proceeds() {
    let _ = env_logger::try_init();

    let suite = CipherSuite::ECDHE_RSA_AES128_GCM_SHA256;
    let config = Arc::new(Config::default());
    let mut server = transport(&config, Role::Server, ProtocolVersion::TLS1_3, suite);
    let server_hc = server.handshake.as_mut().unwrap();

    // No cookie was consumed; the update step is a silent pass.
    assert!(server_hc.extension(ExtensionSlot::ChCookie).is_none());
    let result = dispatch::handle(
        server_hc,
        ExtensionType::Cookie,
        HandshakePhase::ClientHello,
        Action::Update,
        b"ClientHello without cookie",
    );
    assert_eq!(result, Ok(None));
}

#[test]
fn legacy_change_cipher_spec_flight() {
    let _ = env_logger::try_init();

    let suite = CipherSuite::ECDHE_RSA_AES128_GCM_SHA256;
    let key_block: Vec<u8> = (0..40u8).collect();
    let config = Arc::new(Config::default());

    let mut client = transport(&config, Role::Client, ProtocolVersion::TLS1_2, suite);
    let mut server = transport(&config, Role::Server, ProtocolVersion::TLS1_2, suite);
    legacy_keys(&mut client, suite, &key_block);
    legacy_keys(&mut server, suite, &key_block);

    // Client switches its write direction and sends the 1-byte body.
    let body = change_cipher_spec::produce(&mut client).unwrap();
    assert_eq!(body, vec![0x01]);
    assert_eq!(client.record_layer.write_epoch(), 1);

    // Server consumes it and switches its read direction.
    server.consume_record(ContentType::ChangeCipherSpec, &body).unwrap();
    assert_eq!(server.record_layer.read_epoch(), 1);

    // Both directions derive from the client write secrets.
    let client_write = client.record_layer.write_cipher().unwrap();
    let server_read = server.record_layer.read_cipher().unwrap();
    assert_eq!(client_write.fixed_iv(), server_read.fixed_iv());
    assert!(client_write.is_aead());

    // Replayed ChangeCipherSpec is fatal regardless of body.
    let err = server.consume_record(ContentType::ChangeCipherSpec, &body);
    assert_eq!(
        err.unwrap_err(),
        Error::UnexpectedMessage("no consumer registered for content type")
    );

    // And the reverse flight.
    let body = change_cipher_spec::produce(&mut server).unwrap();
    client.consume_record(ContentType::ChangeCipherSpec, &body).unwrap();
    assert_eq!(client.record_layer.read_epoch(), 1);
    assert_eq!(server.record_layer.write_epoch(), 1);
}

#[test]
fn cbc_flight_uses_mac_keys() {
    let _ = env_logger::try_init();

    let suite = CipherSuite::RSA_AES128_CBC_SHA256;
    let (mac, key, iv) = suite.key_lengths();
    let key_block: Vec<u8> = (0..2 * (mac + key + iv)).map(|i| i as u8).collect();
    let config = Arc::new(Config::default());

    let mut client = transport(&config, Role::Client, ProtocolVersion::TLS1_2, suite);
    legacy_keys(&mut client, suite, &key_block);

    let body = change_cipher_spec::produce(&mut client).unwrap();
    assert_eq!(body, vec![0x01]);

    let cipher = client.record_layer.write_cipher().unwrap();
    assert!(!cipher.is_aead());
    assert!(!cipher.authenticator().is_aead_null());
}

#[test]
fn cookie_disabled_is_silent() {
    let _ = env_logger::try_init();

    let suite = CipherSuite::ECDHE_RSA_AES128_GCM_SHA256;
    let config = Arc::new(Config::builder().cookie_enabled(false).build().unwrap());
    let mut server = transport(&config, Role::Server, ProtocolVersion::TLS1_3, suite);
    let server_hc = server.handshake.as_mut().unwrap();

    // The peer sent a cookie anyway; policy says ignore it.
    let mut payload = Vec::new();
    CookieSpec::new(vec![1, 2, 3]).serialize(&mut payload).unwrap();
    dispatch::handle(
        server_hc,
        ExtensionType::Cookie,
        HandshakePhase::ClientHello,
        Action::Consume,
        &payload,
    )
    .unwrap();
    assert!(server_hc.extension(ExtensionSlot::ChCookie).is_none());

    // Nothing is produced either.
    let produced = dispatch::handle(
        server_hc,
        ExtensionType::Cookie,
        HandshakePhase::HelloRetryRequest,
        Action::Produce,
        b"hello",
    )
    .unwrap();
    assert_eq!(produced, None);
}
