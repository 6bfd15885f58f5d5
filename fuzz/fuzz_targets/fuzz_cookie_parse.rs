#![no_main]

//! Fuzz target for cookie extension decoding.
//!
//! The cookie payload is attacker-controlled bytes straight off the
//! wire: `uint16 length || opaque cookie[length]`. Decoding must either
//! yield a CookieSpec or fail with a decode error; any panic is a bug.
//! Valid decodes are re-serialized and decoded again to check the
//! round-trip.

use libfuzzer_sys::fuzz_target;

use subtls::cookie::CookieSpec;

fuzz_target!(|data: &[u8]| {
    let Ok((_, spec)) = CookieSpec::parse(data) else {
        return;
    };

    let mut encoded = Vec::new();
    spec.serialize(&mut encoded).expect("decoded cookie fits a 16-bit length");

    // An empty cookie re-encodes to 2 bytes, below the decode minimum.
    if spec.is_empty() {
        return;
    }

    let (rest, again) = CookieSpec::parse(&encoded).expect("re-decode of encoded cookie");
    assert!(rest.is_empty());
    assert_eq!(&*again, &*spec);
});
