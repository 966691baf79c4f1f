//! Fuzz target for document decoding and encoding.
//!
//! Arbitrary bytes are decoded through the default registry and, when that
//! succeeds, encoded again, checking for panics, crashes, or hangs.

#![no_main]

use coordreg::document::{decode_str, encode};
use coordreg::registry::default_registry;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let registry = default_registry();
    if let Ok(decoded) = decode_str(text, registry) {
        let _ = encode(&decoded, registry);
    }
});
