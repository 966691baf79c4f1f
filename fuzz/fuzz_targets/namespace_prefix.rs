//! Fuzz target for namespace prefix generation.
//!
//! Every generated candidate must be ASCII, whatever the input.

#![no_main]

use coordreg::namespace::fuzz_prefix_candidates;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(namespace) = std::str::from_utf8(data) else {
        return;
    };

    for candidate in fuzz_prefix_candidates(namespace) {
        assert!(candidate.is_ascii());
    }
});
