//! Fuzz target for chain document parsing and validation.

#![no_main]

use coordreg::document::chain::chain_from_json_str;
use coordreg::registry::default_registry;
use coordreg::validation::{validate_chain, ValidateOptions};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let Ok(doc) = chain_from_json_str(text) else {
        return;
    };
    if let Ok(chain) = doc.build(default_registry()) {
        let _ = validate_chain(&chain, &ValidateOptions::default());
    }
});
