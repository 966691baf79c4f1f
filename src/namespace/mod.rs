//! Namespace handling: short prefixes for namespace IRIs.

mod abbrev;

pub use abbrev::{NamespaceAbbreviator, RESERVED_PREFIXES};

#[cfg(feature = "fuzzing")]
pub use abbrev::fuzz_prefix_candidates;
