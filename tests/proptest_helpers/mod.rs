#![allow(dead_code)]

use proptest::prelude::*;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

/// Identifier-safe labels: no separator, never empty.
pub fn arb_label() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,7}"
}

/// Labels drawn from a small pool so that collisions actually happen.
pub fn arb_colliding_label() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        3 => Just(None),
        1 => prop::sample::select(vec!["x", "y", "z", "dim_0", "dim_1", "dim_3"])
            .prop_map(|s| Some(s.to_string())),
    ]
}

pub fn arb_unit() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "index",
        "Index",
        "micrometer",
        "micrometers",
        "nanometer",
        "second",
        "millisecond",
        "pixel",
        "arbitrary",
    ])
    .prop_map(str::to_string)
}

/// Namespace IRIs that share hosts and trailing segments often.
pub fn arb_namespace() -> impl Strategy<Value = String> {
    (
        prop::sample::select(vec!["https", "http"]),
        prop::sample::select(vec!["example.org", "www.example.org", "w3.org", "ex.com", "a.io"]),
        prop::collection::vec(
            prop::sample::select(vec!["transforms", "schema", "v1", "tr", "ns", "2001"]),
            0..3,
        ),
        prop::sample::select(vec!["/", "#", ""]),
    )
        .prop_map(|(scheme, host, segments, tail)| {
            let mut ns = format!("{scheme}://{host}");
            for segment in segments {
                ns.push('/');
                ns.push_str(segment);
            }
            ns.push_str(tail);
            ns
        })
}
