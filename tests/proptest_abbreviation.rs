use std::collections::{BTreeSet, HashSet};

use coordreg::namespace::{NamespaceAbbreviator, RESERVED_PREFIXES};
use proptest::prelude::*;

mod proptest_helpers;

proptest! {
    #![proptest_config(proptest_helpers::proptest_config())]

    #[test]
    fn prefixes_are_stable_and_distinct(
        namespaces in prop::collection::vec(proptest_helpers::arb_namespace(), 1..16),
    ) {
        let mut abbrev = NamespaceAbbreviator::new();
        let first: Vec<String> = namespaces.iter().map(|ns| abbrev.abbreviation_for(ns)).collect();
        let again: Vec<String> = namespaces.iter().map(|ns| abbrev.abbreviation_for(ns)).collect();
        prop_assert_eq!(&first, &again);

        let distinct_namespaces: BTreeSet<&String> = namespaces.iter().collect();
        let distinct_prefixes: HashSet<&String> = first.iter().collect();
        prop_assert_eq!(distinct_namespaces.len(), distinct_prefixes.len());
        prop_assert_eq!(abbrev.len(), distinct_namespaces.len());

        for (ns, prefix) in namespaces.iter().zip(&first) {
            prop_assert_eq!(abbrev.namespace_for(prefix), Some(ns.as_str()));
            prop_assert!(!prefix.is_empty());
            prop_assert!(!RESERVED_PREFIXES.contains(&prefix.as_str()));
        }
    }

    #[test]
    fn earlier_assignments_only_displace_taken_prefixes(
        ns in proptest_helpers::arb_namespace(),
        others in prop::collection::vec(proptest_helpers::arb_namespace(), 0..8),
    ) {
        let expected = NamespaceAbbreviator::new().abbreviation_for(&ns);

        let mut used = NamespaceAbbreviator::new();
        let earlier: Vec<String> = others.iter().map(|o| used.abbreviation_for(o)).collect();
        let got = used.abbreviation_for(&ns);

        if let Some(pos) = others.iter().position(|o| o == &ns) {
            prop_assert_eq!(&got, &earlier[pos]);
        } else if earlier.contains(&expected) {
            prop_assert_ne!(&got, &expected);
            prop_assert!(!earlier.contains(&got));
        } else {
            prop_assert_eq!(&got, &expected);
        }
    }

    #[test]
    fn reserved_prefixes_are_never_assigned(
        namespaces in prop::collection::vec(proptest_helpers::arb_namespace(), 1..8),
        reserved in prop::collection::vec("[a-z]{1,4}", 0..6),
    ) {
        let mut abbrev = NamespaceAbbreviator::new();
        for prefix in &reserved {
            abbrev.reserve(prefix.clone());
        }
        for ns in &namespaces {
            let prefix = abbrev.abbreviation_for(ns);
            prop_assert!(!reserved.contains(&prefix), "{} got reserved {}", ns, prefix);
        }
    }
}
