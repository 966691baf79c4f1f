//! Collision-free namespace prefixes, scoped to one serialization.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

/// Prefixes that would be mistaken for IRI schemes in compact keys.
pub const RESERVED_PREFIXES: &[&str] = &["http", "https", "urn", "file", "_"];

/// Assigns each namespace a short prefix.
///
/// An abbreviator lives for exactly one serialization call: the same
/// namespace always gets the same prefix within it, and different calls
/// are free to reuse prefixes for unrelated namespaces.
///
/// Candidates are tried in order and the first one not already taken by a
/// different namespace wins:
///
/// 1. a prefix hint registered for the namespace, if any
/// 2. the last path segment, truncated to 4 characters
/// 3. the last path segment, truncated to 2 characters
/// 4. `{domain:2}-{segment:2}`
/// 5. the first 4 characters of the domain
/// 6. `{meaningful:4}-{hash:4}` from a CRC-32C of the namespace
/// 7. the namespace itself
///
/// ```
/// use coordreg::namespace::NamespaceAbbreviator;
///
/// let mut abbrev = NamespaceAbbreviator::new();
/// let a = abbrev.abbreviation_for("https://example.org/transforms/");
/// let b = abbrev.abbreviation_for("https://other.org/transforms/");
/// assert_eq!(a, "tran");
/// assert_ne!(a, b);
/// assert_eq!(abbrev.abbreviation_for("https://example.org/transforms/"), a);
/// ```
#[derive(Clone, Debug, Default)]
pub struct NamespaceAbbreviator {
    by_namespace: BTreeMap<String, String>,
    by_prefix: BTreeMap<String, String>,
    hints: BTreeMap<String, String>,
    reserved: BTreeSet<String>,
}

impl NamespaceAbbreviator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an abbreviator that tries the given `(namespace, prefix)`
    /// hints before the generated candidates.
    pub fn with_hints<I, N, P>(hints: I) -> Self
    where
        I: IntoIterator<Item = (N, P)>,
        N: Into<String>,
        P: Into<String>,
    {
        Self {
            hints: hints
                .into_iter()
                .map(|(n, p)| (n.into(), p.into()))
                .collect(),
            ..Self::default()
        }
    }

    /// Returns the prefix for `namespace`, assigning one on first use.
    pub fn abbreviation_for(&mut self, namespace: &str) -> String {
        if let Some(prefix) = self.by_namespace.get(namespace) {
            return prefix.clone();
        }

        let parts = NamespaceParts::parse(namespace);
        let hint = self.hints.get(namespace).map(|h| sanitize(h));
        let prefix = hint
            .into_iter()
            .chain(parts.candidates())
            .find(|candidate| self.is_available(candidate))
            .unwrap_or_else(|| {
                let fallback = parts.hashed(namespace);
                if self.is_available(&fallback) {
                    fallback
                } else {
                    namespace.to_string()
                }
            });

        debug!(namespace, prefix = %prefix, "assigned namespace prefix");
        self.by_namespace
            .insert(namespace.to_string(), prefix.clone());
        self.by_prefix.insert(prefix.clone(), namespace.to_string());
        prefix
    }

    /// Keeps `prefix` out of every later assignment.
    ///
    /// Used for prefixes that already appear in keys the caller writes
    /// verbatim. Reserving a prefix that is already assigned has no effect
    /// on the existing assignment.
    pub fn reserve(&mut self, prefix: impl Into<String>) {
        self.reserved.insert(prefix.into());
    }

    /// Returns the namespace a prefix was assigned to.
    pub fn namespace_for(&self, prefix: &str) -> Option<&str> {
        self.by_prefix.get(prefix).map(String::as_str)
    }

    /// The `prefix -> namespace` table assigned so far.
    pub fn context(&self) -> &BTreeMap<String, String> {
        &self.by_prefix
    }

    pub fn len(&self) -> usize {
        self.by_prefix.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_prefix.is_empty()
    }

    fn is_available(&self, candidate: &str) -> bool {
        !candidate.is_empty()
            && !RESERVED_PREFIXES.contains(&candidate)
            && !self.by_prefix.contains_key(candidate)
            && !self.reserved.contains(candidate)
    }
}

/// The meaningful pieces of a namespace IRI, lowercased and reduced to
/// ASCII alphanumerics.
#[derive(Debug)]
struct NamespaceParts {
    domain: String,
    segment: Option<String>,
}

impl NamespaceParts {
    fn parse(namespace: &str) -> Self {
        let rest = namespace
            .split_once("://")
            .map(|(_, rest)| rest)
            .unwrap_or(namespace);
        let (authority, path) = rest.split_once('/').unwrap_or((rest, ""));

        let host = authority.split(':').next().unwrap_or(authority);
        let domain = host
            .split('.')
            .find(|label| !label.is_empty() && *label != "www")
            .map(sanitize)
            .unwrap_or_default();

        let segment = path
            .split(|c: char| c == '/' || c == '#')
            .map(sanitize)
            .filter(|s| !s.is_empty())
            .last();

        Self { domain, segment }
    }

    fn candidates(&self) -> Vec<String> {
        let mut out = Vec::with_capacity(4);
        if let Some(segment) = &self.segment {
            out.push(truncate(segment, 4));
            out.push(truncate(segment, 2));
            if !self.domain.is_empty() {
                out.push(format!(
                    "{}-{}",
                    truncate(&self.domain, 2),
                    truncate(segment, 2)
                ));
            }
        }
        out.push(truncate(&self.domain, 4));
        out
    }

    fn hashed(&self, namespace: &str) -> String {
        let meaningful = self
            .segment
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.domain);
        let meaningful = if meaningful.is_empty() {
            "ns".to_string()
        } else {
            truncate(meaningful, 4)
        };
        let hash = crc32c::crc32c(namespace.as_bytes());
        format!("{meaningful}-{:04x}", hash & 0xffff)
    }
}

/// Fuzz-only entrypoint for namespace splitting and candidate generation.
#[cfg(feature = "fuzzing")]
pub fn fuzz_prefix_candidates(namespace: &str) -> Vec<String> {
    let parts = NamespaceParts::parse(namespace);
    let mut out = parts.candidates();
    out.push(parts.hashed(namespace));
    out
}

fn sanitize(s: &str) -> String {
    s.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

fn truncate(s: &str, n: usize) -> String {
    s.chars().take(n).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_namespace_same_prefix() {
        let mut abbrev = NamespaceAbbreviator::new();
        let first = abbrev.abbreviation_for("https://example.org/tr/");
        for _ in 0..3 {
            assert_eq!(abbrev.abbreviation_for("https://example.org/tr/"), first);
        }
        assert_eq!(abbrev.len(), 1);
    }

    #[test]
    fn test_candidate_order() {
        let mut abbrev = NamespaceAbbreviator::new();
        let namespaces = [
            "https://a.org/transforms/",
            "https://b.org/transforms/",
            "https://c.org/transforms/",
            "https://d.org/transforms/",
        ];
        let prefixes: Vec<String> = namespaces
            .iter()
            .map(|ns| abbrev.abbreviation_for(ns))
            .collect();
        assert_eq!(prefixes, ["tran", "tr", "c-tr", "d-tr"]);
    }

    #[test]
    fn test_hash_fallback() {
        let mut abbrev = NamespaceAbbreviator::new();
        abbrev.abbreviation_for("https://x.org/transforms/");
        abbrev.abbreviation_for("https://x.org/a/transforms/");
        abbrev.abbreviation_for("https://x.org/b/transforms/");
        abbrev.abbreviation_for("https://x.org/c/transforms/");
        let hashed = abbrev.abbreviation_for("https://x.org/d/transforms/");
        assert!(hashed.starts_with("tran-"), "got {hashed}");
        assert_eq!(hashed.len(), "tran-".len() + 4);
    }

    #[test]
    fn test_domain_only_namespace() {
        let mut abbrev = NamespaceAbbreviator::new();
        assert_eq!(abbrev.abbreviation_for("https://www.example.org/"), "exam");
    }

    #[test]
    fn test_hash_namespace_fragment_style() {
        let mut abbrev = NamespaceAbbreviator::new();
        assert_eq!(
            abbrev.abbreviation_for("http://www.w3.org/2001/XMLSchema#"),
            "xmls"
        );
    }

    #[test]
    fn test_reserved_prefixes_are_skipped() {
        let mut abbrev = NamespaceAbbreviator::new();
        assert_eq!(abbrev.abbreviation_for("https://example.org/https/"), "ht");
    }

    #[test]
    fn test_hint_wins_when_free() {
        let mut abbrev =
            NamespaceAbbreviator::with_hints([("https://example.org/transforms/", "xf")]);
        assert_eq!(abbrev.abbreviation_for("https://example.org/transforms/"), "xf");
        assert_eq!(abbrev.namespace_for("xf"), Some("https://example.org/transforms/"));
    }

    #[test]
    fn test_hint_collision_falls_back() {
        let mut abbrev = NamespaceAbbreviator::with_hints([
            ("https://a.org/one/", "p"),
            ("https://b.org/two/", "p"),
        ]);
        assert_eq!(abbrev.abbreviation_for("https://a.org/one/"), "p");
        assert_eq!(abbrev.abbreviation_for("https://b.org/two/"), "two");
    }

    #[test]
    fn test_reserved_prefix_is_skipped_even_as_hint() {
        let mut abbrev =
            NamespaceAbbreviator::with_hints([("https://example.org/transforms/", "tr")]);
        abbrev.reserve("tr");
        abbrev.reserve("tran");
        assert_eq!(abbrev.abbreviation_for("https://example.org/transforms/"), "ex-tr");
        assert_eq!(abbrev.namespace_for("tr"), None);
    }

    #[test]
    fn test_independent_instances() {
        let mut first = NamespaceAbbreviator::new();
        let mut second = NamespaceAbbreviator::new();
        first.abbreviation_for("https://a.org/transforms/");
        assert_eq!(second.abbreviation_for("https://b.org/transforms/"), "tran");
    }
}
