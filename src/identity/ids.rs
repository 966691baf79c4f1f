//! Global and local dimension identifiers.
//!
//! A dimension owned by a coordinate system is globally identified as
//! `owner#local`. Standalone dimensions use their local id on its own.

/// Separator between the owning coordinate system id and a local id.
pub const NAMESPACE_SEPARATOR: char = '#';

/// Splits a global id into `(owner_id, local_id)` at the first separator.
///
/// Total: a string without a separator yields `(None, s)`.
///
/// ```
/// use coordreg::identity::parse_global_id;
///
/// assert_eq!(parse_global_id("stage#x"), (Some("stage"), "x"));
/// assert_eq!(parse_global_id("x"), (None, "x"));
/// ```
pub fn parse_global_id(s: &str) -> (Option<&str>, &str) {
    match s.split_once(NAMESPACE_SEPARATOR) {
        Some((owner, local)) => (Some(owner), local),
        None => (None, s),
    }
}

/// Joins an optional owner id and a local id into a global id.
pub fn join_global_id(owner: Option<&str>, local_id: &str) -> String {
    match owner {
        Some(owner) => format!("{owner}{NAMESPACE_SEPARATOR}{local_id}"),
        None => local_id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_splits_on_first_separator() {
        assert_eq!(parse_global_id("a#b#c"), (Some("a"), "b#c"));
    }

    #[test]
    fn test_parse_without_separator() {
        assert_eq!(parse_global_id("dim_0"), (None, "dim_0"));
        assert_eq!(parse_global_id(""), (None, ""));
    }

    #[test]
    fn test_parse_empty_parts() {
        assert_eq!(parse_global_id("#x"), (Some(""), "x"));
        assert_eq!(parse_global_id("cs#"), (Some("cs"), ""));
    }

    #[test]
    fn test_join_roundtrip() {
        let id = join_global_id(Some("physical"), "y");
        assert_eq!(id, "physical#y");
        assert_eq!(parse_global_id(&id), (Some("physical"), "y"));
        assert_eq!(join_global_id(None, "y"), "y");
    }
}
