//! Prefix contexts and compact key expansion.

use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::error::CoordregError;
use crate::normalize::VALUE_KEY;

/// Key under which a document carries its prefix table.
pub const CONTEXT_KEY: &str = "@context";

const ID_KEY: &str = "@id";

/// `prefix -> namespace` table of one document.
pub type Context = BTreeMap<String, String>;

/// Reads a context object. Entries may be plain strings or `{"@id": ...}`
/// objects; keyword entries such as `@vocab` are ignored.
pub fn parse_context(value: &Value) -> Result<Context, CoordregError> {
    let Value::Object(map) = value else {
        return Err(CoordregError::InvalidDocument(format!(
            "{CONTEXT_KEY} must be an object, got {value}"
        )));
    };

    let mut context = Context::new();
    for (prefix, entry) in map {
        if prefix.starts_with('@') {
            continue;
        }
        let namespace = match entry {
            Value::String(ns) => ns.clone(),
            Value::Object(obj) => match obj.get(ID_KEY).or_else(|| obj.get(VALUE_KEY)) {
                Some(Value::String(ns)) => ns.clone(),
                _ => {
                    return Err(CoordregError::InvalidDocument(format!(
                        "context entry '{prefix}' has no {ID_KEY}"
                    )))
                }
            },
            other => {
                return Err(CoordregError::InvalidDocument(format!(
                    "context entry '{prefix}' must be a string, got {other}"
                )))
            }
        };
        context.insert(prefix.clone(), namespace);
    }
    Ok(context)
}

/// Renders a context back into a JSON object.
pub fn context_to_value(context: &Context) -> Value {
    Value::Object(
        context
            .iter()
            .map(|(prefix, ns)| (prefix.clone(), Value::String(ns.clone())))
            .collect::<Map<String, Value>>(),
    )
}

/// Expands a `prefix:local` key against `context`.
///
/// Keys whose prefix is unknown, full IRIs (`scheme://...`) and keywords
/// are returned unchanged.
///
/// ```
/// use coordreg::document::{expand_key, Context};
///
/// let context = Context::from([("tr".to_string(), "https://example/tr/".to_string())]);
/// assert_eq!(expand_key("tr:translation", &context), "https://example/tr/translation");
/// assert_eq!(expand_key("https://example/tr/scale", &context), "https://example/tr/scale");
/// assert_eq!(expand_key("name", &context), "name");
/// ```
pub fn expand_key(key: &str, context: &Context) -> String {
    if let Some((prefix, local)) = key.split_once(':') {
        if !local.starts_with("//") {
            if let Some(namespace) = context.get(prefix) {
                return format!("{namespace}{local}");
            }
        }
    }
    key.to_string()
}
