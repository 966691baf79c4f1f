//! Conversion of expanded graph values into plain values.
//!
//! Expanded documents wrap every value: scalars become single-element
//! sequences of `{"@value": ...}` objects, typed literals carry an `@type`,
//! and ordered lists sit under `@list`. Constructors want plain values, so
//! [`normalize`] strips that wrapping. It is total and side-effect free.

use serde_json::{Number, Value};

pub const VALUE_KEY: &str = "@value";
pub const TYPE_KEY: &str = "@type";
pub const LIST_KEY: &str = "@list";

/// Literal types with a known conversion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LiteralType {
    Float,
    Integer,
    Boolean,
}

impl LiteralType {
    /// Resolves a datatype IRI or compact name by its local part, so that
    /// `xsd:double` and `http://www.w3.org/2001/XMLSchema#double` agree.
    fn from_type_name(type_name: &str) -> Option<Self> {
        let local = type_name
            .rsplit(|c: char| c == '#' || c == ':' || c == '/')
            .next()
            .unwrap_or(type_name);
        match local {
            "float" | "double" | "decimal" => Some(LiteralType::Float),
            "integer" | "int" | "long" | "short" | "byte" | "nonNegativeInteger"
            | "positiveInteger" | "nonPositiveInteger" | "negativeInteger" | "unsignedLong"
            | "unsignedInt" | "unsignedShort" | "unsignedByte" => Some(LiteralType::Integer),
            "boolean" => Some(LiteralType::Boolean),
            _ => None,
        }
    }

    fn convert(self, payload: &Value) -> Option<Value> {
        match self {
            LiteralType::Float => {
                let f = match payload {
                    Value::Number(n) => n.as_f64()?,
                    Value::String(s) => s.trim().parse::<f64>().ok()?,
                    _ => return None,
                };
                Number::from_f64(f).map(Value::Number)
            }
            LiteralType::Integer => {
                let i = match payload {
                    Value::Number(n) => n.as_i64()?,
                    Value::String(s) => s.trim().parse::<i64>().ok()?,
                    _ => return None,
                };
                Some(Value::from(i))
            }
            LiteralType::Boolean => match payload {
                Value::Bool(b) => Some(Value::Bool(*b)),
                Value::String(s) => match s.trim() {
                    "true" | "1" => Some(Value::Bool(true)),
                    "false" | "0" => Some(Value::Bool(false)),
                    _ => None,
                },
                _ => None,
            },
        }
    }
}

/// Converts an expanded graph value into a plain value.
///
/// - A sequence whose elements are all wrappers collapses to the bare
///   unwrapped scalar when it has one element, otherwise to a plain
///   sequence of unwrapped values.
/// - A typed literal `{"@value": v, "@type": t}` is converted for float,
///   integer and boolean types; other types pass the payload through.
/// - `{"@list": [...]}` becomes a plain sequence.
/// - Anything else is returned unchanged.
///
/// ```
/// use coordreg::normalize::normalize;
/// use serde_json::json;
///
/// assert_eq!(normalize(json!([{"@value": 3}])), json!(3));
/// assert_eq!(
///     normalize(json!([{"@value": "1.5", "@type": "xsd:double"}, {"@value": 2.0}])),
///     json!([1.5, 2.0])
/// );
/// assert_eq!(normalize(json!([10, 20, 5])), json!([10, 20, 5]));
/// ```
pub fn normalize(value: Value) -> Value {
    match value {
        Value::Array(items) if !items.is_empty() && items.iter().all(is_wrapper) => {
            let mut unwrapped: Vec<Value> = items.into_iter().map(unwrap).collect();
            if unwrapped.len() == 1 {
                unwrapped.pop().unwrap_or(Value::Null)
            } else {
                Value::Array(unwrapped)
            }
        }
        value if is_wrapper(&value) => unwrap(value),
        other => other,
    }
}

/// Returns true for `{"@value": ...}` and `{"@list": [...]}` objects.
pub fn is_wrapper(value: &Value) -> bool {
    match value {
        Value::Object(map) => map.contains_key(VALUE_KEY) || map.contains_key(LIST_KEY),
        _ => false,
    }
}

fn unwrap(value: Value) -> Value {
    let Value::Object(mut map) = value else {
        return value;
    };

    if let Some(list) = map.remove(LIST_KEY) {
        return match list {
            Value::Array(items) => Value::Array(items.into_iter().map(unwrap).collect()),
            other => unwrap(other),
        };
    }

    let Some(payload) = map.remove(VALUE_KEY) else {
        return Value::Object(map);
    };

    map.get(TYPE_KEY)
        .and_then(Value::as_str)
        .and_then(LiteralType::from_type_name)
        .and_then(|ty| ty.convert(&payload))
        .unwrap_or(payload)
}
