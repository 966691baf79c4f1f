//! Decoding and encoding of qualified-key documents.
//!
//! A document is a JSON object whose keys are either compact
//! `prefix:local_name` forms, resolved through its `@context`, or full
//! identifiers. Decoding dispatches every key the registry knows to a typed
//! [`Entity`]; all other keys pass through as raw values, since documents
//! routinely mix managed and unmanaged keys. Encoding reverses this with
//! prefixes chosen fresh for the call, so for any document `doc`:
//!
//! `decode(encode(decode(doc))) == decode(doc)`
//!
//! The spelling of keys may change on the way (an unusual prefix in the
//! input becomes the abbreviator's choice in the output).

pub mod chain;
mod context;

pub use chain::{read_chain, ChainDocument, ChainFormat, TransformStep};
pub use context::{context_to_value, expand_key, parse_context, Context, CONTEXT_KEY};

use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use tracing::debug;

use crate::error::CoordregError;
use crate::registry::{qualify, Entity, Registry, RegistryError};

/// A decoded value: a typed entity or a value passed through untouched.
#[derive(Clone, Debug, PartialEq)]
pub enum DecodedValue {
    Entity(Entity),
    Raw(Value),
}

/// A decoded document, keyed by expanded identifier.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DecodedDocument {
    pub entries: BTreeMap<String, DecodedValue>,
}

impl DecodedDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&DecodedValue> {
        self.entries.get(key)
    }

    pub fn entity(&self, key: &str) -> Option<&Entity> {
        match self.entries.get(key) {
            Some(DecodedValue::Entity(entity)) => Some(entity),
            _ => None,
        }
    }

    /// Typed entities, in key order.
    pub fn entities(&self) -> impl Iterator<Item = (&str, &Entity)> {
        self.entries.iter().filter_map(|(key, value)| match value {
            DecodedValue::Entity(entity) => Some((key.as_str(), entity)),
            DecodedValue::Raw(_) => None,
        })
    }

    pub fn insert_entity(&mut self, key: impl Into<String>, entity: Entity) {
        self.entries.insert(key.into(), DecodedValue::Entity(entity));
    }

    pub fn insert_raw(&mut self, key: impl Into<String>, value: Value) {
        self.entries.insert(key.into(), DecodedValue::Raw(value));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Decodes a document through `registry`.
///
/// # Errors
/// `InvalidDocument` if the document or its context is malformed;
/// `ConstructionFailed` (wrapped in [`CoordregError::Registry`]) if a known
/// kind carries a value its constructor rejects. Unknown identifiers are
/// not errors.
pub fn decode(document: &Value, registry: &Registry) -> Result<DecodedDocument, CoordregError> {
    let Value::Object(map) = document else {
        return Err(CoordregError::InvalidDocument(
            "document must be a JSON object".to_string(),
        ));
    };

    let context = match map.get(CONTEXT_KEY) {
        Some(value) => parse_context(value)?,
        None => Context::new(),
    };

    let mut decoded = DecodedDocument::new();
    for (key, value) in map {
        if key == CONTEXT_KEY {
            continue;
        }
        let full_id = expand_key(key, &context);
        match registry.create(&full_id, value.clone()) {
            Ok(entity) => decoded.insert_entity(full_id, entity),
            Err(RegistryError::UnknownIdentifier { .. }) => {
                debug!(key = %key, "passing through unmanaged key");
                decoded.insert_raw(full_id, value.clone());
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(decoded)
}

/// Encodes a decoded document with freshly assigned prefixes.
///
/// Entities are written under `prefix:local_name`, using the name their key
/// is registered under or else the name their kind is registered under.
/// Raw values keep their key, and any prefix a raw compact key already uses
/// is withheld from the new context so the key still means the same thing
/// when the output is decoded.
///
/// # Errors
/// `InvalidDocument` if two entries would be written under the same key.
pub fn encode(decoded: &DecodedDocument, registry: &Registry) -> Result<Value, CoordregError> {
    let mut abbrev = registry.abbreviator();
    for key in decoded.entries.keys() {
        if let Some(prefix) = compact_prefix(key) {
            abbrev.reserve(prefix);
        }
    }

    let mut out = Map::new();
    for (key, value) in &decoded.entries {
        let (out_key, out_value) = match value {
            DecodedValue::Entity(entity) => {
                let short = match registry.get(key) {
                    Some(entry) => {
                        let prefix = abbrev.abbreviation_for(&entry.namespace);
                        format!("{prefix}:{}", entry.local_name)
                    }
                    None => registry.short_name(entity, &mut abbrev),
                };
                (short, entity.to_value()?)
            }
            DecodedValue::Raw(raw) => (key.clone(), raw.clone()),
        };
        if out.contains_key(&out_key) {
            return Err(CoordregError::InvalidDocument(format!(
                "'{key}' would be encoded under '{out_key}', which is already in use"
            )));
        }
        out.insert(out_key, out_value);
    }

    if !abbrev.is_empty() {
        let context: Context = abbrev
            .context()
            .iter()
            .map(|(prefix, ns)| (prefix.clone(), qualify(ns, "")))
            .collect();
        out.insert(CONTEXT_KEY.to_string(), context_to_value(&context));
    }
    Ok(Value::Object(out))
}

/// The prefix of a `prefix:local` key, if the key is in compact form.
fn compact_prefix(key: &str) -> Option<&str> {
    match key.split_once(':') {
        Some((prefix, local)) if !local.starts_with("//") => Some(prefix),
        _ => None,
    }
}

/// Decodes a document from a JSON string.
pub fn decode_str(json: &str, registry: &Registry) -> Result<DecodedDocument, CoordregError> {
    let value: Value = serde_json::from_str(json)?;
    decode(&value, registry)
}

/// Encodes a decoded document to a pretty-printed JSON string.
pub fn encode_string(
    decoded: &DecodedDocument,
    registry: &Registry,
) -> Result<String, CoordregError> {
    Ok(serde_json::to_string_pretty(&encode(decoded, registry)?)?)
}

/// Reads a JSON document from a file.
pub fn read_document(path: &Path) -> Result<Value, CoordregError> {
    let file = File::open(path).map_err(CoordregError::Io)?;
    let reader = BufReader::new(file);

    serde_json::from_reader(reader).map_err(|source| CoordregError::DocumentParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes a JSON document to a file.
pub fn write_document(path: &Path, document: &Value) -> Result<(), CoordregError> {
    let file = File::create(path).map_err(CoordregError::Io)?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, document).map_err(|source| {
        CoordregError::DocumentWrite {
            path: path.to_path_buf(),
            source,
        }
    })
}
