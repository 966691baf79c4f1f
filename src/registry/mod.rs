//! Identifier-to-constructor registry.
//!
//! The registry maps fully qualified identifiers (IRIs) to constructors
//! and maps entity kinds back to the namespace and local name they were
//! registered under. Registration happens through an explicit
//! [`RegistrationScope`] that carries the current namespace:
//!
//! ```
//! use coordreg::registry::{Entity, EntityKind, Registry};
//! use coordreg::transform::Transform;
//! use serde_json::json;
//!
//! let mut registry = Registry::new();
//! registry
//!     .set_namespace("https://example/tr/", Some("tr"))
//!     .register_kind(EntityKind::Translation, |v| {
//!         Ok(Transform::translation_from_value(v)?.into())
//!     })
//!     .unwrap();
//!
//! let entity = registry
//!     .create("https://example/tr/translation", json!([10, 20, 5]))
//!     .unwrap();
//! assert_eq!(entity, Entity::Transform(Transform::translation([10.0, 20.0, 5.0])));
//! ```
//!
//! Once registration is done the registry is only read, so it can be
//! shared freely between threads (see [`default_registry`]).

pub mod builtin;
mod entity;
mod error;

pub use entity::{Entity, EntityKind};
pub use error::{ConstructError, RegistryError};

use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;

use tracing::debug;

use crate::namespace::NamespaceAbbreviator;
use crate::normalize::normalize;

/// Builds an entity from a normalized value.
pub type Constructor = fn(Value) -> Result<Entity, ConstructError>;

/// Largest edit distance at which an identifier is offered as a suggestion.
const SUGGESTION_DISTANCE: usize = 3;

/// One registered identifier.
#[derive(Clone, Debug)]
pub struct RegistryEntry {
    pub id: String,
    pub namespace: String,
    pub local_name: String,
    pub kind: Option<EntityKind>,
    constructor: Constructor,
}

/// Bidirectional identifier registry.
#[derive(Clone, Debug, Default)]
pub struct Registry {
    entries: BTreeMap<String, RegistryEntry>,
    names: HashMap<EntityKind, (String, String)>,
    prefix_hints: BTreeMap<String, String>,
}

/// Joins a namespace and a local name into a full identifier.
///
/// Namespaces ending in `/` or `#` are joined directly, others get a `/`.
pub fn qualify(namespace: &str, local_name: &str) -> String {
    if namespace.ends_with('/') || namespace.ends_with('#') {
        format!("{namespace}{local_name}")
    } else {
        format!("{namespace}/{local_name}")
    }
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the built-in entity kinds.
    pub fn with_builtins() -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        builtin::register_builtins(&mut registry)?;
        Ok(registry)
    }

    /// Opens a registration scope for `namespace`.
    ///
    /// `prefix` is only a hint for serialization; the final prefix is
    /// decided per call by a [`NamespaceAbbreviator`].
    pub fn set_namespace(
        &mut self,
        namespace: impl Into<String>,
        prefix: Option<&str>,
    ) -> RegistrationScope<'_> {
        let namespace = namespace.into();
        if let Some(prefix) = prefix {
            self.prefix_hints
                .entry(namespace.clone())
                .or_insert_with(|| prefix.to_string());
        }
        RegistrationScope {
            registry: self,
            namespace,
        }
    }

    fn insert(
        &mut self,
        namespace: &str,
        local_name: &str,
        kind: Option<EntityKind>,
        constructor: Constructor,
    ) -> Result<(), RegistryError> {
        let id = qualify(namespace, local_name);
        if self.entries.contains_key(&id) {
            return Err(RegistryError::DuplicateRegistration {
                registered: self
                    .entries
                    .values()
                    .filter(|e| e.namespace == namespace)
                    .map(|e| e.id.clone())
                    .collect(),
                full_id: id,
            });
        }

        debug!(id = %id, ?kind, "registered constructor");
        if let Some(kind) = kind {
            self.names
                .entry(kind)
                .or_insert_with(|| (namespace.to_string(), local_name.to_string()));
        }
        self.entries.insert(
            id.clone(),
            RegistryEntry {
                id,
                namespace: namespace.to_string(),
                local_name: local_name.to_string(),
                kind,
                constructor,
            },
        );
        Ok(())
    }

    /// Normalizes `raw_value` and runs the constructor registered for
    /// `full_id`.
    ///
    /// # Errors
    /// `UnknownIdentifier` (with a near-match suggestion when one exists)
    /// if nothing is registered under `full_id`; `ConstructionFailed` if the
    /// constructor rejects the value.
    pub fn create(&self, full_id: &str, raw_value: Value) -> Result<Entity, RegistryError> {
        let Some(entry) = self.entries.get(full_id) else {
            return Err(RegistryError::UnknownIdentifier {
                full_id: full_id.to_string(),
                available: self.entries.keys().cloned().collect(),
                suggestion: self.suggest(full_id),
            });
        };

        debug!(id = full_id, "dispatching constructor");
        (entry.constructor)(normalize(raw_value.clone())).map_err(|cause| {
            RegistryError::ConstructionFailed {
                full_id: full_id.to_string(),
                raw_value,
                cause,
            }
        })
    }

    /// Closest registered identifier by edit distance, if close enough.
    pub fn suggest(&self, full_id: &str) -> Option<String> {
        self.entries
            .keys()
            .map(|id| (strsim::levenshtein(full_id, id), id))
            .filter(|(distance, _)| *distance <= SUGGESTION_DISTANCE)
            .min_by_key(|(distance, _)| *distance)
            .map(|(_, id)| id.clone())
    }

    pub fn get(&self, full_id: &str) -> Option<&RegistryEntry> {
        self.entries.get(full_id)
    }

    pub fn contains(&self, full_id: &str) -> bool {
        self.entries.contains_key(full_id)
    }

    /// All registered identifiers, sorted.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn entries(&self) -> impl Iterator<Item = &RegistryEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The `(namespace, local_name)` a kind was registered under.
    pub fn qualified_name(&self, kind: EntityKind) -> Option<(&str, &str)> {
        self.names
            .get(&kind)
            .map(|(ns, local)| (ns.as_str(), local.as_str()))
    }

    /// `prefix:local_name` for an entity, with the prefix assigned by
    /// `abbrev`. Unregistered kinds fall back to their bare type name.
    pub fn short_name(&self, entity: &Entity, abbrev: &mut NamespaceAbbreviator) -> String {
        self.short_name_for_kind(entity.kind(), abbrev)
    }

    pub fn short_name_for_kind(
        &self,
        kind: EntityKind,
        abbrev: &mut NamespaceAbbreviator,
    ) -> String {
        match self.qualified_name(kind) {
            Some((namespace, local_name)) => {
                let prefix = abbrev.abbreviation_for(namespace);
                format!("{prefix}:{local_name}")
            }
            None => kind.type_name().to_string(),
        }
    }

    /// `namespace -> prefix` hints collected from registration scopes.
    pub fn prefix_hints(&self) -> &BTreeMap<String, String> {
        &self.prefix_hints
    }

    /// A fresh abbreviator for one serialization, seeded with the
    /// registration prefix hints.
    pub fn abbreviator(&self) -> NamespaceAbbreviator {
        NamespaceAbbreviator::with_hints(
            self.prefix_hints
                .iter()
                .map(|(ns, prefix)| (ns.as_str(), prefix.as_str())),
        )
    }
}

/// A batch of registrations sharing one namespace.
#[derive(Debug)]
pub struct RegistrationScope<'r> {
    registry: &'r mut Registry,
    namespace: String,
}

impl RegistrationScope<'_> {
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Registers a constructor under `{namespace}{local_name}`.
    ///
    /// # Errors
    /// `DuplicateRegistration` if the identifier is already taken.
    pub fn register(
        &mut self,
        local_name: &str,
        constructor: Constructor,
    ) -> Result<&mut Self, RegistryError> {
        self.registry
            .insert(&self.namespace, local_name, None, constructor)?;
        Ok(self)
    }

    /// Registers a constructor for `kind` under its default local name and
    /// records the kind for reverse lookup.
    pub fn register_kind(
        &mut self,
        kind: EntityKind,
        constructor: Constructor,
    ) -> Result<&mut Self, RegistryError> {
        self.register_kind_as(kind, kind.default_local_name(), constructor)
    }

    /// Like [`register_kind`](Self::register_kind) with an explicit local name.
    pub fn register_kind_as(
        &mut self,
        kind: EntityKind,
        local_name: &str,
        constructor: Constructor,
    ) -> Result<&mut Self, RegistryError> {
        self.registry
            .insert(&self.namespace, local_name, Some(kind), constructor)?;
        Ok(self)
    }
}

/// The process-wide registry of built-in kinds.
///
/// Built on first use and never mutated afterwards.
///
/// # Panics
/// If the built-in table registers an identifier twice, which is a
/// programming error caught by the test suite.
pub fn default_registry() -> &'static Registry {
    static REGISTRY: OnceLock<Registry> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        Registry::with_builtins()
            .unwrap_or_else(|e| panic!("built-in registry is misconfigured: {e}"))
    })
}
