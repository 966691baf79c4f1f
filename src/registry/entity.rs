//! The closed set of entity kinds the registry dispatches to.

use serde_json::Value;
use std::fmt;

use crate::identity::{CoordinateSystem, Dimension};
use crate::transform::Transform;

/// Reverse-lookup key: which variant a constructed entity is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EntityKind {
    Dimension,
    CoordinateSystem,
    Identity,
    Translation,
    Scale,
    Affine,
    MapAxis,
}

impl EntityKind {
    pub const ALL: [EntityKind; 7] = [
        EntityKind::Dimension,
        EntityKind::CoordinateSystem,
        EntityKind::Identity,
        EntityKind::Translation,
        EntityKind::Scale,
        EntityKind::Affine,
        EntityKind::MapAxis,
    ];

    /// Bare type name, used as the short name of unregistered kinds.
    pub fn type_name(&self) -> &'static str {
        match self {
            EntityKind::Dimension => "Dimension",
            EntityKind::CoordinateSystem => "CoordinateSystem",
            EntityKind::Identity => "Identity",
            EntityKind::Translation => "Translation",
            EntityKind::Scale => "Scale",
            EntityKind::Affine => "Affine",
            EntityKind::MapAxis => "MapAxis",
        }
    }

    /// Local name used when a kind is registered without an explicit one.
    pub fn default_local_name(&self) -> &'static str {
        match self {
            EntityKind::Dimension => "Dimension",
            EntityKind::CoordinateSystem => "CoordinateSystem",
            EntityKind::Identity => "identity",
            EntityKind::Translation => "translation",
            EntityKind::Scale => "scale",
            EntityKind::Affine => "affine",
            EntityKind::MapAxis => "mapAxis",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// A typed entity built by a registered constructor.
#[derive(Clone, Debug, PartialEq)]
pub enum Entity {
    Dimension(Dimension),
    CoordinateSystem(CoordinateSystem),
    Transform(Transform),
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Dimension(_) => EntityKind::Dimension,
            Entity::CoordinateSystem(_) => EntityKind::CoordinateSystem,
            Entity::Transform(t) => match t {
                Transform::Identity => EntityKind::Identity,
                Transform::Translation { .. } => EntityKind::Translation,
                Transform::Scale { .. } => EntityKind::Scale,
                Transform::Affine { .. } => EntityKind::Affine,
                Transform::MapAxis { .. } => EntityKind::MapAxis,
            },
        }
    }

    /// Plain value form, as accepted by the kind's built-in constructor.
    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        match self {
            Entity::Dimension(d) => serde_json::to_value(d),
            Entity::CoordinateSystem(cs) => serde_json::to_value(cs),
            Entity::Transform(t) => Ok(t.to_value()),
        }
    }

    pub fn as_transform(&self) -> Option<&Transform> {
        match self {
            Entity::Transform(t) => Some(t),
            _ => None,
        }
    }
}

impl From<Dimension> for Entity {
    fn from(d: Dimension) -> Self {
        Entity::Dimension(d)
    }
}

impl From<CoordinateSystem> for Entity {
    fn from(cs: CoordinateSystem) -> Self {
        Entity::CoordinateSystem(cs)
    }
}

impl From<Transform> for Entity {
    fn from(t: Transform) -> Self {
        Entity::Transform(t)
    }
}
