//! Built-in entity kinds.

use serde_json::Value;

use super::{ConstructError, Entity, EntityKind, Registry, RegistryError};
use crate::identity::{CoordinateSystem, Dimension};
use crate::transform::Transform;

/// Namespace of the identity entities.
pub const SCHEMA_NAMESPACE: &str = "https://coordreg.dev/schema/";

/// Namespace of the transform entities.
pub const TRANSFORMS_NAMESPACE: &str = "https://coordreg.dev/schema/transforms/";

fn dimension(value: Value) -> Result<Entity, ConstructError> {
    Ok(serde_json::from_value::<Dimension>(value)?.into())
}

fn coordinate_system(value: Value) -> Result<Entity, ConstructError> {
    Ok(serde_json::from_value::<CoordinateSystem>(value)?.into())
}

fn identity(_value: Value) -> Result<Entity, ConstructError> {
    Ok(Transform::Identity.into())
}

fn translation(value: Value) -> Result<Entity, ConstructError> {
    Ok(Transform::translation_from_value(value)?.into())
}

fn scale(value: Value) -> Result<Entity, ConstructError> {
    Ok(Transform::scale_from_value(value)?.into())
}

fn affine(value: Value) -> Result<Entity, ConstructError> {
    let transform = Transform::affine_from_value(value)?;
    if let Transform::Affine { matrix } = &transform {
        if let Some(first) = matrix.first() {
            if matrix.iter().any(|row| row.len() != first.len()) {
                return Err("affine matrix rows differ in length".into());
            }
        }
    }
    Ok(transform.into())
}

fn map_axis(value: Value) -> Result<Entity, ConstructError> {
    Ok(Transform::map_axis_from_value(value)?.into())
}

/// Registers every built-in kind into `registry`.
pub fn register_builtins(registry: &mut Registry) -> Result<(), RegistryError> {
    registry
        .set_namespace(SCHEMA_NAMESPACE, Some("cr"))
        .register_kind(EntityKind::Dimension, dimension)?
        .register_kind(EntityKind::CoordinateSystem, coordinate_system)?;

    registry
        .set_namespace(TRANSFORMS_NAMESPACE, Some("tr"))
        .register_kind(EntityKind::Identity, identity)?
        .register_kind(EntityKind::Translation, translation)?
        .register_kind(EntityKind::Scale, scale)?
        .register_kind(EntityKind::Affine, affine)?
        .register_kind(EntityKind::MapAxis, map_axis)?;

    Ok(())
}
