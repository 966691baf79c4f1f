//! Coordinate transform entities.
//!
//! Transform kinds form a closed sum type. The math behind each kind is out
//! of scope here: a [`Transform`] is only carried, dispatched and
//! serialized, while a [`CoordinateTransform`] pairs one with the input and
//! output dimensions it connects.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::identity::{CoordinateSystem, Dimension};

/// A transform payload.
#[derive(Clone, Debug, PartialEq)]
pub enum Transform {
    Identity,
    Translation { values: Vec<f64> },
    Scale { values: Vec<f64> },
    Affine { matrix: Vec<Vec<f64>> },
    MapAxis { mapping: Vec<usize> },
}

/// A single value or a sequence of them; normalization collapses
/// one-element sequences to scalars. `Many` is tried first so that a
/// sequence of sequences is never read as one element.
#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> From<OneOrMany<T>> for Vec<T> {
    fn from(value: OneOrMany<T>) -> Self {
        match value {
            OneOrMany::One(v) => vec![v],
            OneOrMany::Many(v) => v,
        }
    }
}

/// Reads a sequence either directly or from `{"<field>": [...]}`.
fn sequence<T: DeserializeOwned>(value: Value, field: &str) -> Result<Vec<T>, serde_json::Error> {
    let value = match value {
        Value::Object(mut map) if map.contains_key(field) => map.remove(field).unwrap_or_default(),
        other => other,
    };
    serde_json::from_value::<OneOrMany<T>>(value).map(Vec::from)
}

impl Transform {
    pub fn translation(values: impl Into<Vec<f64>>) -> Self {
        Transform::Translation {
            values: values.into(),
        }
    }

    pub fn scale(values: impl Into<Vec<f64>>) -> Self {
        Transform::Scale {
            values: values.into(),
        }
    }

    pub fn translation_from_value(value: Value) -> Result<Self, serde_json::Error> {
        sequence(value, "translation").map(|values| Transform::Translation { values })
    }

    pub fn scale_from_value(value: Value) -> Result<Self, serde_json::Error> {
        sequence(value, "scale").map(|values| Transform::Scale { values })
    }

    pub fn affine_from_value(value: Value) -> Result<Self, serde_json::Error> {
        sequence(value, "affine").map(|matrix| Transform::Affine { matrix })
    }

    pub fn map_axis_from_value(value: Value) -> Result<Self, serde_json::Error> {
        sequence(value, "mapAxis").map(|mapping| Transform::MapAxis { mapping })
    }

    /// Plain value form, accepted back by the matching `*_from_value`.
    pub fn to_value(&self) -> Value {
        match self {
            Transform::Identity => json!({}),
            Transform::Translation { values } | Transform::Scale { values } => json!(values),
            Transform::Affine { matrix } => json!(matrix),
            Transform::MapAxis { mapping } => json!(mapping),
        }
    }

    /// Number of input dimensions the payload implies, when it implies one.
    pub fn arity(&self) -> Option<usize> {
        match self {
            Transform::Identity => None,
            Transform::Translation { values } | Transform::Scale { values } => Some(values.len()),
            Transform::Affine { matrix } => matrix.first().map(|row| row.len().saturating_sub(1)),
            Transform::MapAxis { mapping } => Some(mapping.len()),
        }
    }
}

/// A transform together with the dimensions it maps between.
#[derive(Clone, Debug, PartialEq)]
pub struct CoordinateTransform {
    pub name: Option<String>,
    pub transform: Transform,
    pub input_dimensions: Vec<Dimension>,
    pub output_dimensions: Vec<Dimension>,
}

impl CoordinateTransform {
    pub fn new(
        transform: Transform,
        input_dimensions: Vec<Dimension>,
        output_dimensions: Vec<Dimension>,
    ) -> Self {
        Self {
            name: None,
            transform,
            input_dimensions,
            output_dimensions,
        }
    }

    /// Connects the dimensions of two coordinate systems.
    pub fn between(
        transform: Transform,
        input: &CoordinateSystem,
        output: &CoordinateSystem,
    ) -> Self {
        Self::new(
            transform,
            input.dimensions().to_vec(),
            output.dimensions().to_vec(),
        )
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Name for diagnostics: the explicit name, or the position in a chain.
    pub fn display_name(&self, position: usize) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("transform {position}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translation_from_sequence_or_scalar() {
        assert_eq!(
            Transform::translation_from_value(json!([10, 20, 5])).unwrap(),
            Transform::translation([10.0, 20.0, 5.0])
        );
        assert_eq!(
            Transform::translation_from_value(json!(3.5)).unwrap(),
            Transform::translation([3.5])
        );
        assert_eq!(
            Transform::translation_from_value(json!({"translation": [1, 2]})).unwrap(),
            Transform::translation([1.0, 2.0])
        );
    }

    #[test]
    fn test_malformed_values_fail() {
        assert!(Transform::scale_from_value(json!("big")).is_err());
        assert!(Transform::map_axis_from_value(json!([-1])).is_err());
    }

    #[test]
    fn test_value_roundtrip() {
        for transform in [
            Transform::translation([1.0, 2.0]),
            Transform::scale([0.5, 0.5, 2.0]),
            Transform::Affine {
                matrix: vec![vec![1.0, 0.0, 3.0], vec![0.0, 1.0, 4.0]],
            },
            Transform::MapAxis {
                mapping: vec![1, 0],
            },
        ] {
            let value = transform.to_value();
            let back = match &transform {
                Transform::Translation { .. } => Transform::translation_from_value(value),
                Transform::Scale { .. } => Transform::scale_from_value(value),
                Transform::Affine { .. } => Transform::affine_from_value(value),
                Transform::MapAxis { .. } => Transform::map_axis_from_value(value),
                Transform::Identity => unreachable!(),
            }
            .unwrap();
            assert_eq!(back, transform);
        }
    }

    #[test]
    fn test_affine_matrix_shapes() {
        let empty = Transform::Affine { matrix: vec![] };
        assert_eq!(Transform::affine_from_value(empty.to_value()).unwrap(), empty);

        // A single row collapsed by normalization is still one row.
        assert_eq!(
            Transform::affine_from_value(json!([1, 0, 3])).unwrap(),
            Transform::Affine {
                matrix: vec![vec![1.0, 0.0, 3.0]]
            }
        );
    }

    #[test]
    fn test_arity() {
        assert_eq!(Transform::translation([1.0, 2.0, 3.0]).arity(), Some(3));
        assert_eq!(
            Transform::Affine {
                matrix: vec![vec![1.0, 0.0, 3.0], vec![0.0, 1.0, 4.0]]
            }
            .arity(),
            Some(2)
        );
        assert_eq!(Transform::Identity.arity(), None);
    }

    #[test]
    fn test_between_copies_dimensions() {
        let mut a = CoordinateSystem::new("a").unwrap();
        a.add_dimension("micrometer", None, Some("x")).unwrap();
        let mut b = CoordinateSystem::new("b").unwrap();
        b.add_dimension("micrometer", None, Some("x")).unwrap();

        let t = CoordinateTransform::between(Transform::translation([1.0]), &a, &b);
        assert_eq!(t.input_dimensions[0].global_id(), "a#x");
        assert_eq!(t.output_dimensions[0].global_id(), "b#x");
        assert_eq!(t.display_name(0), "transform 0");
    }
}
