//! Transform chain documents.
//!
//! A chain document declares coordinate systems and an ordered list of
//! transform steps between them:
//!
//! ```json
//! {
//!   "@context": {"tr": "https://coordreg.dev/schema/transforms/"},
//!   "coordinateSystems": [
//!     {"id": "stage", "dimensions": [{"id": "x", "unit": "micrometer"}]},
//!     {"id": "world", "dimensions": [{"id": "x", "unit": "micrometer"}]}
//!   ],
//!   "transforms": [
//!     {"type": "tr:translation", "value": [10], "input": "stage", "output": "world"}
//!   ]
//! }
//! ```
//!
//! Both JSON and YAML spellings are accepted.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::str::FromStr;

use super::context::{expand_key, Context};
use crate::error::CoordregError;
use crate::identity::CoordinateSystem;
use crate::registry::{Entity, Registry};
use crate::transform::CoordinateTransform;

/// On-disk spelling of a chain document.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChainFormat {
    Json,
    Yaml,
    /// Pick by file extension, defaulting to JSON.
    Auto,
}

impl ChainFormat {
    fn resolve(self, path: &Path) -> Self {
        match self {
            ChainFormat::Auto => match path.extension().and_then(|e| e.to_str()) {
                Some("yaml") | Some("yml") => ChainFormat::Yaml,
                _ => ChainFormat::Json,
            },
            other => other,
        }
    }
}

impl FromStr for ChainFormat {
    type Err = CoordregError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(ChainFormat::Json),
            "yaml" | "yml" => Ok(ChainFormat::Yaml),
            "auto" => Ok(ChainFormat::Auto),
            other => Err(CoordregError::UnsupportedFormat(format!(
                "'{other}' (supported: json, yaml, auto)"
            ))),
        }
    }
}

/// A declared chain of transforms between coordinate systems.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ChainDocument {
    #[serde(rename = "@context", default, skip_serializing_if = "Context::is_empty")]
    pub context: Context,

    #[serde(rename = "coordinateSystems", default)]
    pub coordinate_systems: Vec<CoordinateSystem>,

    #[serde(default)]
    pub transforms: Vec<TransformStep>,
}

/// One step of a chain: a transform kind, its value, and the ids of the
/// coordinate systems it maps between.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransformStep {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Compact or full identifier of the transform kind.
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default)]
    pub value: Value,

    pub input: String,

    pub output: String,
}

impl ChainDocument {
    pub fn coordinate_system(&self, id: &str) -> Option<&CoordinateSystem> {
        self.coordinate_systems.iter().find(|cs| cs.id() == id)
    }

    /// Resolves every step into a [`CoordinateTransform`].
    ///
    /// # Errors
    /// `UnknownCoordinateSystem` for a dangling input/output id,
    /// `InvalidDocument` if a step's kind does not construct a transform, and
    /// any registry error from dispatching the step (unknown kinds included:
    /// a chain step must be a managed entity).
    pub fn build(&self, registry: &Registry) -> Result<Vec<CoordinateTransform>, CoordregError> {
        let systems: HashMap<&str, &CoordinateSystem> = self
            .coordinate_systems
            .iter()
            .map(|cs| (cs.id(), cs))
            .collect();

        let lookup = |id: &str| {
            systems
                .get(id)
                .copied()
                .ok_or_else(|| CoordregError::UnknownCoordinateSystem(id.to_string()))
        };

        self.transforms
            .iter()
            .enumerate()
            .map(|(position, step)| {
                let full_id = expand_key(&step.kind, &self.context);
                let transform = match registry.create(&full_id, step.value.clone())? {
                    Entity::Transform(t) => t,
                    other => {
                        return Err(CoordregError::InvalidDocument(format!(
                            "step {position}: '{}' is a {}, not a transform",
                            step.kind,
                            other.kind()
                        )))
                    }
                };
                let built =
                    CoordinateTransform::between(transform, lookup(&step.input)?, lookup(&step.output)?);
                Ok(match &step.name {
                    Some(name) => built.with_name(name.clone()),
                    None => built,
                })
            })
            .collect()
    }
}

/// Reads a chain document from a JSON or YAML file.
pub fn read_chain(path: &Path, format: ChainFormat) -> Result<ChainDocument, CoordregError> {
    let file = File::open(path).map_err(CoordregError::Io)?;
    let reader = BufReader::new(file);

    match format.resolve(path) {
        ChainFormat::Yaml => {
            serde_yaml::from_reader(reader).map_err(|source| CoordregError::YamlParse {
                path: path.to_path_buf(),
                source,
            })
        }
        _ => serde_json::from_reader(reader).map_err(|source| CoordregError::DocumentParse {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Parses a chain document from a JSON string.
pub fn chain_from_json_str(json: &str) -> Result<ChainDocument, serde_json::Error> {
    serde_json::from_str(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{builtin::TRANSFORMS_NAMESPACE, RegistryError};
    use crate::transform::Transform;
    use crate::validation::{validate_chain, ValidateOptions};
    use serde_json::json;

    fn chain_json(second_unit: &str) -> String {
        json!({
            "@context": {"tr": TRANSFORMS_NAMESPACE},
            "coordinateSystems": [
                {"id": "raw", "dimensions": [{"id": "i", "unit": "index"}]},
                {"id": "stage", "dimensions": [{"id": "x", "unit": "micrometer"}]},
                {"id": "world", "dimensions": [{"id": "x", "unit": second_unit}]}
            ],
            "transforms": [
                {"type": "tr:scale", "value": [0.5], "input": "raw", "output": "stage"},
                {"name": "to world", "type": "tr:translation", "value": [3], "input": "stage", "output": "world"}
            ]
        })
        .to_string()
    }

    #[test]
    fn test_build_chain() {
        let doc = chain_from_json_str(&chain_json("micrometer")).unwrap();
        let registry = Registry::with_builtins().unwrap();
        let chain = doc.build(&registry).unwrap();

        assert_eq!(chain.len(), 2);
        assert_eq!(chain[0].transform, Transform::scale([0.5]));
        assert_eq!(chain[1].name.as_deref(), Some("to world"));
        assert_eq!(chain[1].output_dimensions[0].global_id(), "world#x");

        let report = validate_chain(&chain, &ValidateOptions { strict: true }).unwrap();
        assert!(report.is_clean());
    }

    #[test]
    fn test_dangling_coordinate_system() {
        let mut doc = chain_from_json_str(&chain_json("micrometer")).unwrap();
        doc.transforms[0].input = "nowhere".into();
        let err = doc.build(&Registry::with_builtins().unwrap()).unwrap_err();
        assert!(matches!(err, CoordregError::UnknownCoordinateSystem(id) if id == "nowhere"));
    }

    #[test]
    fn test_unknown_step_kind_is_an_error() {
        let mut doc = chain_from_json_str(&chain_json("micrometer")).unwrap();
        doc.transforms[0].kind = "tr:scal".into();
        let err = doc.build(&Registry::with_builtins().unwrap()).unwrap_err();
        match err {
            CoordregError::Registry(RegistryError::UnknownIdentifier { suggestion, .. }) => {
                assert_eq!(
                    suggestion,
                    Some(format!("{TRANSFORMS_NAMESPACE}scale"))
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_non_transform_step_is_rejected() {
        let mut doc = chain_from_json_str(&chain_json("micrometer")).unwrap();
        doc.transforms[0].kind = "https://coordreg.dev/schema/Dimension".into();
        doc.transforms[0].value = json!({"id": "x", "unit": "meter"});
        let err = doc.build(&Registry::with_builtins().unwrap()).unwrap_err();
        assert!(matches!(err, CoordregError::InvalidDocument(_)));
    }

    #[test]
    fn test_yaml_chain() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chain.yaml");
        std::fs::write(
            &path,
            "coordinateSystems:\n  - id: a\n    dimensions:\n      - id: x\n        unit: meter\n\
             transforms:\n  - type: https://coordreg.dev/schema/transforms/identity\n    input: a\n    output: a\n",
        )
        .unwrap();
        let doc = read_chain(&path, ChainFormat::Auto).unwrap();
        assert_eq!(doc.coordinate_systems.len(), 1);
        let chain = doc.build(&Registry::with_builtins().unwrap()).unwrap();
        assert_eq!(chain[0].transform, Transform::Identity);
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("yml".parse::<ChainFormat>().unwrap(), ChainFormat::Yaml);
        assert!("toml".parse::<ChainFormat>().is_err());
    }
}
