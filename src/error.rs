use std::path::PathBuf;
use thiserror::Error;

use crate::identity::IdentityError;
use crate::registry::RegistryError;
use crate::validation::ChainReport;

/// The main error type for coordreg operations.
#[derive(Debug, Error)]
pub enum CoordregError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse JSON document from {path}: {source}")]
    DocumentParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write JSON document to {path}: {source}")]
    DocumentWrite {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to parse YAML document from {path}: {source}")]
    YamlParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error("Unknown coordinate system '{0}'")]
    UnknownCoordinateSystem(String),

    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("Chain validation failed with {violation_count} violation(s)")]
    ChainValidationFailed {
        violation_count: usize,
        report: ChainReport,
    },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}
