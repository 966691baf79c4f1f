use thiserror::Error;

use super::dimension::DimensionKind;

/// Errors raised while constructing dimensions and coordinate systems.
///
/// These indicate a programming or schema-authoring mistake and abort the
/// operation that triggered them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    #[error("Invalid dimension identity: {reason}")]
    InvalidIdentity { reason: String },

    #[error("Dimension kind '{kind}' requires unit 'index', got '{unit}'")]
    InconsistentKind { kind: DimensionKind, unit: String },

    #[error(
        "Dimension '{dimension}' belongs to coordinate system '{owner}', cannot be placed in '{coordinate_system}'"
    )]
    OwnershipConflict {
        dimension: String,
        owner: String,
        coordinate_system: String,
    },

    #[error("Label '{label}' is already used in coordinate system '{coordinate_system}'")]
    DuplicateLabel {
        label: String,
        coordinate_system: String,
    },

    #[error("Dimensions belong to more than one coordinate system: {}", .owners.join(", "))]
    MultipleOwners { owners: Vec<String> },
}

impl IdentityError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidIdentity {
            reason: reason.into(),
        }
    }
}
