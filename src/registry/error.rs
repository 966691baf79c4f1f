use serde_json::Value;
use thiserror::Error;

/// Error type returned by registered constructors.
pub type ConstructError = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised by [`Registry`](super::Registry) registration and dispatch.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Registration-time error: fix the registration code, never recover.
    #[error(
        "'{full_id}' is already registered (namespace has: {})",
        .registered.join(", ")
    )]
    DuplicateRegistration {
        full_id: String,
        registered: Vec<String>,
    },

    #[error("Unknown identifier '{full_id}'{}", unknown_hint(.suggestion, .available))]
    UnknownIdentifier {
        full_id: String,
        available: Vec<String>,
        suggestion: Option<String>,
    },

    #[error("Failed to construct '{full_id}' from {raw_value}: {cause}")]
    ConstructionFailed {
        full_id: String,
        raw_value: Value,
        #[source]
        cause: ConstructError,
    },
}

fn unknown_hint(suggestion: &Option<String>, available: &[String]) -> String {
    match suggestion {
        Some(s) => format!(" (did you mean '{s}'?)"),
        None if available.is_empty() => " (registry is empty)".to_string(),
        None => format!(" (available: {})", available.join(", ")),
    }
}
