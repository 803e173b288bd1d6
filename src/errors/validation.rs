//! Pre-flight validation and missing-entity errors

use thiserror::Error;

/// Local field validation failure, raised before any network or mock call.
///
/// Always names the offending field so backend contract drift (an enum value
/// we do not know, a required field that stopped arriving) is visible instead
/// of being masked by a silent default.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid field '{field}': {reason}")]
pub struct ValidationError {
    /// Wire or record field that failed validation
    pub field: String,
    /// Human-readable reason
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// A required field was absent from the payload.
    pub fn missing(field: impl Into<String>) -> Self {
        Self::new(field, "required field is missing or empty")
    }

    /// An enumerated field carried a value outside the declared mapping.
    pub fn unknown_value(field: impl Into<String>, value: &str) -> Self {
        Self::new(field, format!("unknown value '{value}'"))
    }
}

/// Update or delete referenced an identifier that no longer exists.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    /// Entity kind, e.g. "client"
    pub entity: &'static str,
    /// The vanished identifier
    pub id: i64,
}

impl NotFoundError {
    pub fn new(entity: &'static str, id: i64) -> Self {
        Self { entity, id }
    }
}
