//! Unified error type definition

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

/// Structured validation failure (supports field level errors).
///
/// Raised when the record service rejects a submitted document. `field_errors`
/// is keyed by the dotted field path used in form values (e.g. `lines.0.amount`)
/// so the editor can route each message to the offending input.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationFailure {
    /// Form-level message shown near the submit control.
    pub message: String,
    /// Field-level messages keyed by dotted field path.
    pub field_errors: BTreeMap<String, String>,
}

impl ValidationFailure {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            field_errors: BTreeMap::new(),
        }
    }

    /// Add a field-level message, builder style.
    #[must_use]
    pub fn with_field(mut self, path: impl Into<String>, message: impl Into<String>) -> Self {
        self.field_errors.insert(path.into(), message.into());
        self
    }
}

impl std::fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.field_errors.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{} ({} field(s))", self.message, self.field_errors.len())
        }
    }
}

impl std::error::Error for ValidationFailure {}

/// Core layer error type
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// Record not found
    #[error("Record not found: {0}")]
    RecordNotFound(String),

    /// Validation failure (structured, supports field level errors)
    #[error("{0}")]
    Validation(ValidationFailure),

    /// A save or delete is already in flight for this editor
    #[error("Operation already in progress")]
    OperationPending,

    /// Storage layer error
    #[error("Storage error: {0}")]
    StorageError(String),

    /// Network error
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl CoreError {
    /// Whether it is expected behavior (user input, resource does not exist, etc.) is used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    /// **Please update this method simultaneously when new variants are added.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::RecordNotFound(_) | Self::Validation(_) | Self::OperationPending
        )
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_failure_display_counts_fields() {
        let failure = ValidationFailure::new("Submission failed")
            .with_field("customerName", "Required")
            .with_field("lines.0.amount", "Must be positive");
        assert_eq!(failure.to_string(), "Submission failed (2 field(s))");
        assert_eq!(
            ValidationFailure::new("Submission failed").to_string(),
            "Submission failed"
        );
    }

    #[test]
    fn expected_errors_are_classified() {
        assert!(CoreError::RecordNotFound("abc".into()).is_expected());
        assert!(CoreError::Validation(ValidationFailure::new("bad")).is_expected());
        assert!(CoreError::OperationPending.is_expected());
        assert!(!CoreError::StorageError("disk".into()).is_expected());
        assert!(!CoreError::NetworkError("offline".into()).is_expected());
    }

    #[test]
    fn errors_serialize_with_code_tag() {
        let json = serde_json::to_value(CoreError::RecordNotFound("inv-1".into()))
            .expect("serializable");
        assert_eq!(json["code"], "RecordNotFound");
        assert_eq!(json["details"], "inv-1");
    }
}
