//! Error types for promptify-builder

use crate::schema::FieldErrors;
use crate::types::Step;
use thiserror::Error;

/// Errors that can occur while building and submitting a prompt
#[derive(Debug, Error)]
pub enum WizardError {
    /// One or more fields failed validation on the given step
    #[error("Validation failed on step '{step}': {}", summarize(.errors))]
    Validation { step: Step, errors: FieldErrors },

    /// Navigation that the state machine does not allow from the current step
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    /// A submission is still in flight
    #[error("A submission is already in progress")]
    Busy,

    /// Local store read/write failure
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Serialization/deserialization failure
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Remote service unreachable
    #[error("Connection error: {0}")]
    Connection(String),

    /// The submission sink rejected the payload
    #[error("Submission failed: {0}")]
    Submission(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Lookup miss (template, record)
    #[error("Not found: {0}")]
    NotFound(String),
}

fn summarize(errors: &FieldErrors) -> String {
    errors
        .iter()
        .map(|(field, message)| format!("{}: {}", field, message))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result type alias for builder operations
pub type Result<T> = std::result::Result<T, WizardError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Field;

    #[test]
    fn test_validation_error_lists_fields() {
        let mut errors = FieldErrors::new();
        errors.insert(Field::Goal, "Goal is required".to_string());
        errors.insert(Field::Role, "Role is required".to_string());

        let err = WizardError::Validation {
            step: Step::Goal,
            errors,
        };
        let msg = err.to_string();
        assert!(msg.contains("Define Goal"));
        assert!(msg.contains("goal: Goal is required"));
        assert!(msg.contains("role: Role is required"));
    }

    #[test]
    fn test_serialization_error_from_serde() {
        let parse: std::result::Result<serde_json::Value, _> = serde_json::from_str("{");
        let err: WizardError = parse.unwrap_err().into();
        assert!(matches!(err, WizardError::Serialization(_)));
    }
}
