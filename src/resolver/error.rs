//! LEIA composition errors.
//!
//! Only hard failures live here. Best-effort conditions (skipped control
//! keys, unresolved placeholders) are reported through
//! [`super::diagnostics::Diagnostics`] instead.

use serde_json::Value;
use thiserror::Error;

/// Errors that abort a composition or a document load.
#[derive(Debug, Error)]
pub enum LeiaError {
    /// A constrained path has no (truthy) value in the composition.
    #[error("Constraint not met for '{path}': value does not exist")]
    MissingValue { path: String },

    /// A constrained `process` path shares no process tag with the expected set.
    #[error("Constraint not met for '{path}': no compatible processes (expected {expected}, got {actual})")]
    IncompatibleProcess {
        path: String,
        expected: Value,
        actual: Value,
    },

    /// A constrained path holds a different value than the one required.
    #[error("Constraint not met for '{path}': expected {expected}, got {actual}")]
    Mismatch {
        path: String,
        expected: Value,
        actual: Value,
    },

    /// `extends`, `overrides` or `constrainedTo` is not an object.
    #[error("Malformed '{map}' control map: expected an object, found {found}")]
    MalformedControlMap { map: &'static str, found: &'static str },

    /// Strict mode rejected a composition that produced diagnostics.
    #[error("Composition produced {count} diagnostic(s) in strict mode; first: {first}")]
    Strict { count: usize, first: String },

    /// JSON parsing or serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing or serialization failed.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// File I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid composer configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl LeiaError {
    /// Whether this error was raised by the constraint checker.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            Self::MissingValue { .. } | Self::IncompatibleProcess { .. } | Self::Mismatch { .. }
        )
    }
}

/// Name of a JSON value's variant, as used in error messages.
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mismatch_message_names_path_and_values() {
        let err = LeiaError::Mismatch {
            path: "persona.spec.subjectPronoum".to_string(),
            expected: json!("she"),
            actual: json!("he"),
        };
        let msg = err.to_string();
        assert!(msg.contains("persona.spec.subjectPronoum"));
        assert!(msg.contains("\"she\""));
        assert!(msg.contains("\"he\""));
        assert!(err.is_constraint_violation());
    }

    #[test]
    fn test_malformed_map_is_not_constraint_violation() {
        let err = LeiaError::MalformedControlMap {
            map: "extends",
            found: value_kind(&json!([1, 2])),
        };
        assert_eq!(
            err.to_string(),
            "Malformed 'extends' control map: expected an object, found array"
        );
        assert!(!err.is_constraint_violation());
    }
}
