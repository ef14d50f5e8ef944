//! Record error types

use thiserror::Error;

/// Errors raised when a record's payload does not have the expected shape
///
/// These are never fatal: the engine logs them and forwards the offending
/// record unchanged.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    /// Payload has no value under the given key
    #[error("payload field '{key}' is missing")]
    MissingField {
        /// The missing payload key
        key: String,
    },

    /// Payload value under the given key has an unusable type
    #[error("payload field '{key}' has unexpected type '{type_name}', expected bytes or string")]
    UnexpectedType {
        /// The offending payload key
        key: String,
        /// Name of the actual value variant
        type_name: &'static str,
    },
}

impl RecordError {
    /// Create a MissingField error
    pub fn missing_field(key: impl Into<String>) -> Self {
        Self::MissingField { key: key.into() }
    }

    /// Create an UnexpectedType error
    pub fn unexpected_type(key: impl Into<String>, type_name: &'static str) -> Self {
        Self::UnexpectedType {
            key: key.into(),
            type_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_display() {
        let err = RecordError::missing_field("log");
        assert!(err.to_string().contains("'log'"));
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_unexpected_type_display() {
        let err = RecordError::unexpected_type("container_id", "int");
        assert!(err.to_string().contains("container_id"));
        assert!(err.to_string().contains("int"));
        assert!(err.to_string().contains("expected bytes or string"));
    }
}
