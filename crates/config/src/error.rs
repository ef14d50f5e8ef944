//! Configuration error types

use std::io;
use thiserror::Error;

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur when loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file
    #[error("failed to read config file '{path}': {source}")]
    IoError {
        /// Path to the file
        path: String,
        /// Underlying IO error
        #[source]
        source: io::Error,
    },

    /// Failed to parse TOML
    #[error("failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// A tag entry's first-line pattern does not compile
    #[error("tag '{tag}' has invalid first_line pattern '{pattern}': {message}")]
    InvalidRegex {
        /// The tag whose entry is broken
        tag: String,
        /// The offending pattern
        pattern: String,
        /// Compiler message
        message: String,
    },

    /// A tag entry is missing a required key
    #[error("tag '{tag}' is missing required field '{field}'")]
    MissingField {
        /// The tag whose entry is broken
        tag: String,
        /// Missing field name
        field: &'static str,
    },

    /// A setting has an unusable value
    #[error("invalid value for '{field}': {message}")]
    InvalidValue {
        /// Field name
        field: &'static str,
        /// Error message
        message: String,
    },
}

impl ConfigError {
    /// Create an InvalidRegex error
    pub fn invalid_regex(
        tag: impl Into<String>,
        pattern: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidRegex {
            tag: tag.into(),
            pattern: pattern.into(),
            message: message.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(tag: impl Into<String>, field: &'static str) -> Self {
        Self::MissingField {
            tag: tag.into(),
            field,
        }
    }

    /// Create an InvalidValue error
    pub fn invalid_value(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_regex_error() {
        let err = ConfigError::invalid_regex("app", "^(", "unclosed group");
        assert!(err.to_string().contains("app"));
        assert!(err.to_string().contains("^("));
        assert!(err.to_string().contains("unclosed group"));
    }

    #[test]
    fn test_missing_field_error() {
        let err = ConfigError::missing_field("nginx", "msg_key");
        assert!(err.to_string().contains("nginx"));
        assert!(err.to_string().contains("msg_key"));
    }

    #[test]
    fn test_invalid_value_error() {
        let err = ConfigError::invalid_value("max_msg_length", "must be greater than zero");
        assert!(err.to_string().contains("max_msg_length"));
        assert!(err.to_string().contains("greater than zero"));
    }
}
