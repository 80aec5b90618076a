//! Error types and handling for Voltaic
//!
//! This module defines the error types used throughout the application,
//! providing consistent error handling and reporting.

use thiserror::Error;

/// Result type alias for Voltaic operations
pub type Result<T> = std::result::Result<T, VoltaicError>;

/// Main error type for Voltaic
#[derive(Debug, Error)]
pub enum VoltaicError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Serialization/deserialization errors
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// File I/O errors
    #[error("I/O error: {message}")]
    Io { message: String },

    /// Payment collaborator errors
    #[error("Payment error: {message}")]
    Payment { message: String },

    /// Validation errors
    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },

    /// Generic errors with context
    #[error("Error: {message}")]
    Generic { message: String },
}

impl VoltaicError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        VoltaicError::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(field: S, message: S) -> Self {
        VoltaicError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        VoltaicError::Io {
            message: message.into(),
        }
    }

    /// Create a new payment error
    pub fn payment<S: Into<String>>(message: S) -> Self {
        VoltaicError::Payment {
            message: message.into(),
        }
    }

    /// Create a new generic error
    pub fn generic<S: Into<String>>(message: S) -> Self {
        VoltaicError::Generic {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for VoltaicError {
    fn from(err: std::io::Error) -> Self {
        VoltaicError::io(err.to_string())
    }
}

impl From<serde_yaml::Error> for VoltaicError {
    fn from(err: serde_yaml::Error) -> Self {
        VoltaicError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for VoltaicError {
    fn from(err: serde_json::Error) -> Self {
        VoltaicError::Serialization {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = VoltaicError::config("test config error");
        assert!(matches!(err, VoltaicError::Config { .. }));

        let err = VoltaicError::payment("test payment error");
        assert!(matches!(err, VoltaicError::Payment { .. }));

        let err = VoltaicError::validation("field", "test validation error");
        assert!(matches!(err, VoltaicError::Validation { .. }));
    }

    #[test]
    fn test_error_display() {
        let err = VoltaicError::config("test error");
        let error_string = format!("{}", err);
        assert_eq!(error_string, "Configuration error: test error");

        let err = VoltaicError::validation("test_field", "invalid value");
        let error_string = format!("{}", err);
        assert_eq!(error_string, "Validation error: test_field - invalid value");
    }
}
