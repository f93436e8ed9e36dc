//! Error types and handling for Faraday
//!
//! This module defines the error types used throughout the application,
//! providing consistent error handling and reporting.

use thiserror::Error;

/// Result type alias for Faraday operations
pub type Result<T> = std::result::Result<T, FaradayError>;

/// Main error type for Faraday
#[derive(Debug, Error)]
pub enum FaradayError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Serialization/deserialization errors
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// File I/O errors
    #[error("I/O error: {message}")]
    Io { message: String },

    /// Prompt collaborator errors (closed input stream, rendering failures)
    #[error("Prompt error: {message}")]
    Prompt { message: String },

    /// Dataset store errors
    #[error("Store error: {message}")]
    Store { message: String },

    /// Invalid inputs to the charging-curve synthesizer
    #[error("Invalid curve input: {message}")]
    InvalidCurveInput { message: String },

    /// Validation errors
    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },

    /// Generic errors with context
    #[error("Error: {message}")]
    Generic { message: String },
}

impl FaradayError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        FaradayError::Config {
            message: message.into(),
        }
    }

    /// Create a new I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        FaradayError::Io {
            message: message.into(),
        }
    }

    /// Create a new prompt error
    pub fn prompt<S: Into<String>>(message: S) -> Self {
        FaradayError::Prompt {
            message: message.into(),
        }
    }

    /// Create a new store error
    pub fn store<S: Into<String>>(message: S) -> Self {
        FaradayError::Store {
            message: message.into(),
        }
    }

    /// Create a new curve-input error
    pub fn curve_input<S: Into<String>>(message: S) -> Self {
        FaradayError::InvalidCurveInput {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(field: S, message: S) -> Self {
        FaradayError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new generic error
    pub fn generic<S: Into<String>>(message: S) -> Self {
        FaradayError::Generic {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for FaradayError {
    fn from(err: std::io::Error) -> Self {
        FaradayError::io(err.to_string())
    }
}

impl From<serde_yaml::Error> for FaradayError {
    fn from(err: serde_yaml::Error) -> Self {
        FaradayError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for FaradayError {
    fn from(err: serde_json::Error) -> Self {
        FaradayError::Serialization {
            message: err.to_string(),
        }
    }
}
