//! Layered error definitions
//!
//! Categorized by source: config / input / io. The analysis operations
//! themselves never fail; only the edges that touch files and documents do.

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Input Errors =====
    /// Trace or sample document could not be decoded
    #[error("input parse error for '{source_name}': {message}")]
    InputParse {
        source_name: String,
        message: String,
    },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create input parse error
    pub fn input_parse(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InputParse {
            source_name: source_name.into(),
            message: message.into(),
        }
    }
}
