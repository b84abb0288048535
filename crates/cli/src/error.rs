//! Error types for CLI operations.

use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Input file or directory does not exist
    #[error("Input not found: {path}")]
    InputNotFound { path: String },

    /// Batch input directory has no trip documents
    #[error("No trip documents (*.json) found in {dir}")]
    NoInputs { dir: String },

    /// Configuration could not be loaded
    #[error("Failed to load configuration from {path}: {source}")]
    Config {
        path: String,
        #[source]
        source: contracts::ContractError,
    },

    /// A batch worker panicked or was cancelled
    #[error("Batch worker failed: {message}")]
    Worker { message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub fn input_not_found(path: impl Into<String>) -> Self {
        Self::InputNotFound { path: path.into() }
    }

    pub fn no_inputs(dir: impl Into<String>) -> Self {
        Self::NoInputs { dir: dir.into() }
    }

    pub fn config(path: impl Into<String>, source: contracts::ContractError) -> Self {
        Self::Config {
            path: path.into(),
            source,
        }
    }

    pub fn worker(message: impl Into<String>) -> Self {
        Self::Worker {
            message: message.into(),
        }
    }
}

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
