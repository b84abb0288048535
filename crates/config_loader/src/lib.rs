//! # Config Loader
//!
//! Loading and validation of analysis configuration and input documents.
//!
//! Responsibilities:
//! - Parse TOML/JSON `AnalysisConfig` files
//! - Validate field ranges and cross-field rules
//! - Decode trip and sample-window JSON documents
//!
//! # Example
//!
//! ```no_run
//! use config_loader::ConfigLoader;
//! use std::path::Path;
//!
//! let config = ConfigLoader::load_from_path(Path::new("analysis.toml")).unwrap();
//! println!("max speed: {} km/h", config.filter.max_speed_kmh);
//! ```

mod input;
mod parser;
mod validator;

pub use contracts::AnalysisConfig;
pub use input::{load_samples, load_trip, samples_from_str, trip_from_str};
pub use parser::ConfigFormat;

use contracts::ContractError;
use std::path::Path;

/// Configuration loader
///
/// Provides static methods to load configuration from files or strings.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from file path
    ///
    /// Automatically detects format from file extension (.toml / .json).
    ///
    /// # Errors
    /// - File read failure
    /// - Unsupported format
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_path(path: &Path) -> Result<AnalysisConfig, ContractError> {
        let format = Self::detect_format(path)?;
        let content = std::fs::read_to_string(path)?;
        Self::load_from_str(&content, format)
    }

    /// Load configuration from file path, or defaults when no path is given
    pub fn load_or_default(path: Option<&Path>) -> Result<AnalysisConfig, ContractError> {
        match path {
            Some(path) => Self::load_from_path(path),
            None => Ok(AnalysisConfig::default()),
        }
    }

    /// Load configuration from string
    ///
    /// # Errors
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_str(
        content: &str,
        format: ConfigFormat,
    ) -> Result<AnalysisConfig, ContractError> {
        let config: AnalysisConfig = parser::parse(content, format)?;
        validator::validate(&config)?;
        Ok(config)
    }

    /// Validate an already constructed configuration
    pub fn validate(config: &AnalysisConfig) -> Result<(), ContractError> {
        validator::validate(config)
    }

    /// Serialize to TOML string
    pub fn to_toml(config: &AnalysisConfig) -> Result<String, ContractError> {
        toml::to_string_pretty(config)
            .map_err(|e| ContractError::config_parse(format!("TOML serialize error: {e}")))
    }

    /// Serialize to JSON string
    pub fn to_json(config: &AnalysisConfig) -> Result<String, ContractError> {
        serde_json::to_string_pretty(config)
            .map_err(|e| ContractError::config_parse(format!("JSON serialize error: {e}")))
    }

    /// Infer configuration format from file extension
    fn detect_format(path: &Path) -> Result<ConfigFormat, ContractError> {
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            ContractError::config_parse("cannot determine file format from extension")
        })?;

        ConfigFormat::from_extension(ext).ok_or_else(|| {
            ContractError::config_parse(format!("unsupported config format: .{ext}"))
        })
    }
}
