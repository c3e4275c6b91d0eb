//! Number formatting configuration
//!
//! Built once at startup and shared read-only by every formatter call. Can be
//! loaded from a JSON file; missing keys take their defaults:
//!
//! ```json
//! { "precision": 2, "decimal_separator": ".", "thousands_separator": "" }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest precision a decimal can carry
pub const MAX_PRECISION: u32 = 28;

/// Configuration errors
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Failed to read config '{path}': {message}")]
    Io { path: String, message: String },

    #[error("Invalid config JSON: {0}")]
    Parse(String),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Defaults applied when casting floats to strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatConfig {
    /// Decimals used when a node declares none
    #[serde(default = "default_precision")]
    pub precision: u32,

    #[serde(default = "default_decimal_separator")]
    pub decimal_separator: String,

    /// Empty means no grouping
    #[serde(default)]
    pub thousands_separator: String,
}

fn default_precision() -> u32 {
    2
}

fn default_decimal_separator() -> String {
    ".".to_string()
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            precision: default_precision(),
            decimal_separator: default_decimal_separator(),
            thousands_separator: String::new(),
        }
    }
}

impl FormatConfig {
    /// Builder-style precision override
    pub fn with_precision(mut self, precision: u32) -> Self {
        self.precision = precision;
        self
    }

    pub fn with_separators(
        mut self,
        decimal_separator: impl Into<String>,
        thousands_separator: impl Into<String>,
    ) -> Self {
        self.decimal_separator = decimal_separator.into();
        self.thousands_separator = thousands_separator.into();
        self
    }

    /// Parses and validates a JSON document
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let config: FormatConfig =
            serde_json::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.precision > MAX_PRECISION {
            return Err(ConfigError::Invalid(format!(
                "precision {} exceeds maximum of {}",
                self.precision, MAX_PRECISION
            )));
        }
        if self.decimal_separator.is_empty() {
            return Err(ConfigError::Invalid("decimal_separator must not be empty".into()));
        }
        if self.decimal_separator == self.thousands_separator {
            return Err(ConfigError::Invalid(
                "decimal_separator and thousands_separator must differ".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FormatConfig::default();
        assert_eq!(config.precision, 2);
        assert_eq!(config.decimal_separator, ".");
        assert_eq!(config.thousands_separator, "");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = FormatConfig::from_json_str(r#"{ "thousands_separator": " " }"#).unwrap();
        assert_eq!(config.precision, 2);
        assert_eq!(config.thousands_separator, " ");
    }

    #[test]
    fn test_invalid_precision() {
        let err = FormatConfig::from_json_str(r#"{ "precision": 40 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_same_separators_rejected() {
        let config = FormatConfig::default().with_separators(",", ",");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("format.json");
        fs::write(&path, r#"{ "precision": 3, "decimal_separator": "," }"#).unwrap();

        let config = FormatConfig::from_file(&path).unwrap();
        assert_eq!(config.precision, 3);
        assert_eq!(config.decimal_separator, ",");

        let missing = FormatConfig::from_file(&dir.path().join("absent.json"));
        assert!(matches!(missing, Err(ConfigError::Io { .. })));
    }
}
