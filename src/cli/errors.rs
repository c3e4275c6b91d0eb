//! CLI error types

use std::io;

use thiserror::Error;

use crate::format::ConfigError;
use crate::schema::SchemaError;

/// CLI error
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Schema(#[from] SchemaError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Empty input")]
    EmptyInput,

    #[error("Logging setup failed: {0}")]
    Logging(String),
}

impl CliError {
    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        match self {
            CliError::Config(_) => "PF_CLI_CONFIG_ERROR",
            CliError::Schema(e) => e.code().code(),
            CliError::Io(_) => "PF_CLI_IO_ERROR",
            CliError::Json(_) => "PF_CLI_JSON_ERROR",
            CliError::EmptyInput => "PF_CLI_EMPTY_INPUT",
            CliError::Logging(_) => "PF_CLI_LOGGING_ERROR",
        }
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
