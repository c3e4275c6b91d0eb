//! Logging setup using `tracing-subscriber`
//!
//! Logs go to stderr so stdout carries only the JSON envelope. The level comes
//! from `RUST_LOG` and defaults to `warn`. Field values are never logged, only
//! field paths and failure kinds.

use tracing_subscriber::EnvFilter;

use super::args::LogFormat;
use super::errors::{CliError, CliResult};

const DEFAULT_FILTER: &str = "warn";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Installs the global subscriber
pub fn init_logging(format: LogFormat) -> CliResult<()> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    }
    .map_err(|e| CliError::Logging(e.to_string()))
}
