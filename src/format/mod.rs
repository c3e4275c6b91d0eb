//! Type coercion and schema-driven formatting
//!
//! [`Formatter`] owns the number formatting configuration and walks a schema
//! and a raw value tree together, producing a normalized tree or the first
//! [`ValidationError`](crate::validate::ValidationError).

pub mod coerce;
mod config;
mod formatter;

pub use config::{ConfigError, FormatConfig, MAX_PRECISION};
pub use formatter::Formatter;
