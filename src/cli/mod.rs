//! Command-line interface for paramform
//!
//! Commands:
//! - format: format a record against a schema
//! - validate: check a record against a schema
//! - get: read a nested value by path
//! - redact: mask, hash or obfuscate a document
//! - describe: print a schema's condensed view
//! - list: load a schema directory and list its schemas

mod args;
mod commands;
mod errors;
mod io;
mod logging;

pub use args::{Cli, Command, LogFormat, RedactMode};
pub use commands::{
    describe, execute, format, get, list, redact, run, run_command, validate, Outcome, Reply,
};
pub use errors::{CliError, CliResult};
pub use io::{error_envelope, ok_envelope, read_input, write_error, write_response};
pub use logging::init_logging;
