//! paramform - schema-driven formatting, validation and redaction of request
//! parameters
//!
//! - `schema`: field definitions, loaded from JSON or built in code
//! - `validate`: the individual field rules and their errors
//! - `format`: casting and formatting a record against a schema
//! - `path`: reading and modifying nested values by dotted path
//! - `redact`: masking, hashing and obfuscating values for logs
//! - `cli`: the `paramform` command-line tool

pub mod cli;
pub mod format;
pub mod path;
pub mod redact;
pub mod schema;
pub mod validate;
