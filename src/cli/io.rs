//! JSON I/O handling for CLI
//!
//! - Input: one JSON document from a file or stdin
//! - Output: one JSON envelope on stdout

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use serde_json::{json, Value};

use super::errors::{CliError, CliResult};

/// Reads a JSON document from `path`, or all of stdin
pub fn read_input(path: Option<&Path>) -> CliResult<Value> {
    let content = match path {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            io::stdin().lock().read_to_string(&mut buf)?;
            buf
        }
    };
    parse_input(&content)
}

fn parse_input(content: &str) -> CliResult<Value> {
    if content.trim().is_empty() {
        return Err(CliError::EmptyInput);
    }
    Ok(serde_json::from_str(content)?)
}

/// Success envelope
pub fn ok_envelope(data: Value) -> Value {
    json!({
        "status": "ok",
        "data": data
    })
}

/// Error envelope; `field` is included when the failure has one
pub fn error_envelope(code: &str, field: Option<&str>, message: &str) -> Value {
    let mut envelope = json!({
        "status": "error",
        "code": code,
        "message": message
    });
    if let Some(field) = field {
        envelope["field"] = json!(field);
    }
    envelope
}

fn write_envelope<W: Write>(writer: &mut W, envelope: &Value) -> CliResult<()> {
    serde_json::to_writer(&mut *writer, envelope)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Write a success response to stdout
pub fn write_response(data: Value) -> CliResult<()> {
    write_envelope(&mut io::stdout().lock(), &ok_envelope(data))
}

/// Write an error response to stdout
pub fn write_error(code: &str, field: Option<&str>, message: &str) -> CliResult<()> {
    write_envelope(&mut io::stdout().lock(), &error_envelope(code, field, message))
}
