//! CLI command implementations
//!
//! Each command produces a [`Reply`]; `run_command` writes it as one JSON
//! envelope on stdout. A record rejected by its schema is a normal outcome,
//! reported as an error envelope with the failing field path.

use std::path::Path;

use serde_json::{json, Value};

use super::args::{Cli, Command, RedactMode};
use super::errors::CliResult;
use super::io::{read_input, write_error, write_response};
use super::logging::init_logging;
use crate::format::{FormatConfig, Formatter};
use crate::path;
use crate::redact::{self, HashAlgorithm, Redaction};
use crate::schema::SchemaLoader;
use crate::validate::ValidationError;

/// Result of a command that ran to completion
#[derive(Debug)]
pub enum Reply {
    Data(Value),
    Rejected(ValidationError),
}

/// How the process should exit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Rejected,
}

impl Outcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            Outcome::Success => 0,
            Outcome::Rejected => 2,
        }
    }
}

/// Main entry point for CLI
///
/// Parses arguments, installs logging and dispatches the command.
pub fn run() -> CliResult<Outcome> {
    let cli = Cli::parse_args();
    init_logging(cli.log_format)?;
    run_command(cli.command)
}

/// Run a command and write its envelope to stdout
pub fn run_command(cmd: Command) -> CliResult<Outcome> {
    match execute(cmd)? {
        Reply::Data(data) => {
            write_response(data)?;
            Ok(Outcome::Success)
        }
        Reply::Rejected(e) => {
            write_error(e.kind().code(), Some(e.field()), e.message())?;
            Ok(Outcome::Rejected)
        }
    }
}

/// Run a command without writing anything
pub fn execute(cmd: Command) -> CliResult<Reply> {
    match cmd {
        Command::Format { schema, input, config, sanitize } => {
            format(&schema, input.as_deref(), config.as_deref(), sanitize)
        }
        Command::Validate { schema, input, config } => {
            validate(&schema, input.as_deref(), config.as_deref())
        }
        Command::Get { path, default, input } => get(&path, default.as_deref(), input.as_deref()),
        Command::Redact { mode, mask_char, algorithm, paths, input } => {
            redact(mode, mask_char, algorithm, &paths, input.as_deref())
        }
        Command::Describe { schema } => describe(&schema),
        Command::List { dir } => list(&dir),
    }
}

fn load_formatter(config: Option<&Path>) -> CliResult<Formatter> {
    let config = match config {
        Some(path) => FormatConfig::from_file(path)?,
        None => FormatConfig::default(),
    };
    Ok(Formatter::new(config)?)
}

/// Format a record, rejecting or stripping disallowed characters
pub fn format(
    schema_path: &Path,
    input: Option<&Path>,
    config: Option<&Path>,
    sanitize: bool,
) -> CliResult<Reply> {
    let schema = SchemaLoader::read_schema_file(schema_path)?;
    let formatter = load_formatter(config)?;
    let record = read_input(input)?;

    let result = if sanitize {
        formatter.sanitize(&schema.fields, &record)
    } else {
        formatter.format_schema(&schema, &record)
    };
    Ok(match result {
        Ok(formatted) => Reply::Data(formatted),
        Err(e) => Reply::Rejected(e),
    })
}

/// Check a record without returning the formatted output
pub fn validate(schema_path: &Path, input: Option<&Path>, config: Option<&Path>) -> CliResult<Reply> {
    let schema = SchemaLoader::read_schema_file(schema_path)?;
    let formatter = load_formatter(config)?;
    let record = read_input(input)?;

    Ok(match formatter.validate(&schema.fields, &record) {
        Ok(()) => Reply::Data(json!({ "valid": true })),
        Err(e) => Reply::Rejected(e),
    })
}

/// Read one value by path; `default` is parsed as JSON, falling back to a
/// plain string
pub fn get(path_str: &str, default: Option<&str>, input: Option<&Path>) -> CliResult<Reply> {
    let tree = read_input(input)?;
    let default = match default {
        Some(raw) => serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string())),
        None => Value::Null,
    };
    Ok(Reply::Data(path::get(&tree, path_str, default)))
}

/// Redact a whole document, or only the given paths
pub fn redact(
    mode: RedactMode,
    mask_char: char,
    algorithm: HashAlgorithm,
    paths: &[String],
    input: Option<&Path>,
) -> CliResult<Reply> {
    let mut tree = read_input(input)?;
    let redaction = match mode {
        RedactMode::Mask => Redaction::Mask(mask_char),
        RedactMode::Hash => Redaction::Hash(algorithm),
        RedactMode::Obfuscate => Redaction::Obfuscate,
    };

    if paths.is_empty() {
        return Ok(Reply::Data(redaction.apply(&tree)));
    }

    let failures = redact::redact_paths(&mut tree, paths.iter().map(String::as_str), redaction);
    for failure in &failures {
        tracing::warn!(path = failure.path(), "Redaction path not found");
    }
    Ok(Reply::Data(tree))
}

/// Condensed view of a schema file
pub fn describe(schema_path: &Path) -> CliResult<Reply> {
    let schema = SchemaLoader::read_schema_file(schema_path)?;
    Ok(Reply::Data(schema.condensed()))
}

/// Loads a schema directory and lists its schemas, sorted by id and version
pub fn list(dir: &Path) -> CliResult<Reply> {
    let mut loader = SchemaLoader::new(dir);
    loader.load_all()?;

    let mut schemas: Vec<_> = loader.all_schemas().collect();
    schemas.sort_by(|a, b| a.key().cmp(&b.key()));
    let listed = schemas
        .into_iter()
        .map(|schema| {
            json!({
                "schema_id": schema.schema_id,
                "schema_version": schema.schema_version,
                "description": schema.description,
                "fields": schema.fields.names().collect::<Vec<_>>()
            })
        })
        .collect();
    Ok(Reply::Data(Value::Array(listed)))
}
