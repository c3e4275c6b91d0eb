//! CLI argument definitions using clap
//!
//! Commands:
//! - paramform format --schema <file> [--input <file>] [--config <file>] [--sanitize]
//! - paramform validate --schema <file> [--input <file>] [--config <file>]
//! - paramform get --path <a.b.c> [--default <json>] [--input <file>]
//! - paramform redact [--mode mask|hash|obfuscate] [--path <p>]... [--input <file>]
//! - paramform describe --schema <file>
//! - paramform list --dir <dir>

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::redact::HashAlgorithm;

/// paramform - schema-driven parameter formatting and redaction
#[derive(Parser, Debug)]
#[command(name = "paramform")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Log output format (logs go to stderr, level from RUST_LOG)
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty, global = true)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Format a JSON record against a schema
    Format {
        /// Path to schema file
        #[arg(long)]
        schema: PathBuf,

        /// Input record (stdin when omitted)
        #[arg(long)]
        input: Option<PathBuf>,

        /// Path to number formatting config
        #[arg(long)]
        config: Option<PathBuf>,

        /// Strip disallowed characters instead of rejecting them
        #[arg(long)]
        sanitize: bool,
    },

    /// Check a JSON record against a schema
    Validate {
        /// Path to schema file
        #[arg(long)]
        schema: PathBuf,

        /// Input record (stdin when omitted)
        #[arg(long)]
        input: Option<PathBuf>,

        /// Path to number formatting config
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Read a nested value by path
    Get {
        /// Dot-delimited path, e.g. response.receipt.cc.response_code
        #[arg(long)]
        path: String,

        /// Value returned when the path is missing (JSON, or a bare string)
        #[arg(long)]
        default: Option<String>,

        /// Input document (stdin when omitted)
        #[arg(long)]
        input: Option<PathBuf>,
    },

    /// Redact a JSON document for logging
    Redact {
        #[arg(long, value_enum, default_value_t = RedactMode::Mask)]
        mode: RedactMode,

        /// Mask character
        #[arg(long = "char", default_value_t = '*')]
        mask_char: char,

        /// Digest for hash mode
        #[arg(long, default_value = "sha256")]
        algorithm: HashAlgorithm,

        /// Only redact these paths (whole document when omitted)
        #[arg(long = "path")]
        paths: Vec<String>,

        /// Input document (stdin when omitted)
        #[arg(long)]
        input: Option<PathBuf>,
    },

    /// Print the condensed view of a schema
    Describe {
        /// Path to schema file
        #[arg(long)]
        schema: PathBuf,
    },

    /// Load every schema file in a directory and list them
    List {
        /// Directory holding schema_<id>_<version>.json files
        #[arg(long)]
        dir: PathBuf,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedactMode {
    Mask,
    Hash,
    Obfuscate,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_format_command() {
        let cli = Cli::try_parse_from([
            "paramform", "format", "--schema", "s.json", "--input", "in.json", "--sanitize",
        ])
        .unwrap();
        match cli.command {
            Command::Format { schema, input, config, sanitize } => {
                assert_eq!(schema, PathBuf::from("s.json"));
                assert_eq!(input, Some(PathBuf::from("in.json")));
                assert!(config.is_none());
                assert!(sanitize);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_redact_defaults() {
        let cli = Cli::try_parse_from(["paramform", "redact", "--path", "a.b", "--path", "c"]).unwrap();
        match cli.command {
            Command::Redact { mode, mask_char, algorithm, paths, input } => {
                assert_eq!(mode, RedactMode::Mask);
                assert_eq!(mask_char, '*');
                assert_eq!(algorithm, HashAlgorithm::Sha256);
                assert_eq!(paths, vec!["a.b".to_string(), "c".to_string()]);
                assert!(input.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_unknown_algorithm_rejected() {
        let result = Cli::try_parse_from(["paramform", "redact", "--mode", "hash", "--algorithm", "md5"]);
        assert!(result.is_err());
    }
}
