//! paramform CLI entry point
//!
//! Parses arguments, dispatches to the CLI module and maps the outcome to an
//! exit code: 0 on success, 2 when a record is rejected, 1 on any other error.

use paramform::cli;

fn main() {
    match cli::run() {
        Ok(outcome) => std::process::exit(outcome.exit_code()),
        Err(e) => {
            eprintln!("[{}] {}", e.code_str(), e);
            std::process::exit(1);
        }
    }
}
