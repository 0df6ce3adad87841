//! Textmerge: merges keyed text entry files with patch overrides.
//!
//! This is the main entry point for the `textmerge` CLI. It parses arguments,
//! runs the merge pipeline, and handles errors with proper exit codes.

mod cli;
mod commands;
pub mod config;
pub mod error;
pub mod exit_codes;
pub mod fs;
pub mod merge;
pub mod scan;

use clap::Parser;
use cli::Cli;
use std::process::ExitCode;

fn main() -> ExitCode {
    // clap exits with code 2 on bad arguments by default; usage problems must
    // map to USER_ERROR here, while --help and --version stay successful.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            let code = if err.use_stderr() {
                exit_codes::USER_ERROR
            } else {
                exit_codes::SUCCESS
            };
            return ExitCode::from(code as u8);
        }
    };

    match commands::run(cli) {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(err) => {
            // Print user-actionable error message to stderr
            eprintln!("Error: {}", err);

            ExitCode::from(err.exit_code() as u8)
        }
    }
}
