//! CLI module for worldschema
//!
//! Provides command-line interface for:
//! - check: validate declarations and report every violation
//! - compile: print the normalized schema registry
//! - catalog: print the column type catalog

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{build, catalog, check, compile, run_command};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{write_error, write_response};

/// Parse arguments and run the selected command.
pub fn run() -> CliResult<()> {
    run_command(Cli::parse_args().command)
}
