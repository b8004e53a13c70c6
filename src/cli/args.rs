//! CLI argument definitions using clap
//!
//! Commands:
//! - worldschema check --config <path>
//! - worldschema compile --config <path>
//! - worldschema catalog

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// worldschema - A deterministic table schema compiler
#[derive(Parser, Debug)]
#[command(name = "worldschema")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate every declared namespace and report all violations
    Check {
        /// Path to configuration file
        #[arg(long, default_value = "./worldschema.json")]
        config: PathBuf,
    },

    /// Validate, then print the normalized schema of every namespace
    Compile {
        /// Path to configuration file
        #[arg(long, default_value = "./worldschema.json")]
        config: PathBuf,
    },

    /// Print the column type catalog
    Catalog,
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
    fn test_parse_check_default_config() {
        let cli = Cli::try_parse_from(["worldschema", "check"]).unwrap();
        match cli.command {
            Command::Check { config } => assert_eq!(config, PathBuf::from("./worldschema.json")),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_compile_with_config() {
        let cli = Cli::try_parse_from(["worldschema", "compile", "--config", "/etc/ws.json"]).unwrap();
        assert!(matches!(cli.command, Command::Compile { ref config } if config == &PathBuf::from("/etc/ws.json")));
    }

    #[test]
    fn test_parse_catalog() {
        let cli = Cli::try_parse_from(["worldschema", "catalog"]).unwrap();
        assert!(matches!(cli.command, Command::Catalog));
    }
}
