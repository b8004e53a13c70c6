//! Compiler configuration
//!
//! Loaded from a JSON file. Only `declarations` is required:
//!
//! ```json
//! {
//!   "declarations": ["declarations/"],
//!   "recognized_codegen_hints": ["outputDirectory", "dataStruct"],
//!   "parallel_validation": true,
//!   "max_parallelism": 4,
//!   "log_level": "info",
//!   "log_format": "json"
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::compiler::BuildOptions;
use crate::observability::{LogConfig, LogFormat, LOG_LEVELS};
use crate::schema::DEFAULT_CODEGEN_HINTS;

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{0}")]
    Invalid(String),
}

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompilerConfig {
    /// Declaration files or directories (required)
    pub declarations: Vec<PathBuf>,

    /// Codegen hint names understood by namespaces that do not list their own
    #[serde(default = "default_codegen_hints")]
    pub recognized_codegen_hints: BTreeSet<String>,

    /// Validate namespaces concurrently (optional, default true)
    #[serde(default = "default_parallel_validation")]
    pub parallel_validation: bool,

    /// Validation worker bound (optional, default 4)
    #[serde(default = "default_max_parallelism")]
    pub max_parallelism: usize,

    /// Log level (optional, default "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log format (optional, default json)
    #[serde(default)]
    pub log_format: LogFormat,
}

fn default_codegen_hints() -> BTreeSet<String> {
    DEFAULT_CODEGEN_HINTS.iter().map(|h| h.to_string()).collect()
}
fn default_parallel_validation() -> bool {
    true
}
fn default_max_parallelism() -> usize {
    4
}
fn default_log_level() -> String {
    "info".to_string()
}

impl CompilerConfig {
    /// Configuration for the given declaration paths, everything else defaulted.
    pub fn with_declarations(declarations: Vec<PathBuf>) -> Self {
        Self {
            declarations,
            recognized_codegen_hints: default_codegen_hints(),
            parallel_validation: default_parallel_validation(),
            max_parallelism: default_max_parallelism(),
            log_level: default_log_level(),
            log_format: LogFormat::default(),
        }
    }

    /// Load configuration from file.
    ///
    /// Relative declaration paths resolve against the config file's directory.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let mut config = Self::from_json(&content)?;

        if let Some(base) = path.parent() {
            config.declarations = config
                .declarations
                .into_iter()
                .map(|p| if p.is_relative() { base.join(p) } else { p })
                .collect();
        }

        Ok(config)
    }

    /// Parse and validate configuration JSON.
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: CompilerConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.declarations.is_empty() {
            return Err(ConfigError::Invalid(
                "declarations must list at least one path".to_string(),
            ));
        }

        if self.max_parallelism == 0 {
            return Err(ConfigError::Invalid("max_parallelism must be > 0".to_string()));
        }

        if !LOG_LEVELS.contains(&self.log_level.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "Invalid log_level: '{}'. Expected one of {}.",
                self.log_level,
                LOG_LEVELS.join(", ")
            )));
        }

        Ok(())
    }

    pub fn build_options(&self) -> BuildOptions {
        BuildOptions {
            parallel_validation: self.parallel_validation,
            max_parallelism: self.max_parallelism,
        }
    }

    pub fn log_config(&self) -> LogConfig {
        LogConfig {
            level: self.log_level.clone(),
            format: self.log_format,
        }
    }
}
