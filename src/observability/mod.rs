//! Observability for worldschema
//!
//! Structured logging via `tracing`. Every event carries a stable `event`
//! field (see [`Event`]). Library code only emits events; the binary decides
//! whether and how to install a subscriber.
//!
//! # Usage
//!
//! ```ignore
//! use worldschema::observability::{self, Event, LogConfig};
//!
//! observability::init(&LogConfig::default())?;
//! tracing::info!(event = Event::BuildStart.as_str(), namespaces = 3, "build started");
//! ```

mod events;

pub use events::Event;

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

/// Accepted log levels, lowest first.
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Log line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per line
    #[default]
    Json,
    /// Human-readable lines
    Pretty,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Default level directive; `RUST_LOG` overrides it
    pub level: String,
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Json,
        }
    }
}

/// Observability errors
#[derive(Debug, thiserror::Error)]
pub enum ObservabilityError {
    #[error("invalid log level '{0}'")]
    InvalidLevel(String),

    #[error("failed to install log subscriber: {0}")]
    Install(String),
}

/// Installs the global subscriber. Logs go to stderr so stdout stays machine-readable.
pub fn init(config: &LogConfig) -> Result<(), ObservabilityError> {
    if !LOG_LEVELS.contains(&config.level.as_str()) {
        return Err(ObservabilityError::InvalidLevel(config.level.clone()));
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("worldschema={}", config.level)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let installed = match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.try_init(),
    };

    installed.map_err(|e| ObservabilityError::Install(e.to_string()))
}
