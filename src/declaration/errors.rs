//! Declaration loading errors
//!
//! These cover input that cannot be turned into a definition at all.
//! Schema rule violations are reported by the validator, not here.

use std::io;
use std::path::PathBuf;

/// Result type for declaration operations
pub type DeclarationResult<T> = Result<T, DeclarationError>;

#[derive(Debug, thiserror::Error)]
pub enum DeclarationError {
    #[error("declaration path does not exist: {0}")]
    MissingPath(PathBuf),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed declaration in {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("table '{table}' in namespace '{namespace}' has unknown type '{table_type}' (expected 'table' or 'offchainTable')")]
    UnknownTableType {
        namespace: String,
        table: String,
        table_type: String,
    },
}

impl DeclarationError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            DeclarationError::MissingPath(_) => "DECLARATION_MISSING_PATH",
            DeclarationError::Io { .. } => "DECLARATION_IO",
            DeclarationError::Malformed { .. } => "DECLARATION_MALFORMED",
            DeclarationError::UnknownTableType { .. } => "DECLARATION_UNKNOWN_TABLE_TYPE",
        }
    }
}
