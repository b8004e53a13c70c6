//! Declaration discovery
//!
//! - A path may name a `.json` file or a directory
//! - Directories are read non-recursively, `.json` files in file-name order
//! - One unreadable file does not hide problems in the others

use std::fs;
use std::path::{Path, PathBuf};

use super::errors::{DeclarationError, DeclarationResult};
use super::raw::{parse_declarations, NamespaceDeclaration};
use crate::observability::Event;

/// Everything read from the declaration paths.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Declarations in discovery order
    pub declarations: Vec<NamespaceDeclaration>,
    pub errors: Vec<DeclarationError>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Reads namespace declarations from files and directories.
pub struct DeclarationLoader {
    paths: Vec<PathBuf>,
}

impl DeclarationLoader {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }

    /// Returns the configured paths.
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Loads every declaration reachable from the configured paths.
    pub fn load_all(&self) -> LoadReport {
        let mut report = LoadReport::default();

        for path in &self.paths {
            match discover(path) {
                Ok(files) => {
                    for file in files {
                        match load_file(&file) {
                            Ok(mut declarations) => report.declarations.append(&mut declarations),
                            Err(e) => report.errors.push(e),
                        }
                    }
                }
                Err(e) => report.errors.push(e),
            }
        }

        tracing::info!(
            event = Event::DeclarationsLoaded.as_str(),
            paths = self.paths.len(),
            declarations = report.declarations.len(),
            errors = report.errors.len(),
            "declarations loaded"
        );
        report
    }
}

/// Lists the declaration files a path refers to.
fn discover(path: &Path) -> DeclarationResult<Vec<PathBuf>> {
    if !path.exists() {
        return Err(DeclarationError::MissingPath(path.to_path_buf()));
    }
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    let io_error = |source| DeclarationError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(path).map_err(io_error)? {
        let file = entry.map_err(io_error)?.path();
        if file.is_file() && file.extension().map_or(false, |ext| ext == "json") {
            files.push(file);
        }
    }
    files.sort();
    Ok(files)
}

/// Reads and parses one declaration file.
pub fn load_file(path: &Path) -> DeclarationResult<Vec<NamespaceDeclaration>> {
    let content = fs::read_to_string(path).map_err(|source| DeclarationError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    parse_declarations(&content).map_err(|source| DeclarationError::Malformed {
        path: path.to_path_buf(),
        source,
    })
}
