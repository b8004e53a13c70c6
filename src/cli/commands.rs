//! CLI command implementations
//!
//! Every command writes exactly one JSON object to its writer. Build
//! commands report every rejected namespace and declaration before failing.

use std::io::Write;
use std::path::Path;

use serde_json::{json, Value};

use crate::compiler::{BuildPass, BuildReport};
use crate::config::CompilerConfig;
use crate::declaration::DeclarationLoader;
use crate::observability::{self, Event};
use crate::schema::catalog::{scalar_kinds, CatalogType};

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::{stdout, write_error, write_response};

/// Dispatch a parsed command.
pub fn run_command(command: Command) -> CliResult<()> {
    let mut out = stdout();
    match command {
        Command::Check { config } => check(&load_config(&config)?, &mut out),
        Command::Compile { config } => compile(&load_config(&config)?, &mut out),
        Command::Catalog => catalog(&mut out),
    }
}

/// Load configuration and install logging.
fn load_config(path: &Path) -> CliResult<CompilerConfig> {
    let config = CompilerConfig::load(path)?;
    observability::init(&config.log_config())?;
    tracing::info!(
        event = Event::ConfigLoaded.as_str(),
        path = %path.display(),
        declarations = config.declarations.len(),
        "configuration loaded"
    );
    Ok(config)
}

/// Load declarations and run one build pass.
pub fn build(config: &CompilerConfig) -> BuildReport {
    let loaded = DeclarationLoader::new(config.declarations.clone()).load_all();
    BuildPass::new(config.build_options()).run_loaded(loaded, &config.recognized_codegen_hints)
}

/// Validate everything; print a summary or every problem found.
pub fn check<W: Write>(config: &CompilerConfig, out: &mut W) -> CliResult<()> {
    let report = build(config);
    if !report.is_success() {
        return write_failure(&report, out);
    }

    let namespaces: Vec<Value> = report
        .registry
        .all_namespaces()
        .map(|ns| json!({ "name": ns.name(), "tables": ns.tables().len() }))
        .collect();
    write_response(out, json!({ "namespaces": namespaces }))
}

/// Validate everything; print the normalized registry.
pub fn compile<W: Write>(config: &CompilerConfig, out: &mut W) -> CliResult<()> {
    let report = build(config);
    if !report.is_success() {
        return write_failure(&report, out);
    }

    let namespaces: Vec<&_> = report.registry.all_namespaces().collect();
    write_response(out, json!({ "namespaces": serde_json::to_value(namespaces)? }))
}

/// Print the type catalog.
pub fn catalog<W: Write>(out: &mut W) -> CliResult<()> {
    let types: Vec<Value> = scalar_kinds()
        .map(|kind| {
            let scalar = CatalogType::Scalar(kind);
            json!({
                "type": scalar.type_name(),
                "array_type": CatalogType::Array(kind).type_name(),
                "static_byte_length": scalar.static_byte_length(),
                "key_eligible": scalar.is_key_eligible(),
            })
        })
        .collect();
    write_response(out, json!({ "types": types }))
}

fn write_failure<W: Write>(report: &BuildReport, out: &mut W) -> CliResult<()> {
    let declaration_errors: Vec<Value> = report
        .declaration_errors
        .iter()
        .map(|e| json!({ "code": e.code(), "message": e.to_string() }))
        .collect();
    let violations: Vec<_> = report.violations().collect();

    let failure = CliError::build_failed(report.failures.len() + report.declaration_errors.len());
    write_error(
        out,
        failure.code_str(),
        json!({
            "violations": serde_json::to_value(violations)?,
            "declaration_errors": declaration_errors,
        }),
    )?;
    Err(failure)
}
