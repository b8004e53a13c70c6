//! Declaration Loading Tests
//!
//! Declaration files on disk through to a populated registry:
//! - Table entries keep declaration order and duplicates
//! - Shorthand and offchain tables lower correctly
//! - Bad files and bad namespaces are reported together

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use tempfile::TempDir;
use worldschema::compiler::{BuildOptions, BuildPass};
use worldschema::declaration::{DeclarationError, DeclarationLoader};
use worldschema::schema::{ViolationKind, DEFAULT_CODEGEN_HINTS};

// =============================================================================
// Helper Functions
// =============================================================================

fn write(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

fn default_hints() -> BTreeSet<String> {
    DEFAULT_CODEGEN_HINTS.iter().map(|h| h.to_string()).collect()
}

fn build(dir: &Path) -> worldschema::compiler::BuildReport {
    let loaded = DeclarationLoader::new(vec![dir.to_path_buf()]).load_all();
    assert!(loaded.is_clean(), "unexpected load errors: {:?}", loaded.errors);
    BuildPass::new(BuildOptions::default()).run_declarations(loaded.declarations, &default_hints())
}

// =============================================================================
// Success Path
// =============================================================================

#[test]
fn test_world_compiles() {
    let tmp = TempDir::new().unwrap();
    write(
        tmp.path(),
        "world.json",
        r#"{
            "namespace": "app",
            "deploy": { "upgradeable": true },
            "tables": {
                "Counter": "uint32",
                "Position": {
                    "schema": { "player": "address", "x": "int32", "y": "int32", "z": "int32" },
                    "key": ["player"],
                    "codegen": { "dataStruct": false }
                },
                "Inventory": {
                    "schema": { "owner": "address", "items": "uint256[]", "slot": "uint8", "label": "string" },
                    "key": ["owner", "slot"]
                },
                "ChatLog": {
                    "schema": { "message": "string" },
                    "key": [],
                    "type": "offchainTable"
                }
            }
        }"#,
    );

    let report = build(tmp.path());
    assert!(report.is_success(), "{:?}", report.failures);

    let app = report.registry.lookup("app").unwrap();
    assert_eq!(app.deploy()["upgradeable"], serde_json::json!(true));
    let names: Vec<_> = app.tables().iter().map(|t| t.name()).collect();
    assert_eq!(names, vec!["Counter", "Position", "Inventory", "ChatLog"]);

    let counter = app.table("Counter").unwrap();
    assert_eq!(counter.key_schema()[0].name, "id");
    assert_eq!(counter.key_schema()[0].ty.type_name(), "bytes32");

    let inventory = app.table("Inventory").unwrap();
    let values: Vec<_> = inventory.value_schema().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(values, vec!["items", "label"]);
    assert_eq!(inventory.layout().dynamic_fields, 2);

    let position = app.table("Position").unwrap();
    assert_eq!(position.layout().static_byte_length, 12);

    let chat = app.table("ChatLog").unwrap();
    assert!(!chat.persisted());
    assert!(chat.is_singleton());
    assert!(chat.resource_id().to_hex().starts_with("0x6f74"));
}

// =============================================================================
// Failure Reporting
// =============================================================================

/// Duplicate keys in the raw JSON survive parsing and are caught.
#[test]
fn test_duplicates_in_json_detected() {
    let tmp = TempDir::new().unwrap();
    write(
        tmp.path(),
        "dup.json",
        r#"{
            "namespace": "alpha",
            "tables": {
                "Metadata": { "schema": { "owner": "address", "owner": "bytes32" }, "key": [] },
                "Metadata": { "schema": { "chipAddress": "address" }, "key": [] }
            }
        }"#,
    );

    let report = build(tmp.path());
    let kinds: Vec<_> = report.violations().map(|v| v.kind).collect();
    assert_eq!(kinds, vec![ViolationKind::DuplicateColumn, ViolationKind::DuplicateTable]);
}

/// Every bad namespace is reported; good ones still register.
#[test]
fn test_all_failures_reported() {
    let tmp = TempDir::new().unwrap();
    write(
        tmp.path(),
        "a.json",
        r#"[
            { "namespace": "alpha", "tables": { "Item": { "schema": { "id": "string" }, "key": ["id"] } } },
            { "namespace": "beta", "tables": { "Metadata": { "schema": { "a": "bool" }, "key": [] } } }
        ]"#,
    );
    write(
        tmp.path(),
        "b.json",
        r#"[
            { "namespace": "beta", "tables": {} },
            { "namespace": "gamma", "tables": { "T": { "schema": { "a": "bool" }, "key": [], "codegen": { "outputDir": "x" } } } }
        ]"#,
    );

    let report = build(tmp.path());
    assert!(!report.is_success());
    assert_eq!(report.registry.len(), 1);
    assert!(report.registry.contains("beta"));
    assert_eq!(report.failed_namespaces().collect::<Vec<_>>(), vec!["alpha", "beta", "gamma"]);

    let kinds: Vec<_> = report.violations().map(|v| v.kind).collect();
    assert_eq!(
        kinds,
        vec![
            ViolationKind::IneligibleKeyType,
            ViolationKind::DuplicateNamespace,
            ViolationKind::UnknownCodegenHint,
        ]
    );
}

/// A namespace may narrow the recognized hint set.
#[test]
fn test_namespace_hint_override() {
    let tmp = TempDir::new().unwrap();
    write(
        tmp.path(),
        "hints.json",
        r#"{
            "namespace": "custom",
            "codegenHints": ["storeArgument"],
            "tables": { "T": { "schema": { "a": "bool" }, "key": [], "codegen": { "dataStruct": true } } }
        }"#,
    );

    let report = build(tmp.path());
    let violations: Vec<_> = report.violations().collect();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].kind, ViolationKind::UnknownCodegenHint);
    assert_eq!(violations[0].column.as_deref(), Some("dataStruct"));
}

/// Structural problems stop at the loader, not the validator.
#[test]
fn test_unknown_table_type() {
    let tmp = TempDir::new().unwrap();
    write(
        tmp.path(),
        "bad.json",
        r#"{ "namespace": "x", "tables": { "T": { "schema": {}, "key": [], "type": "ephemeral" } } }"#,
    );

    let report = build(tmp.path());
    assert_eq!(report.declaration_errors.len(), 1);
    assert_eq!(report.declaration_errors[0].code(), "DECLARATION_UNKNOWN_TABLE_TYPE");
    assert!(report.registry.is_empty());
}

/// Every malformed table and every schema violation surfaces in one pass.
#[test]
fn test_bad_table_types_do_not_hide_violations() {
    let tmp = TempDir::new().unwrap();
    write(
        tmp.path(),
        "mixed.json",
        r#"{
            "namespace": "alpha",
            "tables": {
                "A": { "schema": { "x": "uint8" }, "key": [], "type": "ephemeral" },
                "B": { "schema": { "x": "uint8" }, "key": [], "type": "onchain" },
                "Item": { "schema": { "id": "string", "count": "uint16" }, "key": ["id"] }
            }
        }"#,
    );

    let report = build(tmp.path());
    let tables: Vec<_> = report
        .declaration_errors
        .iter()
        .map(|e| match e {
            DeclarationError::UnknownTableType { table, .. } => table.as_str(),
            other => panic!("unexpected error: {other}"),
        })
        .collect();
    assert_eq!(tables, vec!["A", "B"]);

    let violations: Vec<_> = report.violations().collect();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].kind, ViolationKind::IneligibleKeyType);
    assert_eq!(violations[0].column.as_deref(), Some("id"));
    assert!(report.registry.is_empty());
}
