//! Schema Invariant Tests
//!
//! - Validation is deterministic
//! - Validation is exhaustive and ordered by discovery
//! - Key eligibility follows the type's width
//! - Construction and validation never mutate their inputs

use std::collections::BTreeMap;

use serde_json::json;
use worldschema::schema::{
    make_namespace, make_table, validate, CatalogType, Column, Namespace, Table, ViolationKind,
};

// =============================================================================
// Helper Functions
// =============================================================================

fn keyed(name: &str, key_type: &str) -> Table {
    make_table(
        name,
        vec![Column::new("k", key_type), Column::new("v", "bytes")],
        vec!["k".to_string()],
        true,
        BTreeMap::new(),
    )
}

fn broken_namespace() -> Namespace {
    let mut codegen = BTreeMap::new();
    codegen.insert("outputDirectory".to_string(), json!("tables"));
    codegen.insert("storeArgumnet".to_string(), json!(true));

    let first = make_table(
        "First",
        vec![
            Column::new("a", "uint256"),
            Column::new("a", "bool"),
            Column::new("b", "decimal"),
            Column::new("c", "string"),
        ],
        vec!["missing".to_string(), "c".to_string(), "a".to_string(), "a".to_string()],
        true,
        codegen,
    );
    let second = make_table("Second", vec![Column::new("id", "uint9")], vec![], false, BTreeMap::new());
    let again = make_table("First", vec![], vec![], true, BTreeMap::new());

    make_namespace("broken", vec![first, second, again], BTreeMap::new())
}

// =============================================================================
// Determinism Tests
// =============================================================================

/// Validating twice yields identical violation lists.
#[test]
fn test_validation_is_deterministic() {
    let ns = broken_namespace();
    let first = validate(&ns).unwrap_err();
    for _ in 0..50 {
        assert_eq!(validate(&ns).unwrap_err(), first);
    }
}

/// Every problem is reported, tables then columns then rules.
#[test]
fn test_violations_in_discovery_order() {
    let violations = validate(&broken_namespace()).unwrap_err();
    let found: Vec<_> = violations
        .iter()
        .map(|v| (v.kind, v.table.as_deref(), v.column.as_deref()))
        .collect();

    assert_eq!(
        found,
        vec![
            (ViolationKind::DuplicateColumn, Some("First"), Some("a")),
            (ViolationKind::UnknownType, Some("First"), Some("b")),
            (ViolationKind::InvalidKeyColumn, Some("First"), Some("missing")),
            (ViolationKind::IneligibleKeyType, Some("First"), Some("c")),
            (ViolationKind::DuplicateKeyColumn, Some("First"), Some("a")),
            (ViolationKind::UnknownCodegenHint, Some("First"), Some("storeArgumnet")),
            (ViolationKind::UnknownType, Some("Second"), Some("id")),
            (ViolationKind::DuplicateTable, Some("First"), None),
        ]
    );
    assert!(violations.iter().all(|v| v.namespace == "broken"));
}

// =============================================================================
// Key Eligibility Tests
// =============================================================================

/// Fixed-width scalars pass the key check.
#[test]
fn test_fixed_width_keys_accepted() {
    for ty in ["uint8", "uint256", "int16", "bool", "address", "bytes1", "bytes32"] {
        let ns = make_namespace("ok", vec![keyed("T", ty)], BTreeMap::new());
        assert!(validate(&ns).is_ok(), "{ty} should be key-eligible");
    }
}

/// Strings, dynamic bytes and every array are rejected as keys.
#[test]
fn test_variable_width_keys_rejected() {
    for ty in ["string", "bytes", "uint8[]", "address[]", "bytes32[]", "string[]"] {
        let ns = make_namespace("bad", vec![keyed("T", ty)], BTreeMap::new());
        let violations = validate(&ns).unwrap_err();
        assert_eq!(violations.len(), 1, "{ty}");
        assert_eq!(violations[0].kind, ViolationKind::IneligibleKeyType, "{ty}");
    }
}

/// Catalog eligibility agrees with the validator.
#[test]
fn test_catalog_eligibility_matches_width() {
    for name in ["uint64", "int128", "bool", "address", "bytes20", "bytes", "string", "int8[]"] {
        let ty = CatalogType::resolve(name).unwrap();
        assert_eq!(ty.is_key_eligible(), !ty.is_variable_width(), "{name}");
    }
}

// =============================================================================
// Input Immutability Tests
// =============================================================================

/// Validation reads its input and leaves it untouched.
#[test]
fn test_validation_does_not_mutate() {
    let ns = broken_namespace();
    let snapshot = ns.clone();
    let _ = validate(&ns);
    assert_eq!(ns, snapshot);

    let good = make_namespace("good", vec![keyed("T", "bytes32")], BTreeMap::new());
    let snapshot = good.clone();
    let compiled = validate(&good).unwrap();
    assert_eq!(good, snapshot);
    assert_eq!(compiled.definition(), &snapshot);
}

/// makeTable keeps columns and key exactly as given.
#[test]
fn test_make_table_preserves_order() {
    let table = make_table(
        "Position",
        vec![Column::new("z", "int32"), Column::new("x", "int32"), Column::new("y", "int32")],
        vec!["y".to_string(), "x".to_string()],
        true,
        BTreeMap::new(),
    );
    let names: Vec<_> = table.columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["z", "x", "y"]);
    assert_eq!(table.key, vec!["y", "x"]);

    let ns = make_namespace("geo", vec![table], BTreeMap::new());
    let compiled = validate(&ns).unwrap();
    let key: Vec<_> = compiled.tables()[0].key_schema().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(key, vec!["y", "x"]);
}
