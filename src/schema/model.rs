//! Table and namespace definitions
//!
//! Definitions are plain data. Constructors only assemble structure;
//! semantic checks (types, keys, duplicates, hints) belong to the validator,
//! so partially-correct definitions can be built and composed freely.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// Codegen hint names understood when a namespace does not declare its own.
pub const DEFAULT_CODEGEN_HINTS: [&str; 4] =
    ["outputDirectory", "tableIdArgument", "storeArgument", "dataStruct"];

/// A declared column. The type is kept as written and resolved during validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

impl Column {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }
}

/// A declared table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    /// Columns in declaration order
    pub columns: Vec<Column>,
    /// Primary key column names; order defines composite lookup order
    pub key: Vec<String>,
    /// `false` for offchain tables
    pub persisted: bool,
    /// Code generation directives, keyed by hint name
    #[serde(default)]
    pub codegen: BTreeMap<String, Value>,
}

impl Table {
    /// Returns the first column with the given name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// A table with an empty key holds at most one row.
    pub fn is_singleton(&self) -> bool {
        self.key.is_empty()
    }

    pub fn is_offchain(&self) -> bool {
        !self.persisted
    }
}

/// Builds a table definition without checking it.
pub fn make_table(
    name: impl Into<String>,
    columns: Vec<Column>,
    key: Vec<String>,
    persisted: bool,
    codegen: BTreeMap<String, Value>,
) -> Table {
    Table {
        name: name.into(),
        columns,
        key,
        persisted,
        codegen,
    }
}

/// A declared namespace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Namespace {
    pub name: String,
    /// Tables in declaration order; duplicates are representable
    pub tables: Vec<Table>,
    /// Opaque deployment options, passed through unvalidated
    #[serde(default)]
    pub deploy: BTreeMap<String, Value>,
    /// Codegen hint names this namespace understands
    pub recognized_hints: BTreeSet<String>,
}

impl Namespace {
    /// Replaces the set of recognized codegen hint names.
    pub fn with_recognized_hints<I, S>(mut self, hints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.recognized_hints = hints.into_iter().map(Into::into).collect();
        self
    }

    /// Returns the first table with the given name.
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }
}

/// Builds a namespace definition without checking it.
///
/// The namespace recognizes [`DEFAULT_CODEGEN_HINTS`] until told otherwise.
pub fn make_namespace(
    name: impl Into<String>,
    tables: Vec<Table>,
    deploy: BTreeMap<String, Value>,
) -> Namespace {
    Namespace {
        name: name.into(),
        tables,
        deploy,
        recognized_hints: DEFAULT_CODEGEN_HINTS.iter().map(|h| h.to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn metadata_table() -> Table {
        make_table(
            "Metadata",
            vec![
                Column::new("objectTypeId", "uint8"),
                Column::new("chipAddress", "address"),
            ],
            vec!["objectTypeId".to_string()],
            true,
            BTreeMap::new(),
        )
    }

    #[test]
    fn test_make_table_keeps_order() {
        let table = metadata_table();
        assert_eq!(table.columns[0].name, "objectTypeId");
        assert_eq!(table.columns[1].name, "chipAddress");
        assert_eq!(table.key, vec!["objectTypeId"]);
        assert!(!table.is_singleton());
        assert!(!table.is_offchain());
    }

    #[test]
    fn test_make_table_is_structural_only() {
        // Nothing here is checked at construction time
        let table = make_table(
            "Broken",
            vec![Column::new("a", "nope"), Column::new("a", "string")],
            vec!["missing".to_string(), "missing".to_string()],
            false,
            BTreeMap::new(),
        );
        assert_eq!(table.columns.len(), 2);
        assert_eq!(table.column("a").unwrap().type_name, "nope");
        assert!(table.is_offchain());
    }

    #[test]
    fn test_make_namespace_defaults() {
        let mut deploy = BTreeMap::new();
        deploy.insert("upgradeableWorldImplementation".to_string(), json!(true));

        let ns = make_namespace("bazaar", vec![metadata_table()], deploy);
        assert_eq!(ns.name, "bazaar");
        assert!(ns.table("Metadata").is_some());
        assert!(ns.table("Exchange").is_none());
        assert_eq!(ns.deploy["upgradeableWorldImplementation"], json!(true));
        assert!(ns.recognized_hints.contains("dataStruct"));
        assert_eq!(ns.recognized_hints.len(), DEFAULT_CODEGEN_HINTS.len());
    }

    #[test]
    fn test_with_recognized_hints() {
        let ns = make_namespace("alpha", vec![], BTreeMap::new()).with_recognized_hints(["custom"]);
        assert_eq!(ns.recognized_hints.len(), 1);
        assert!(ns.recognized_hints.contains("custom"));
    }
}
