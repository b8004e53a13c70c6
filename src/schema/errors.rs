//! Schema violation and registry error types
//!
//! Violation kinds:
//! - UnknownType
//! - DuplicateColumn
//! - DuplicateTable
//! - DuplicateNamespace
//! - InvalidKeyColumn
//! - IneligibleKeyType
//! - DuplicateKeyColumn
//! - UnknownCodegenHint
//!
//! Violations are data, not faults: a rejected namespace never aborts the build.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Tag identifying which rule a violation breaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViolationKind {
    /// Column type not found in the catalog
    UnknownType,
    /// Column name repeated within a table
    DuplicateColumn,
    /// Table name repeated within a namespace
    DuplicateTable,
    /// Namespace name already registered
    DuplicateNamespace,
    /// Key references a column that is not declared
    InvalidKeyColumn,
    /// Key column has a variable-width type
    IneligibleKeyType,
    /// Column name repeated within a key
    DuplicateKeyColumn,
    /// Codegen hint not recognized by the namespace
    UnknownCodegenHint,
}

impl ViolationKind {
    /// Returns the stable tag string
    pub fn code(&self) -> &'static str {
        match self {
            ViolationKind::UnknownType => "UnknownType",
            ViolationKind::DuplicateColumn => "DuplicateColumn",
            ViolationKind::DuplicateTable => "DuplicateTable",
            ViolationKind::DuplicateNamespace => "DuplicateNamespace",
            ViolationKind::InvalidKeyColumn => "InvalidKeyColumn",
            ViolationKind::IneligibleKeyType => "IneligibleKeyType",
            ViolationKind::DuplicateKeyColumn => "DuplicateKeyColumn",
            ViolationKind::UnknownCodegenHint => "UnknownCodegenHint",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// One broken rule, located as precisely as possible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaViolation {
    pub kind: ViolationKind,
    pub namespace: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    /// Column, key entry or hint name the violation refers to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
    pub message: String,
}

impl SchemaViolation {
    pub fn unknown_type(namespace: &str, table: &str, column: &str, type_name: &str) -> Self {
        Self::located(
            ViolationKind::UnknownType,
            namespace,
            table,
            column,
            format!("Column '{}' has unknown type '{}'", column, type_name),
        )
    }

    pub fn duplicate_column(namespace: &str, table: &str, column: &str) -> Self {
        Self::located(
            ViolationKind::DuplicateColumn,
            namespace,
            table,
            column,
            format!("Column '{}' is declared more than once", column),
        )
    }

    pub fn duplicate_table(namespace: &str, table: &str) -> Self {
        Self {
            kind: ViolationKind::DuplicateTable,
            namespace: namespace.to_string(),
            table: Some(table.to_string()),
            column: None,
            message: format!(
                "Table '{}' is declared more than once in namespace '{}'",
                table, namespace
            ),
        }
    }

    /// Two differently named tables whose resource ids coincide after truncation.
    pub fn table_id_collision(namespace: &str, table: &str, existing: &str) -> Self {
        Self {
            kind: ViolationKind::DuplicateTable,
            namespace: namespace.to_string(),
            table: Some(table.to_string()),
            column: None,
            message: format!(
                "Table '{}' has the same resource id as table '{}' in namespace '{}' (table names are truncated to {} bytes)",
                table,
                existing,
                namespace,
                super::compiled::NAME_ID_BYTES
            ),
        }
    }

    pub fn duplicate_namespace(namespace: &str) -> Self {
        Self {
            kind: ViolationKind::DuplicateNamespace,
            namespace: namespace.to_string(),
            table: None,
            column: None,
            message: format!("Namespace '{}' is already registered", namespace),
        }
    }

    /// A namespace whose truncated id matches an already registered namespace.
    pub fn namespace_id_collision(namespace: &str, existing: &str) -> Self {
        Self {
            kind: ViolationKind::DuplicateNamespace,
            namespace: namespace.to_string(),
            table: None,
            column: None,
            message: format!(
                "Namespace '{}' has the same resource id as registered namespace '{}' (namespaces are truncated to {} bytes)",
                namespace,
                existing,
                super::compiled::NAMESPACE_ID_BYTES
            ),
        }
    }

    pub fn invalid_key_column(namespace: &str, table: &str, column: &str) -> Self {
        Self::located(
            ViolationKind::InvalidKeyColumn,
            namespace,
            table,
            column,
            format!("Key column '{}' is not a declared column", column),
        )
    }

    pub fn ineligible_key_type(namespace: &str, table: &str, column: &str, type_name: &str) -> Self {
        Self::located(
            ViolationKind::IneligibleKeyType,
            namespace,
            table,
            column,
            format!(
                "Key column '{}' has variable-width type '{}'; keys require fixed-width types",
                column, type_name
            ),
        )
    }

    pub fn duplicate_key_column(namespace: &str, table: &str, column: &str) -> Self {
        Self::located(
            ViolationKind::DuplicateKeyColumn,
            namespace,
            table,
            column,
            format!("Key column '{}' appears more than once in the key", column),
        )
    }

    pub fn unknown_codegen_hint(namespace: &str, table: &str, hint: &str) -> Self {
        Self::located(
            ViolationKind::UnknownCodegenHint,
            namespace,
            table,
            hint,
            format!(
                "Codegen hint '{}' is not recognized by namespace '{}'",
                hint, namespace
            ),
        )
    }

    fn located(
        kind: ViolationKind,
        namespace: &str,
        table: &str,
        column: &str,
        message: String,
    ) -> Self {
        Self {
            kind,
            namespace: namespace.to_string(),
            table: Some(table.to_string()),
            column: Some(column.to_string()),
            message,
        }
    }

    /// Dotted location, e.g. `alpha.Item.id`
    pub fn location(&self) -> String {
        let mut path = self.namespace.clone();
        for part in [&self.table, &self.column].into_iter().flatten() {
            path.push('.');
            path.push_str(part);
        }
        path
    }
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.kind, self.location(), self.message)
    }
}

/// Errors returned by [`SchemaRegistry::register`](super::SchemaRegistry::register).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RegistryError {
    #[error("namespace '{namespace}' is already registered")]
    DuplicateNamespace { namespace: String },

    #[error("namespace '{namespace}' has the same resource id as registered namespace '{existing}'")]
    NamespaceIdCollision { namespace: String, existing: String },

    #[error("namespace '{namespace}' failed validation with {} violation(s)", .violations.len())]
    ValidationFailed {
        namespace: String,
        violations: Vec<SchemaViolation>,
    },
}

impl RegistryError {
    /// Name of the namespace that was rejected.
    pub fn namespace(&self) -> &str {
        match self {
            RegistryError::DuplicateNamespace { namespace }
            | RegistryError::NamespaceIdCollision { namespace, .. }
            | RegistryError::ValidationFailed { namespace, .. } => namespace,
        }
    }

    /// The rejection expressed as an ordered violation list.
    pub fn into_violations(self) -> Vec<SchemaViolation> {
        match self {
            RegistryError::DuplicateNamespace { namespace } => {
                vec![SchemaViolation::duplicate_namespace(&namespace)]
            }
            RegistryError::NamespaceIdCollision {
                namespace,
                existing,
            } => vec![SchemaViolation::namespace_id_collision(&namespace, &existing)],
            RegistryError::ValidationFailed { violations, .. } => violations,
        }
    }
}

/// Result type for registry operations
pub type RegistryResult<T> = Result<T, RegistryError>;
