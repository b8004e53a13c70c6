//! Namespace validator
//!
//! Checks, per table in declaration order:
//! 1. Column names are unique
//! 2. Column types resolve against the catalog
//! 3. Key columns are declared columns
//! 4. Key columns have key-eligible types
//! 5. Key entries are unique (order is preserved verbatim)
//! 6. Table names, and their truncated resource ids, are unique within the namespace
//! 7. Singleton (empty-key) tables are legal, persisted or not
//! 8. Codegen hints are recognized by the namespace
//!
//! Validation is exhaustive and deterministic: every violation is reported,
//! in the order columns, key entries, table name, hints (sorted by name).
//! Inputs are never mutated.

use std::collections::{HashMap, HashSet};

use super::catalog::CatalogType;
use super::compiled::{CompiledNamespace, CompiledTable, ResolvedColumn, ResourceId};
use super::errors::SchemaViolation;
use super::model::{Namespace, Table};
use crate::observability::Event;

/// Result of validating one namespace.
pub type ValidationResult = Result<CompiledNamespace, Vec<SchemaViolation>>;

/// Validates a namespace, returning its normalized form or every violation found.
pub fn validate(namespace: &Namespace) -> ValidationResult {
    SchemaValidator::new(namespace).run()
}

/// Single-use walker that accumulates violations for one namespace.
struct SchemaValidator<'a> {
    namespace: &'a Namespace,
    violations: Vec<SchemaViolation>,
}

impl<'a> SchemaValidator<'a> {
    fn new(namespace: &'a Namespace) -> Self {
        Self {
            namespace,
            violations: Vec::new(),
        }
    }

    fn run(mut self) -> ValidationResult {
        let namespace = self.namespace;
        let mut seen_tables = HashSet::new();
        let mut seen_ids: HashMap<ResourceId, &str> = HashMap::new();
        let mut tables = Vec::with_capacity(namespace.tables.len());

        for table in &namespace.tables {
            let columns = self.check_columns(table);
            self.check_key(table, &columns);

            // Rule 6
            if !seen_tables.insert(table.name.as_str()) {
                self.violations
                    .push(SchemaViolation::duplicate_table(&namespace.name, &table.name));
            } else {
                let id = ResourceId::for_table(&namespace.name, &table.name, table.persisted);
                if let Some(existing) = seen_ids.insert(id, table.name.as_str()) {
                    self.violations.push(SchemaViolation::table_id_collision(
                        &namespace.name,
                        &table.name,
                        existing,
                    ));
                }
            }

            self.check_hints(table);

            if self.violations.is_empty() {
                let resolved = table
                    .columns
                    .iter()
                    .filter_map(|c| {
                        columns.get(c.name.as_str()).copied().flatten().map(|ty| ResolvedColumn {
                            name: c.name.clone(),
                            ty,
                        })
                    })
                    .collect();
                tables.push(CompiledTable::new(&namespace.name, table, resolved));
            }
        }

        tracing::debug!(
            event = Event::NamespaceValidated.as_str(),
            namespace = %namespace.name,
            tables = namespace.tables.len(),
            violations = self.violations.len(),
            "namespace validated"
        );

        if self.violations.is_empty() {
            Ok(CompiledNamespace::new(namespace, tables))
        } else {
            Err(self.violations)
        }
    }

    /// Rules 1 and 2. Returns each column's resolved type, keyed by name;
    /// a repeated name keeps its first declaration, an unresolvable type maps to `None`.
    fn check_columns<'t>(&mut self, table: &'t Table) -> HashMap<&'t str, Option<CatalogType>> {
        let mut types = HashMap::with_capacity(table.columns.len());

        for column in &table.columns {
            let repeated = types.contains_key(column.name.as_str());
            if repeated {
                self.violations.push(SchemaViolation::duplicate_column(
                    &self.namespace.name,
                    &table.name,
                    &column.name,
                ));
            }

            let resolved = match CatalogType::resolve(&column.type_name) {
                Ok(ty) => Some(ty),
                Err(_) => {
                    self.violations.push(SchemaViolation::unknown_type(
                        &self.namespace.name,
                        &table.name,
                        &column.name,
                        &column.type_name,
                    ));
                    None
                }
            };

            if !repeated {
                types.insert(column.name.as_str(), resolved);
            }
        }

        types
    }

    /// Rules 3, 4 and 5, walking the key in its declared order.
    fn check_key(&mut self, table: &Table, columns: &HashMap<&str, Option<CatalogType>>) {
        let mut seen = HashSet::with_capacity(table.key.len());

        for key in &table.key {
            if !seen.insert(key.as_str()) {
                self.violations.push(SchemaViolation::duplicate_key_column(
                    &self.namespace.name,
                    &table.name,
                    key,
                ));
                continue;
            }

            match columns.get(key.as_str()) {
                None => self.violations.push(SchemaViolation::invalid_key_column(
                    &self.namespace.name,
                    &table.name,
                    key,
                )),
                // Already reported as an unknown type
                Some(None) => {}
                Some(Some(ty)) if !ty.is_key_eligible() => {
                    self.violations.push(SchemaViolation::ineligible_key_type(
                        &self.namespace.name,
                        &table.name,
                        key,
                        &ty.type_name(),
                    ))
                }
                Some(Some(_)) => {}
            }
        }
    }

    /// Rule 8. Hints are stored sorted, so the walk is deterministic.
    fn check_hints(&mut self, table: &Table) {
        for hint in table.codegen.keys() {
            if !self.namespace.recognized_hints.contains(hint) {
                self.violations.push(SchemaViolation::unknown_codegen_hint(
                    &self.namespace.name,
                    &table.name,
                    hint,
                ));
            }
        }
    }
}
