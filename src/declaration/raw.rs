//! Raw declaration shapes as they appear in declaration files
//!
//! ```json
//! {
//!   "namespace": "bazaar",
//!   "deploy": { "upgradeableWorldImplementation": true },
//!   "tables": {
//!     "Metadata": {
//!       "schema": { "objectTypeId": "uint8", "chipAddress": "address" },
//!       "key": ["objectTypeId"]
//!     },
//!     "Counter": "uint32"
//!   }
//! }
//! ```
//!
//! Object keys keep their order and duplicates, so a table or column declared
//! twice reaches the validator instead of being silently overwritten.

use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::marker::PhantomData;

use super::errors::{DeclarationError, DeclarationResult};
use crate::schema::{make_namespace, make_table, Column, Namespace, Table};

/// `type` value for persisted tables.
pub const TABLE_TYPE: &str = "table";

/// `type` value for offchain tables.
pub const OFFCHAIN_TABLE_TYPE: &str = "offchainTable";

/// Key column of an expanded shorthand table.
pub const SHORTHAND_KEY_COLUMN: &str = "id";

/// Key type of an expanded shorthand table.
pub const SHORTHAND_KEY_TYPE: &str = "bytes32";

/// Value column of an expanded shorthand table.
pub const SHORTHAND_VALUE_COLUMN: &str = "value";

/// JSON object entries in document order, duplicates included.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedEntries<V>(pub Vec<(String, V)>);

impl<V> Default for OrderedEntries<V> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for OrderedEntries<V> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct EntriesVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for EntriesVisitor<V> {
            type Value = OrderedEntries<V>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a JSON object")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, value)) = map.next_entry::<String, V>()? {
                    entries.push((key, value));
                }
                Ok(OrderedEntries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor(PhantomData))
    }
}

/// One namespace as declared.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct NamespaceDeclaration {
    pub namespace: String,
    #[serde(default)]
    pub tables: OrderedEntries<TableDeclaration>,
    /// Opaque, passed through to the deployer
    #[serde(default)]
    pub deploy: BTreeMap<String, Value>,
    /// Codegen hint names this namespace understands; the build default applies when absent
    #[serde(default)]
    pub codegen_hints: Option<Vec<String>>,
}

/// A table declared either in full or as a bare value type.
#[derive(Debug, Clone, PartialEq)]
pub enum TableDeclaration {
    /// `"Counter": "uint32"`
    Shorthand(String),
    Full(TableBody),
}

impl<'de> Deserialize<'de> for TableDeclaration {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct TableVisitor;

        impl<'de> Visitor<'de> for TableVisitor {
            type Value = TableDeclaration;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a table object or a type name")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
                Ok(TableDeclaration::Shorthand(value.to_string()))
            }

            fn visit_map<A>(self, map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                TableBody::deserialize(de::value::MapAccessDeserializer::new(map))
                    .map(TableDeclaration::Full)
            }
        }

        deserializer.deserialize_any(TableVisitor)
    }
}

/// Full table declaration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableBody {
    pub schema: OrderedEntries<String>,
    pub key: Vec<String>,
    /// `"table"` (default) or `"offchainTable"`
    #[serde(default, rename = "type")]
    pub table_type: Option<String>,
    #[serde(default)]
    pub codegen: BTreeMap<String, Value>,
}

impl TableDeclaration {
    /// Lowers into a table definition.
    pub fn into_table(self, namespace: &str, name: String) -> DeclarationResult<Table> {
        match self {
            TableDeclaration::Shorthand(value_type) => Ok(make_table(
                name,
                vec![
                    Column::new(SHORTHAND_KEY_COLUMN, SHORTHAND_KEY_TYPE),
                    Column::new(SHORTHAND_VALUE_COLUMN, value_type),
                ],
                vec![SHORTHAND_KEY_COLUMN.to_string()],
                true,
                BTreeMap::new(),
            )),
            TableDeclaration::Full(body) => {
                let persisted = match body.table_type.as_deref() {
                    None | Some(TABLE_TYPE) => true,
                    Some(OFFCHAIN_TABLE_TYPE) => false,
                    Some(other) => {
                        return Err(DeclarationError::UnknownTableType {
                            namespace: namespace.to_string(),
                            table: name,
                            table_type: other.to_string(),
                        })
                    }
                };
                let columns = body
                    .schema
                    .0
                    .into_iter()
                    .map(|(column, type_name)| Column::new(column, type_name))
                    .collect();
                Ok(make_table(name, columns, body.key, persisted, body.codegen))
            }
        }
    }
}

/// A namespace lowered as far as its declaration allows.
#[derive(Debug)]
pub struct LoweredNamespace {
    /// Every table that lowered cleanly, in declaration order
    pub namespace: Namespace,
    /// One entry per table that could not be lowered
    pub errors: Vec<DeclarationError>,
}

impl LoweredNamespace {
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }
}

impl NamespaceDeclaration {
    /// Lowers every table, keeping the ones that lowered and collecting
    /// an error for each one that did not.
    ///
    /// `default_hints` applies when the declaration does not list its own.
    pub fn lower(self, default_hints: &BTreeSet<String>) -> LoweredNamespace {
        let name = self.namespace;
        let mut tables = Vec::with_capacity(self.tables.0.len());
        let mut errors = Vec::new();

        for (table, decl) in self.tables.0 {
            match decl.into_table(&name, table) {
                Ok(table) => tables.push(table),
                Err(e) => errors.push(e),
            }
        }

        let namespace = make_namespace(name, tables, self.deploy);
        let namespace = match self.codegen_hints {
            Some(hints) => namespace.with_recognized_hints(hints),
            None => namespace.with_recognized_hints(default_hints.iter().cloned()),
        };
        LoweredNamespace { namespace, errors }
    }

    /// Lowers into a namespace definition, or every lowering error.
    pub fn into_namespace(
        self,
        default_hints: &BTreeSet<String>,
    ) -> Result<Namespace, Vec<DeclarationError>> {
        let lowered = self.lower(default_hints);
        if lowered.is_complete() {
            Ok(lowered.namespace)
        } else {
            Err(lowered.errors)
        }
    }
}

/// Parses a document holding one namespace object or an array of them.
pub fn parse_declarations(source: &str) -> serde_json::Result<Vec<NamespaceDeclaration>> {
    if source.trim_start().starts_with('[') {
        serde_json::from_str(source)
    } else {
        serde_json::from_str(source).map(|one| vec![one])
    }
}
