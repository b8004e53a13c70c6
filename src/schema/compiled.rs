//! Normalized, frozen schema produced by a successful validation
//!
//! Compiled values have no mutators. They are what the registry stores and
//! what downstream code generation consumes.

use serde::{Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

use super::catalog::CatalogType;
use super::model::{Namespace, Table};

/// Bytes reserved for the namespace inside a resource id.
pub const NAMESPACE_ID_BYTES: usize = 14;

/// Bytes reserved for the table name inside a resource id.
pub const NAME_ID_BYTES: usize = 16;

/// Resource type prefix for persisted tables.
pub const TABLE_PREFIX: &[u8; 2] = b"tb";

/// Resource type prefix for offchain tables.
pub const OFFCHAIN_TABLE_PREFIX: &[u8; 2] = b"ot";

/// 32-byte table identifier: type prefix, namespace, table name.
///
/// Names longer than their slot are truncated, shorter ones are zero-padded.
/// Distinct names can therefore share an id; the validator and the registry
/// reject those collisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResourceId([u8; 32]);

impl ResourceId {
    pub fn for_table(namespace: &str, table: &str, persisted: bool) -> Self {
        const NAME_START: usize = 2 + NAMESPACE_ID_BYTES;

        let mut bytes = [0u8; 32];
        let prefix = if persisted { TABLE_PREFIX } else { OFFCHAIN_TABLE_PREFIX };
        bytes[..2].copy_from_slice(prefix);
        bytes[2..NAME_START].copy_from_slice(&Self::namespace_id(namespace));
        copy_truncated(&mut bytes[NAME_START..NAME_START + NAME_ID_BYTES], table.as_bytes());
        Self(bytes)
    }

    /// The namespace slot of every id in `namespace`.
    pub fn namespace_id(namespace: &str) -> [u8; NAMESPACE_ID_BYTES] {
        let mut slot = [0u8; NAMESPACE_ID_BYTES];
        copy_truncated(&mut slot, namespace.as_bytes());
        slot
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// `0x`-prefixed lowercase hex
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for ResourceId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

fn copy_truncated(slot: &mut [u8], source: &[u8]) {
    let len = source.len().min(slot.len());
    slot[..len].copy_from_slice(&source[..len]);
}

/// A column whose type has been resolved against the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedColumn {
    pub name: String,
    #[serde(rename = "type", serialize_with = "serialize_type_name")]
    pub ty: CatalogType,
}

fn serialize_type_name<S: Serializer>(ty: &CatalogType, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&ty.type_name())
}

/// Byte layout of a table's value schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TableLayout {
    /// Sum of the widths of all fixed-width value fields
    pub static_byte_length: usize,
    pub static_fields: usize,
    pub dynamic_fields: usize,
}

impl TableLayout {
    fn of(value_schema: &[ResolvedColumn]) -> Self {
        value_schema.iter().fold(Self::default(), |mut layout, column| {
            match column.ty.static_byte_length() {
                Some(len) => {
                    layout.static_byte_length += len;
                    layout.static_fields += 1;
                }
                None => layout.dynamic_fields += 1,
            }
            layout
        })
    }
}

/// A validated table in normalized form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledTable {
    name: String,
    resource_id: ResourceId,
    persisted: bool,
    columns: Vec<ResolvedColumn>,
    key_schema: Vec<ResolvedColumn>,
    value_schema: Vec<ResolvedColumn>,
    layout: TableLayout,
    codegen: BTreeMap<String, Value>,
}

impl CompiledTable {
    /// Normalizes a table whose columns have already been resolved.
    ///
    /// `columns` must be in declaration order, unique, and contain every key column.
    pub(crate) fn new(namespace: &str, table: &Table, columns: Vec<ResolvedColumn>) -> Self {
        let key_schema: Vec<ResolvedColumn> = table
            .key
            .iter()
            .filter_map(|key| columns.iter().find(|c| &c.name == key).cloned())
            .collect();

        let (static_values, dynamic_values): (Vec<_>, Vec<_>) = columns
            .iter()
            .filter(|c| !table.key.contains(&c.name))
            .cloned()
            .partition(|c| !c.ty.is_variable_width());
        let value_schema: Vec<ResolvedColumn> =
            static_values.into_iter().chain(dynamic_values).collect();

        Self {
            name: table.name.clone(),
            resource_id: ResourceId::for_table(namespace, &table.name, table.persisted),
            persisted: table.persisted,
            layout: TableLayout::of(&value_schema),
            columns,
            key_schema,
            value_schema,
            codegen: table.codegen.clone(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn resource_id(&self) -> ResourceId {
        self.resource_id
    }

    pub fn persisted(&self) -> bool {
        self.persisted
    }

    /// All columns in declaration order.
    pub fn columns(&self) -> &[ResolvedColumn] {
        &self.columns
    }

    /// Key columns in key order.
    pub fn key_schema(&self) -> &[ResolvedColumn] {
        &self.key_schema
    }

    /// Non-key columns, fixed-width first, each group in declaration order.
    pub fn value_schema(&self) -> &[ResolvedColumn] {
        &self.value_schema
    }

    pub fn layout(&self) -> TableLayout {
        self.layout
    }

    pub fn codegen(&self) -> &BTreeMap<String, Value> {
        &self.codegen
    }

    pub fn is_singleton(&self) -> bool {
        self.key_schema.is_empty()
    }
}

/// A validated namespace, frozen for the rest of the build.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledNamespace {
    name: String,
    deploy: BTreeMap<String, Value>,
    tables: Vec<CompiledTable>,
    #[serde(skip_serializing)]
    definition: Namespace,
}

impl CompiledNamespace {
    pub(crate) fn new(definition: &Namespace, tables: Vec<CompiledTable>) -> Self {
        Self {
            name: definition.name.clone(),
            deploy: definition.deploy.clone(),
            tables,
            definition: definition.clone(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Deployment options, passed through untouched.
    pub fn deploy(&self) -> &BTreeMap<String, Value> {
        &self.deploy
    }

    /// Tables in declaration order.
    pub fn tables(&self) -> &[CompiledTable] {
        &self.tables
    }

    pub fn table(&self, name: &str) -> Option<&CompiledTable> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// The definition this namespace was compiled from.
    pub fn definition(&self) -> &Namespace {
        &self.definition
    }
}
