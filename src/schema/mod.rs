//! Table schema compiler
//!
//! Pipeline:
//!
//! ```text
//! Namespace (definition) → validate → CompiledNamespace → SchemaRegistry
//! ```
//!
//! # Design Principles
//!
//! - Closed, static type catalog
//! - Definitions are structural; all semantic checks live in the validator
//! - Validation is exhaustive and deterministic
//! - Compiled namespaces are frozen
//! - Nothing enters the registry unvalidated

pub mod catalog;
mod compiled;
mod errors;
mod model;
mod registry;
mod validator;

pub use catalog::{CatalogType, ScalarKind, UnknownType};
pub use compiled::{CompiledNamespace, CompiledTable, ResolvedColumn, ResourceId, TableLayout};
pub use errors::{RegistryError, RegistryResult, SchemaViolation, ViolationKind};
pub use model::{make_namespace, make_table, Column, Namespace, Table, DEFAULT_CODEGEN_HINTS};
pub use registry::SchemaRegistry;
pub use validator::{validate, ValidationResult};
