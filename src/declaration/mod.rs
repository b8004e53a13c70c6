//! Raw namespace declarations
//!
//! Reads declaration files and lowers them into schema definitions.
//! Only structural problems are reported here; schema rules are checked
//! later by the validator.

mod errors;
mod loader;
mod raw;

pub use errors::{DeclarationError, DeclarationResult};
pub use loader::{load_file, DeclarationLoader, LoadReport};
pub use raw::{
    parse_declarations, LoweredNamespace, NamespaceDeclaration, OrderedEntries, TableBody,
    TableDeclaration, OFFCHAIN_TABLE_TYPE, TABLE_TYPE,
};
