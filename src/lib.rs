//! worldschema - A deterministic table schema compiler
//!
//! Turns namespace declarations (tables with typed columns, composite keys
//! and codegen hints) into a validated, normalized schema registry for
//! downstream code generation.

pub mod cli;
pub mod compiler;
pub mod config;
pub mod declaration;
pub mod observability;
pub mod schema;
