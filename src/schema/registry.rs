//! Schema registry for one build pass
//!
//! - Initialized empty, filled by successive registrations
//! - A namespace is validated before it is stored; nothing enters unvalidated
//! - Namespace names are unique, and so are their truncated resource ids;
//!   table names may repeat across namespaces
//! - Writes need `&mut self`, so there is a single writer; reads share `&self`

use std::collections::HashMap;

use super::compiled::{CompiledNamespace, ResourceId, NAMESPACE_ID_BYTES};
use super::errors::{RegistryError, RegistryResult};
use super::model::Namespace;
use super::validator::validate;
use crate::observability::Event;

/// Registry of compiled namespaces, in registration order.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    namespaces: Vec<CompiledNamespace>,
    /// Namespace name -> position in `namespaces`
    index: HashMap<String, usize>,
    /// Namespace slot of the resource id -> position in `namespaces`
    ids: HashMap<[u8; NAMESPACE_ID_BYTES], usize>,
}

impl SchemaRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and stores a namespace.
    ///
    /// The duplicate-name check runs first, so a second namespace with a taken
    /// name is rejected regardless of its content.
    pub fn register(&mut self, namespace: Namespace) -> RegistryResult<()> {
        self.ensure_vacant(&namespace.name)?;

        match validate(&namespace) {
            Ok(compiled) => self.insert(compiled),
            Err(violations) => {
                tracing::warn!(
                    event = Event::NamespaceRejected.as_str(),
                    namespace = %namespace.name,
                    violations = violations.len(),
                    "namespace failed validation"
                );
                Err(RegistryError::ValidationFailed {
                    namespace: namespace.name,
                    violations,
                })
            }
        }
    }

    /// Stores a namespace that has already been through [`validate`].
    pub fn register_compiled(&mut self, compiled: CompiledNamespace) -> RegistryResult<()> {
        self.ensure_vacant(compiled.name())?;
        self.insert(compiled)
    }

    /// Fails if `name`, or a name with the same truncated resource id, is taken.
    pub fn ensure_vacant(&self, name: &str) -> RegistryResult<()> {
        if self.index.contains_key(name) {
            tracing::warn!(
                event = Event::NamespaceRejected.as_str(),
                namespace = %name,
                "namespace already registered"
            );
            return Err(RegistryError::DuplicateNamespace {
                namespace: name.to_string(),
            });
        }

        if let Some(&i) = self.ids.get(&ResourceId::namespace_id(name)) {
            let existing = self.namespaces[i].name();
            tracing::warn!(
                event = Event::NamespaceRejected.as_str(),
                namespace = %name,
                existing = %existing,
                "namespace resource id already registered"
            );
            return Err(RegistryError::NamespaceIdCollision {
                namespace: name.to_string(),
                existing: existing.to_string(),
            });
        }
        Ok(())
    }

    fn insert(&mut self, compiled: CompiledNamespace) -> RegistryResult<()> {
        tracing::info!(
            event = Event::NamespaceRegistered.as_str(),
            namespace = %compiled.name(),
            tables = compiled.tables().len(),
            "namespace registered"
        );
        let position = self.namespaces.len();
        self.index.insert(compiled.name().to_string(), position);
        self.ids
            .insert(ResourceId::namespace_id(compiled.name()), position);
        self.namespaces.push(compiled);
        Ok(())
    }

    /// Gets a namespace by name.
    pub fn lookup(&self, name: &str) -> Option<&CompiledNamespace> {
        self.index.get(name).map(|&i| &self.namespaces[i])
    }

    /// Checks if a namespace is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Returns all namespaces in registration order.
    ///
    /// Each call starts a fresh traversal.
    pub fn all_namespaces(&self) -> impl Iterator<Item = &CompiledNamespace> + '_ {
        self.namespaces.iter()
    }

    /// Returns the number of registered namespaces.
    pub fn len(&self) -> usize {
        self.namespaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.namespaces.is_empty()
    }
}
