//! Build pass driver
//!
//! ```text
//! declarations → lower → validate (parallel) → register (serial) → BuildReport
//! ```
//!
//! Namespaces are independent, so validation fans out across scoped worker
//! threads. Registration is funneled through the single owner of the
//! registry, in input order, so the outcome does not depend on scheduling.
//! A bad namespace is reported and the pass moves on; nothing stops at the
//! first error.

use std::collections::BTreeSet;
use std::thread;

use crate::declaration::{DeclarationError, LoadReport, LoweredNamespace, NamespaceDeclaration};
use crate::observability::Event;
use crate::schema::{
    validate, Namespace, RegistryError, SchemaRegistry, SchemaViolation, ValidationResult,
};

/// Tuning for a build pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    pub parallel_validation: bool,
    /// Upper bound on validation worker threads
    pub max_parallelism: usize,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            parallel_validation: true,
            max_parallelism: 4,
        }
    }
}

/// A namespace that did not make it into the registry.
#[derive(Debug, Clone, PartialEq)]
pub struct NamespaceFailure {
    pub namespace: String,
    /// Non-empty, in discovery order
    pub violations: Vec<SchemaViolation>,
}

/// Outcome of one build pass.
#[derive(Debug, Default)]
pub struct BuildReport {
    /// Every namespace that validated and registered
    pub registry: SchemaRegistry,
    /// Namespaces with schema violations, in input order
    pub failures: Vec<NamespaceFailure>,
    /// Files that could not be read and tables that could not be lowered
    pub declaration_errors: Vec<DeclarationError>,
}

impl BuildReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty() && self.declaration_errors.is_empty()
    }

    /// All violations across all rejected namespaces.
    pub fn violations(&self) -> impl Iterator<Item = &SchemaViolation> + '_ {
        self.failures.iter().flat_map(|f| f.violations.iter())
    }

    pub fn failed_namespaces(&self) -> impl Iterator<Item = &str> + '_ {
        self.failures.iter().map(|f| f.namespace.as_str())
    }

    /// The event that closes the pass.
    pub fn outcome(&self) -> Event {
        if self.is_success() {
            Event::BuildComplete
        } else {
            Event::BuildFailed
        }
    }
}

/// One compilation pass. Dropping it mid-way discards everything.
pub struct BuildPass {
    options: BuildOptions,
}

impl BuildPass {
    pub fn new(options: BuildOptions) -> Self {
        Self { options }
    }

    /// Runs the pass over everything a [`DeclarationLoader`](crate::declaration::DeclarationLoader)
    /// produced; its load errors are reported with the build's own.
    pub fn run_loaded(&self, loaded: LoadReport, default_hints: &BTreeSet<String>) -> BuildReport {
        let lowered = loaded
            .declarations
            .into_iter()
            .map(|declaration| declaration.lower(default_hints))
            .collect();
        self.run_lowered(lowered, loaded.errors)
    }

    /// Lowers raw declarations, then runs the pass.
    ///
    /// A namespace with tables that failed to lower is never registered, but
    /// the tables that did lower are still validated and their violations reported.
    pub fn run_declarations(
        &self,
        declarations: Vec<NamespaceDeclaration>,
        default_hints: &BTreeSet<String>,
    ) -> BuildReport {
        self.run_loaded(
            LoadReport {
                declarations,
                errors: Vec::new(),
            },
            default_hints,
        )
    }

    /// Validates and registers every namespace.
    pub fn run(&self, namespaces: Vec<Namespace>) -> BuildReport {
        let lowered = namespaces
            .into_iter()
            .map(|namespace| LoweredNamespace {
                namespace,
                errors: Vec::new(),
            })
            .collect();
        self.run_lowered(lowered, Vec::new())
    }

    fn run_lowered(
        &self,
        lowered: Vec<LoweredNamespace>,
        mut declaration_errors: Vec<DeclarationError>,
    ) -> BuildReport {
        tracing::info!(
            event = Event::BuildStart.as_str(),
            namespaces = lowered.len(),
            parallel = self.options.parallel_validation,
            "build started"
        );

        let results = {
            let namespaces: Vec<&Namespace> = lowered.iter().map(|l| &l.namespace).collect();
            self.validate_all(&namespaces)
        };

        let mut registry = SchemaRegistry::new();
        let mut failures = Vec::new();

        for (LoweredNamespace { namespace, errors }, result) in lowered.into_iter().zip(results) {
            if !errors.is_empty() {
                tracing::warn!(
                    event = Event::NamespaceRejected.as_str(),
                    namespace = %namespace.name,
                    malformed_tables = errors.len(),
                    "namespace has tables that could not be lowered"
                );
                if let Err(violations) = result {
                    failures.push(NamespaceFailure {
                        namespace: namespace.name,
                        violations,
                    });
                }
                declaration_errors.extend(errors);
                continue;
            }

            // Name uniqueness is checked before validity, as in `SchemaRegistry::register`
            let outcome = registry.ensure_vacant(&namespace.name).and_then(|()| match result {
                Ok(compiled) => registry.register_compiled(compiled),
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
            });

            if let Err(e) = outcome {
                failures.push(NamespaceFailure {
                    namespace: e.namespace().to_string(),
                    violations: e.into_violations(),
                });
            }
        }

        let report = BuildReport {
            registry,
            failures,
            declaration_errors,
        };

        match report.outcome() {
            Event::BuildComplete => tracing::info!(
                event = Event::BuildComplete.as_str(),
                namespaces = report.registry.len(),
                "build complete"
            ),
            event => tracing::warn!(
                event = event.as_str(),
                registered = report.registry.len(),
                rejected = report.failures.len(),
                declaration_errors = report.declaration_errors.len(),
                "build finished with errors"
            ),
        }
        report
    }

    /// Validates each namespace; results line up with the input.
    fn validate_all(&self, namespaces: &[&Namespace]) -> Vec<ValidationResult> {
        if !self.options.parallel_validation || namespaces.len() < 2 {
            return namespaces.iter().map(|ns| validate(ns)).collect();
        }

        let workers = self.options.max_parallelism.clamp(1, namespaces.len());
        let chunk_size = namespaces.len().div_ceil(workers);

        thread::scope(|scope| {
            let handles: Vec<_> = namespaces
                .chunks(chunk_size)
                .map(|chunk| {
                    scope.spawn(move || chunk.iter().map(|ns| validate(ns)).collect::<Vec<_>>())
                })
                .collect();

            handles
                .into_iter()
                .flat_map(|handle| match handle.join() {
                    Ok(results) => results,
                    Err(panic) => std::panic::resume_unwind(panic),
                })
                .collect()
        })
    }
}

impl Default for BuildPass {
    fn default() -> Self {
        Self::new(BuildOptions::default())
    }
}
