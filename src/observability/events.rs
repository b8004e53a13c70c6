//! Observable events for a build pass
//!
//! Every log line carries one of these as its `event` field.

use std::fmt;

/// Observable events in a build pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Configuration loaded
    ConfigLoaded,
    /// Declaration files read and parsed
    DeclarationsLoaded,

    // Build pass
    /// Build pass begins
    BuildStart,
    /// Validation of one namespace finished
    NamespaceValidated,
    /// Namespace rejected (violations or duplicate name)
    NamespaceRejected,
    /// Namespace stored in the registry
    NamespaceRegistered,
    /// Build pass finished with every namespace registered
    BuildComplete,
    /// Build pass finished with at least one rejected namespace
    BuildFailed,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::DeclarationsLoaded => "DECLARATIONS_LOADED",
            Event::BuildStart => "BUILD_START",
            Event::NamespaceValidated => "NAMESPACE_VALIDATED",
            Event::NamespaceRejected => "NAMESPACE_REJECTED",
            Event::NamespaceRegistered => "NAMESPACE_REGISTERED",
            Event::BuildComplete => "BUILD_COMPLETE",
            Event::BuildFailed => "BUILD_FAILED",
        }
    }

    /// Returns true if this event reports rejected input
    pub fn is_failure(&self) -> bool {
        matches!(self, Event::NamespaceRejected | Event::BuildFailed)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names() {
        assert_eq!(Event::BuildStart.as_str(), "BUILD_START");
        assert_eq!(Event::NamespaceRegistered.to_string(), "NAMESPACE_REGISTERED");
    }

    #[test]
    fn test_failure_events() {
        assert!(Event::NamespaceRejected.is_failure());
        assert!(Event::BuildFailed.is_failure());
        assert!(!Event::BuildComplete.is_failure());
        assert!(!Event::ConfigLoaded.is_failure());
    }
}
