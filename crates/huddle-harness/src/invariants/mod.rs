//! Invariant checking for deterministic simulation testing.
//!
//! Invariants are properties that must always hold during system execution.
//! Unlike example-based tests that check specific scenarios, invariants
//! verify behavioral properties across all possible execution paths.
//!
//! # Architecture
//!
//! The invariant system extracts observable state from the App into a
//! [`NotificationSnapshot`] at every render, then runs registered
//! [`Invariant`] checks against it. The simulation driver turns violations
//! into render errors, which stop the runtime.
//!
//! # Usage
//!
//! ```ignore
//! let registry = InvariantRegistry::standard();
//! let snapshot = NotificationSnapshot::from_app(&app);
//! registry.check_all(&snapshot)?;
//! ```

mod checks;
mod snapshot;

pub use checks::{ConferenceConsistency, UniqueUids, VisibleContent};
pub use snapshot::{NotificationEntry, NotificationSnapshot};
use thiserror::Error;

/// Invariant check result.
pub type InvariantResult = Result<(), Violation>;

/// Invariant violation with context.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{invariant}: {message}")]
pub struct Violation {
    /// Name of the violated invariant.
    pub invariant: &'static str,
    /// Description of what went wrong.
    pub message: String,
}

/// An invariant that can be checked against rendered state.
///
/// Invariants are behavioral properties that must always hold.
/// They capture WHAT must be true, not specific test scenarios.
pub trait Invariant: Send + Sync {
    /// Invariant name for error reporting.
    fn name(&self) -> &'static str;

    /// Check the invariant against the current state.
    ///
    /// Returns `Ok(())` if the invariant holds, or a [`Violation`]
    /// describing what went wrong.
    fn check(&self, state: &NotificationSnapshot) -> InvariantResult;
}

/// Registry of invariants to check.
///
/// Collects multiple invariants and runs them all against rendered state.
/// Use [`InvariantRegistry::standard()`] for the notification invariants.
pub struct InvariantRegistry {
    invariants: Vec<Box<dyn Invariant>>,
}

impl Default for InvariantRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl InvariantRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self { invariants: Vec::new() }
    }

    /// Create a registry with the standard notification invariants.
    ///
    /// Includes:
    /// - [`UniqueUids`]: no two visible notifications share a uid
    /// - [`ConferenceConsistency`]: nothing outlives its conference
    /// - [`VisibleContent`]: every visible notification has something to show
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.add(UniqueUids);
        registry.add(ConferenceConsistency);
        registry.add(VisibleContent);
        registry
    }

    /// Add an invariant to the registry.
    pub fn add<I: Invariant + 'static>(&mut self, invariant: I) {
        self.invariants.push(Box::new(invariant));
    }

    /// Check all invariants against the given state.
    ///
    /// Returns `Ok(())` if all invariants hold, or all violations found.
    pub fn check_all(&self, state: &NotificationSnapshot) -> Result<(), Vec<Violation>> {
        let violations: Vec<_> =
            self.invariants.iter().filter_map(|inv| inv.check(state).err()).collect();

        if violations.is_empty() { Ok(()) } else { Err(violations) }
    }

    /// Number of registered invariants.
    pub fn len(&self) -> usize {
        self.invariants.len()
    }

    /// Check if registry is empty.
    pub fn is_empty(&self) -> bool {
        self.invariants.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use huddle_core::TimeoutClass;

    use super::*;

    fn entry(uid: &str, conference: Option<u64>) -> NotificationEntry {
        NotificationEntry {
            uid: uid.into(),
            title: Some("t".into()),
            description: None,
            timeout: TimeoutClass::Long,
            conference,
        }
    }

    #[test]
    fn standard_registry_has_invariants() {
        let registry = InvariantRegistry::standard();
        assert!(!registry.is_empty());
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn empty_snapshot_passes_invariants() {
        let registry = InvariantRegistry::standard();
        let snapshot = NotificationSnapshot::default();
        assert!(registry.check_all(&snapshot).is_ok());
    }

    #[test]
    fn collects_every_violation() {
        let registry = InvariantRegistry::standard();
        let snapshot = NotificationSnapshot {
            conference: Some(2),
            notifications: vec![entry("a", Some(1)), entry("a", None)],
            ..NotificationSnapshot::default()
        };

        let violations = registry.check_all(&snapshot).unwrap_err();
        let names: Vec<_> = violations.iter().map(|v| v.invariant).collect();
        assert_eq!(names, ["UniqueUids", "ConferenceConsistency"]);
    }

    #[test]
    fn violation_display() {
        let violation = Violation { invariant: "UniqueUids", message: "uid a twice".into() };
        assert_eq!(violation.to_string(), "UniqueUids: uid a twice");
    }
}
