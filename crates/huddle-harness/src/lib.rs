//! Deterministic simulation harness for the Huddle notification runtime.
//!
//! Tokio-clock implementations of the Environment and Driver traits for
//! deterministic, reproducible testing of notification timing: auto-hide
//! deadlines, debounced join/leave batches and hide-time device effects.
//!
//! # Scenarios
//!
//! The `scenario` module builds scripted sessions by hand, from fuzzer-chosen
//! operations, or from a seed. The same seed always yields the same session,
//! and on a paused clock the same timeline.
//!
//! # Invariant Testing
//!
//! The `invariants` module provides behavioral testing through invariant
//! checks. Invariants verify WHAT must be true across all execution paths, not
//! specific scenarios. Use [`InvariantRegistry::standard()`] for the
//! notification invariants.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod invariants;
pub mod scenario;
pub mod sim_driver;
pub mod sim_env;

pub use invariants::{
    ConferenceConsistency, Invariant, InvariantRegistry, InvariantResult, NotificationEntry,
    NotificationSnapshot, UniqueUids, Violation, VisibleContent,
};
pub use scenario::{Scenario, ScenarioOp, ScriptStep};
pub use sim_driver::{Effect, Recorded, SimDriver, SimDriverError};
pub use sim_env::SimEnv;
