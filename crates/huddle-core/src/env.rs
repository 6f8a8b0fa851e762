//! Environment abstraction for deterministic testing.
//!
//! Decouples notification logic from system resources (monotonic time, wall
//! clock). Enables deterministic simulation with a paused virtual clock and
//! production use with real system time.

use std::{
    future::Future,
    ops::{Add, Sub},
    time::Duration,
};

/// Abstract environment providing time and async sleeping.
///
/// Implementations MUST guarantee that `now()` never goes backwards.
pub trait Environment: Clone + Send + Sync + 'static {
    /// The specific instant type used by this environment.
    ///
    /// Production environments use `std::time::Instant`, while simulation
    /// environments use virtual time (e.g., `tokio::time::Instant` with a
    /// paused clock).
    type Instant: Copy
        + Ord
        + Send
        + Sync
        + std::fmt::Debug
        + Sub<Output = Duration>
        + Add<Duration, Output = Self::Instant>;

    /// Current time (monotonic).
    ///
    /// # Invariants
    ///
    /// - Subsequent calls must return times >= previous calls.
    fn now(&self) -> Self::Instant;

    /// Sleeps for the specified duration.
    ///
    /// Only driver and runtime code sleeps; the state machines never do.
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send;

    /// Milliseconds since the Unix epoch.
    ///
    /// Used to derive notification ids when the caller does not supply one.
    fn wall_clock_millis(&self) -> u64;
}
