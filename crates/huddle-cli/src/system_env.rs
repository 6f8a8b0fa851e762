//! Production Environment implementation using system time.
//!
//! `SystemEnv` reads the real monotonic clock and sleeps on the tokio timer,
//! so behavior depends on wall-clock timing and is not reproducible.

use std::time::Duration;

use huddle_core::Environment;

/// Production environment backed by the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnv;

impl SystemEnv {
    /// Create a new system environment.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Environment for SystemEnv {
    type Instant = std::time::Instant;

    #[allow(clippy::disallowed_methods)]
    fn now(&self) -> Self::Instant {
        std::time::Instant::now()
    }

    fn sleep(&self, duration: Duration) -> impl std::future::Future<Output = ()> + Send {
        tokio::time::sleep(duration)
    }

    /// A clock set before the Unix epoch reads as zero; uid generation stays
    /// monotonic regardless.
    #[allow(clippy::disallowed_methods)]
    fn wall_clock_millis(&self) -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis() as u64)
            .unwrap_or_default()
    }
}
