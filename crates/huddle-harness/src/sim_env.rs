//! Simulated environment on the tokio clock.
//!
//! Under a paused clock (`#[tokio::test(start_paused = true)]` or a runtime
//! built with `start_paused(true)`), time only moves when every task is idle
//! and then jumps straight to the next timer. Sessions spanning minutes of
//! notification timeouts run instantly and identically every time.

use std::time::Duration;

use huddle_core::Environment;
use tokio::time::Instant;

/// Wall-clock origin used for generated notification ids.
pub const DEFAULT_WALL_CLOCK_MILLIS: u64 = 1_700_000_000_000;

/// Deterministic environment backed by `tokio::time`.
#[derive(Debug, Clone, Copy)]
pub struct SimEnv {
    origin: Instant,
    wall_origin_millis: u64,
}

impl Default for SimEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl SimEnv {
    /// Environment starting at [`DEFAULT_WALL_CLOCK_MILLIS`].
    pub fn new() -> Self {
        Self::with_wall_clock(DEFAULT_WALL_CLOCK_MILLIS)
    }

    /// Environment whose wall clock starts at `millis` since the Unix epoch.
    pub fn with_wall_clock(millis: u64) -> Self {
        Self { origin: Instant::now(), wall_origin_millis: millis }
    }

    /// Virtual time elapsed since the environment was created.
    pub fn elapsed(&self) -> Duration {
        Instant::now() - self.origin
    }
}

impl Environment for SimEnv {
    type Instant = Instant;

    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) -> impl std::future::Future<Output = ()> + Send {
        tokio::time::sleep(duration)
    }

    fn wall_clock_millis(&self) -> u64 {
        self.wall_origin_millis + self.elapsed().as_millis() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn sleep_advances_virtual_time() {
        let env = SimEnv::new();
        let start = env.now();

        env.sleep(Duration::from_secs(30)).await;

        assert_eq!(env.now() - start, Duration::from_secs(30));
        assert_eq!(env.wall_clock_millis(), DEFAULT_WALL_CLOCK_MILLIS + 30_000);
    }
}
