//! Driver trait for abstracting I/O operations.
//!
//! The [`Driver`] trait decouples the application runtime from specific I/O
//! implementations. Each frontend implements the trait to provide input
//! events, rendering and device control, while the generic
//! [`crate::Runtime`] handles all orchestration.

use std::future::Future;

use huddle_core::MediaType;

use crate::{App, AppEvent};

/// Abstracts I/O operations for the application runtime.
///
/// Implementations provide platform-specific I/O while the generic
/// [`Runtime`](crate::Runtime) handles orchestration logic. This ensures
/// the same orchestration code runs in production and simulation.
///
/// # Implementations
///
/// - **CLI**: Replays a JSON-lines session script and logs effects
/// - **Simulation**: Scripted events on a paused tokio clock, recording
///   every effect for assertions
pub trait Driver: Send {
    /// Platform-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Wait for the next input event.
    ///
    /// Returns `None` once the input source is exhausted.
    ///
    /// # Cancel safety
    ///
    /// The runtime races this future against timer deadlines and drops it
    /// when a timer fires first. Implementations must not lose an event when
    /// that happens.
    fn next_event(&mut self) -> impl Future<Output = Result<Option<AppEvent>, Self::Error>> + Send;

    /// Render the application state.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    fn render(&mut self, app: &App) -> Result<(), Self::Error>;

    /// Mute or unmute a local device.
    fn set_muted(
        &mut self,
        media: MediaType,
        muted: bool,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Leave the session view.
    fn navigate(&mut self) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Clean up resources.
    fn stop(&mut self);
}
