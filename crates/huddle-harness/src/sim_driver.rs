//! Simulation driver implementing the Driver trait.
//!
//! `SimDriver` replays a scripted session on the tokio clock and records every
//! effect the runtime produces. It implements [`Driver`] so the same
//! [`huddle_app::Runtime`] orchestration code runs in both production and
//! simulation.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use huddle_app::{App, AppEvent, Driver};
use huddle_core::MediaType;
use serde::Serialize;
use thiserror::Error;
use tokio::time::Instant;

use crate::{
    invariants::{InvariantRegistry, NotificationSnapshot, Violation},
    scenario::ScriptStep,
};

/// Error type for simulation driver.
#[derive(Debug, Clone, Error)]
pub enum SimDriverError {
    /// Rendered state broke an invariant.
    #[error("invariant violation at render {render}: {}", summarize(.violations))]
    Invariant {
        /// Index of the offending render.
        render: usize,
        /// Every violated invariant.
        violations: Vec<Violation>,
    },
}

fn summarize(violations: &[Violation]) -> String {
    violations.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}

/// An effect observed by the driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum Effect {
    /// The runtime rendered this state.
    Render(NotificationSnapshot),
    /// A local device was muted or unmuted.
    Muted {
        /// Device.
        media: MediaType,
        /// Target state.
        muted: bool,
    },
    /// The runtime navigated away from the session.
    Navigated,
}

/// An effect with its virtual timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recorded {
    /// Milliseconds since the driver was created.
    pub at_ms: u64,
    /// What happened.
    #[serde(flatten)]
    pub effect: Effect,
}

/// Shared state, observable from outside the runtime.
#[derive(Default)]
struct SharedState {
    script: VecDeque<ScriptStep>,
    /// Delivery time of the script head, fixed on first poll.
    next_due: Option<Instant>,
    timeline: Vec<Recorded>,
    renders: usize,
    stopped: bool,
}

/// Simulation driver for deterministic testing.
///
/// Clones share state: hand one to the [`huddle_app::Runtime`] and keep
/// another to inspect the recorded effects afterwards.
#[derive(Clone)]
pub struct SimDriver {
    state: Arc<Mutex<SharedState>>,
    invariants: Option<Arc<InvariantRegistry>>,
    origin: Instant,
}

impl SimDriver {
    /// Create a driver that replays `script`.
    pub fn new(script: impl IntoIterator<Item = ScriptStep>) -> Self {
        let state = SharedState { script: script.into_iter().collect(), ..SharedState::default() };
        Self { state: Arc::new(Mutex::new(state)), invariants: None, origin: Instant::now() }
    }

    /// Enable invariant checking on every render.
    #[must_use]
    pub fn with_invariants(mut self, registry: InvariantRegistry) -> Self {
        self.invariants = Some(Arc::new(registry));
        self
    }

    /// Append an event delivered `delay` after the previous one.
    pub fn push(&self, delay: Duration, event: AppEvent) {
        self.lock().script.push_back(ScriptStep { delay, event });
    }

    /// Every recorded effect with its timestamp.
    pub fn timeline(&self) -> Vec<Recorded> {
        self.lock().timeline.clone()
    }

    /// Every recorded effect, without timestamps.
    pub fn effects(&self) -> Vec<Effect> {
        self.lock().timeline.iter().map(|r| r.effect.clone()).collect()
    }

    /// Device and navigation effects only.
    pub fn side_effects(&self) -> Vec<Effect> {
        self.effects().into_iter().filter(|e| !matches!(e, Effect::Render(_))).collect()
    }

    /// Most recent rendered state.
    pub fn last_render(&self) -> Option<NotificationSnapshot> {
        self.lock().timeline.iter().rev().find_map(|r| match &r.effect {
            Effect::Render(snapshot) => Some(snapshot.clone()),
            _ => None,
        })
    }

    /// Number of renders so far.
    pub fn render_count(&self) -> usize {
        self.lock().renders
    }

    /// Whether the runtime stopped the driver.
    pub fn is_stopped(&self) -> bool {
        self.lock().stopped
    }

    /// Script steps not yet delivered.
    pub fn remaining(&self) -> usize {
        self.lock().script.len()
    }

    fn lock(&self) -> MutexGuard<'_, SharedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, effect: Effect) {
        let at_ms = (Instant::now() - self.origin).as_millis() as u64;
        self.lock().timeline.push(Recorded { at_ms, effect });
    }
}

impl Driver for SimDriver {
    type Error = SimDriverError;

    async fn next_event(&mut self) -> Result<Option<AppEvent>, Self::Error> {
        let due = {
            let mut state = self.lock();
            let Some(delay) = state.script.front().map(|step| step.delay) else {
                return Ok(None);
            };
            // Survives cancellation: a re-poll waits for the same instant
            *state.next_due.get_or_insert_with(|| Instant::now() + delay)
        };

        tokio::time::sleep_until(due).await;

        let mut state = self.lock();
        state.next_due = None;
        Ok(state.script.pop_front().map(|step| step.event))
    }

    fn render(&mut self, app: &App) -> Result<(), Self::Error> {
        let snapshot = NotificationSnapshot::from_app(app);
        let render = {
            let mut state = self.lock();
            state.renders += 1;
            state.renders
        };

        if let Some(registry) = &self.invariants {
            registry
                .check_all(&snapshot)
                .map_err(|violations| SimDriverError::Invariant { render, violations })?;
        }

        self.record(Effect::Render(snapshot));
        Ok(())
    }

    async fn set_muted(&mut self, media: MediaType, muted: bool) -> Result<(), Self::Error> {
        self.record(Effect::Muted { media, muted });
        Ok(())
    }

    async fn navigate(&mut self) -> Result<(), Self::Error> {
        self.record(Effect::Navigated);
        Ok(())
    }

    fn stop(&mut self) {
        self.lock().stopped = true;
    }
}
