//! Fuzz target for the notification lifecycle
//!
//! Drive App and Notifier together through arbitrary sessions on a manual
//! clock
//!
//! # Strategy
//!
//! - Mixed traffic: Chat, device signals, plain notices, dismissals, clears
//! - Roster churn: Joins and leaves from a small participant pool
//! - Conference churn: Switching and leaving conferences mid-session
//! - Time: Arbitrary waits that fire hide timers and batch flushes
//!
//! # Invariants
//!
//! - Standard notification invariants hold after every operation
//! - App and Notifier agree on the active conference and enable flag
//! - No pending batch survives leaving a conference
//! - Draining all timers leaves only sticky notifications

#![no_main]

use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use arbitrary::Arbitrary;
use huddle_app::{App, AppAction, AppEvent};
use huddle_core::{BatchKind, Environment, Notifier, NotifierAction, NotifierConfig, TimeoutClass};
use huddle_harness::{InvariantRegistry, NotificationSnapshot, ScenarioOp};
use libfuzzer_sys::fuzz_target;

/// Manual clock: time is a [`Duration`] since start, advanced explicitly.
#[derive(Clone, Default)]
struct FuzzEnv {
    millis: Arc<AtomicU64>,
}

impl FuzzEnv {
    fn advance(&self, millis: u64) {
        self.millis.fetch_add(millis, Ordering::SeqCst);
    }
}

impl Environment for FuzzEnv {
    type Instant = Duration;

    fn now(&self) -> Duration {
        Duration::from_millis(self.millis.load(Ordering::SeqCst))
    }

    fn sleep(&self, _duration: Duration) -> impl std::future::Future<Output = ()> + Send {
        std::future::ready(())
    }

    fn wall_clock_millis(&self) -> u64 {
        1_700_000_000_000 + self.millis.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Arbitrary)]
struct Session {
    enabled: bool,
    flush_window_ms: u16,
    ops: Vec<ScenarioOp>,
}

fn deliver(app: &mut App, actions: Vec<NotifierAction>) {
    for action in actions {
        if let NotifierAction::Dispatch(event) = action {
            app.apply(event);
        }
    }
}

fn step(app: &mut App, notifier: &mut Notifier<FuzzEnv>, event: AppEvent) {
    for action in app.handle(event) {
        if let AppAction::Notify(event) = action {
            if let Ok(actions) = notifier.handle(event) {
                deliver(app, actions);
            }
        }
    }
}

fuzz_target!(|session: Session| {
    let env = FuzzEnv::default();
    let config = NotifierConfig {
        enabled: session.enabled,
        flush_window_ms: u64::from(session.flush_window_ms.max(1)),
        ..NotifierConfig::default()
    };
    let registry = InvariantRegistry::standard();
    let mut app = App::new(session.enabled);
    let mut notifier = Notifier::new(env.clone(), config);

    for op in session.ops.iter().take(256) {
        match op {
            ScenarioOp::Wait { millis } => env.advance(u64::from(*millis)),
            op => {
                if let Some(event) = op.to_event() {
                    step(&mut app, &mut notifier, event);
                }
            },
        }

        let actions = notifier.handle_tick(app.roster());
        deliver(&mut app, actions);

        let snapshot = NotificationSnapshot::from_app(&app);
        if let Err(violations) = registry.check_all(&snapshot) {
            panic!("after {op:?}: {violations:?}");
        }
        assert_eq!(app.conference(), notifier.conference());
        assert_eq!(app.notifications_enabled(), notifier.is_enabled());
        if matches!(op, ScenarioOp::LeaveConference) {
            assert!(notifier.pending_batch(BatchKind::Joined).is_empty());
            assert!(notifier.pending_batch(BatchKind::Left).is_empty());
        }
    }

    // Drain: every remaining deadline is finite.
    while notifier.next_deadline().is_some() {
        env.advance(60_000);
        let actions = notifier.handle_tick(app.roster());
        deliver(&mut app, actions);
    }

    for notification in app.queue().iter() {
        assert_eq!(notification.timeout, TimeoutClass::Sticky, "{notification:?}");
    }
});
