//! Notification lifecycle state machine.
//!
//! The [`Notifier`] owns everything about a notification's life except the
//! queue itself: payload normalization, the eligibility policy, uid
//! generation, auto-hide timers, hide-time side effects and the debounced
//! join/leave batches. The queue belongs to the caller's state container,
//! which applies the [`StoreEvent`]s carried by [`NotifierAction::Dispatch`].
//!
//! # Ordering
//!
//! Actions are returned in the order they must be executed. For a hide that
//! carries a snapshot, a microphone command precedes the hide dispatch and a
//! navigation request follows it:
//!
//! ```text
//! [SetMuted { Audio, muted }]?  Dispatch(Hide { uid, conference })  [Navigate]?
//! ```
//!
//! # Time
//!
//! The notifier never sleeps. It records deadlines in [`TimerRegistry`]s and
//! fires them from [`Notifier::handle_tick`]. [`Notifier::next_deadline`]
//! tells the driver how long it may wait.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{
    batch::{BatchBuffer, BatchKind},
    config::NotifierConfig,
    env::Environment,
    error::NotifierError,
    notification::{ConferenceId, DisplayProps, Notification, TimeoutClass, Uid},
    payload::DeviceMessage,
    roster::ParticipantCount,
    timers::TimerRegistry,
};

/// A request to show a notification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowRequest {
    /// Display payload.
    #[serde(default)]
    pub props: DisplayProps,
    /// Requested timeout class. Defaults to [`TimeoutClass::Long`].
    #[serde(default)]
    pub timeout: Option<TimeoutClass>,
}

impl ShowRequest {
    /// Request with the default timeout.
    pub fn new(props: DisplayProps) -> Self {
        Self { props, timeout: None }
    }

    /// Request with an explicit timeout class.
    pub fn with_timeout(props: DisplayProps, timeout: TimeoutClass) -> Self {
        Self { props, timeout: Some(timeout) }
    }
}

/// Inputs to the notifier.
#[derive(Debug, Clone)]
pub enum NotifierEvent {
    /// Show a notification.
    Show(ShowRequest),

    /// Hide a notification.
    Hide {
        /// Target notification.
        uid: Uid,
        /// The notification being hidden. Side effects only run when present.
        snapshot: Option<Notification>,
    },

    /// Hide everything.
    Clear,

    /// Set the global enable flag.
    SetEnabled(bool),

    /// The active conference changed. `None` means the conference ended.
    ConferenceChanged(Option<ConferenceId>),

    /// A participant joined.
    ParticipantJoined {
        /// Display name.
        name: String,
    },

    /// A participant left.
    ParticipantLeft {
        /// Display name.
        name: String,
    },
}

/// Events applied by the state container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    /// Add (or replace) a notification.
    Show {
        /// The notification to queue.
        notification: Notification,
    },

    /// Remove a notification.
    Hide {
        /// Target notification.
        uid: Uid,
        /// Conference active at hide time.
        conference: Option<ConferenceId>,
    },

    /// Remove every notification.
    Clear,

    /// Record the global enable flag.
    ConfigSet {
        /// New flag value.
        enabled: bool,
    },
}

/// Local media selector for device commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    /// Microphone.
    Audio,
    /// Camera.
    Video,
}

/// Actions produced by the notifier, in execution order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifierAction {
    /// Apply an event to the state container.
    Dispatch(StoreEvent),

    /// Mute or unmute a local device.
    SetMuted {
        /// Device to control.
        media: MediaType,
        /// Target state.
        muted: bool,
    },

    /// Leave the session view. Target is decided by the host.
    Navigate,
}

/// Something due in [`Notifier::handle_tick`].
enum Due {
    Hide(Notification),
    Flush(BatchKind),
}

/// Notification lifecycle manager.
///
/// Pure state machine: no I/O, time comes from the environment. Construct one
/// per session and drop it on teardown; the batch buffers and timers go with
/// it.
pub struct Notifier<E: Environment> {
    env: E,
    config: NotifierConfig,
    /// Global enable flag.
    enabled: bool,
    /// Conference active right now. `None` between conferences.
    conference: Option<ConferenceId>,
    joined: BatchBuffer,
    left: BatchBuffer,
    /// Auto-hide deadlines, carrying the snapshot used for side effects.
    hide_timers: TimerRegistry<Uid, E::Instant, Notification>,
    /// Debounce deadlines, one per batch kind.
    flush_timers: TimerRegistry<BatchKind, E::Instant>,
    /// Last wall-clock millisecond used for a generated uid.
    last_uid_millis: u64,
}

impl<E: Environment> Notifier<E> {
    /// Create a notifier with the given environment and configuration.
    pub fn new(env: E, config: NotifierConfig) -> Self {
        Self {
            env,
            enabled: config.enabled,
            config,
            conference: None,
            joined: BatchBuffer::default(),
            left: BatchBuffer::default(),
            hide_timers: TimerRegistry::new(),
            flush_timers: TimerRegistry::new(),
            last_uid_millis: 0,
        }
    }

    /// Process an event and return actions.
    ///
    /// # Errors
    ///
    /// Returns [`NotifierError::MalformedDescription`] if a show request's
    /// description looks like a device message but does not parse.
    pub fn handle(&mut self, event: NotifierEvent) -> Result<Vec<NotifierAction>, NotifierError> {
        let actions = match event {
            NotifierEvent::Show(request) => return self.show(request),
            NotifierEvent::Hide { uid, snapshot } => self.hide(uid, snapshot),
            NotifierEvent::Clear => self.clear(),
            NotifierEvent::SetEnabled(enabled) => self.set_enabled(enabled),
            NotifierEvent::ConferenceChanged(conference) => self.conference_changed(conference),
            NotifierEvent::ParticipantJoined { name } => {
                self.participant_joined(name);
                vec![]
            },
            NotifierEvent::ParticipantLeft { name } => {
                self.participant_left(name);
                vec![]
            },
        };
        Ok(actions)
    }

    /// Show a notification if it is eligible.
    ///
    /// Empty payloads and ineligible notifications produce no actions.
    ///
    /// # Errors
    ///
    /// Returns [`NotifierError::MalformedDescription`] if the description
    /// looks like a device message but does not parse.
    pub fn show(&mut self, request: ShowRequest) -> Result<Vec<NotifierAction>, NotifierError> {
        let ShowRequest { mut props, timeout } = request;
        if props.is_empty() {
            tracing::debug!("ignoring empty notification payload");
            return Ok(vec![]);
        }

        let device = match props.description.as_deref() {
            Some(description) => DeviceMessage::parse(description)?,
            None => None,
        };

        let timeout = match device {
            Some(message) => {
                if !message.is_eligible() {
                    tracing::debug!(
                        message_id = message.message_id(),
                        "device message not eligible for display"
                    );
                    return Ok(vec![]);
                }
                message.apply_to(&mut props);
                if props.is_mic_muted.is_some() { TimeoutClass::Instant } else { TimeoutClass::Long }
            },
            None => timeout.unwrap_or(TimeoutClass::Long),
        };

        if !self.admits(&props) {
            return Ok(vec![]);
        }

        Ok(self.display(props, timeout))
    }

    /// Hide a notification.
    ///
    /// Disarms its auto-hide timer. When a snapshot is given, a microphone
    /// command runs before the hide dispatch and navigation runs after it.
    /// Hiding an unknown uid still dispatches; the state container ignores it.
    pub fn hide(&mut self, uid: Uid, snapshot: Option<Notification>) -> Vec<NotifierAction> {
        self.hide_timers.cancel(&uid);

        let props = snapshot.as_ref().map(|n| &n.props);
        let mut actions = Vec::with_capacity(3);

        if let Some(muted) = props.and_then(|p| p.is_mic_muted) {
            actions.push(NotifierAction::SetMuted { media: MediaType::Audio, muted });
        }

        tracing::debug!(%uid, conference = ?self.conference, "hiding notification");
        actions.push(NotifierAction::Dispatch(StoreEvent::Hide {
            uid,
            conference: self.conference,
        }));

        if props.is_some_and(|p| p.end_stream) {
            actions.push(NotifierAction::Navigate);
        }

        actions
    }

    /// Hide everything and disarm every auto-hide timer.
    pub fn clear(&mut self) -> Vec<NotifierAction> {
        self.hide_timers.clear();
        vec![NotifierAction::Dispatch(StoreEvent::Clear)]
    }

    /// Set the global enable flag.
    ///
    /// Only gates future shows; visible notifications stay.
    pub fn set_enabled(&mut self, enabled: bool) -> Vec<NotifierAction> {
        self.enabled = enabled;
        vec![NotifierAction::Dispatch(StoreEvent::ConfigSet { enabled })]
    }

    /// Track the active conference.
    ///
    /// Leaving a conference, either to none or straight into another one,
    /// clears the queue and discards pending batches so nothing leaks into
    /// the next session. Entering a conference from none keeps what is queued.
    pub fn conference_changed(&mut self, conference: Option<ConferenceId>) -> Vec<NotifierAction> {
        if conference == self.conference {
            return vec![];
        }

        let Some(ended) = std::mem::replace(&mut self.conference, conference) else {
            tracing::info!(?conference, "conference active");
            return vec![];
        };

        tracing::info!(ended, next = ?conference, "conference ended, clearing notifications");
        self.joined.take();
        self.left.take();
        self.flush_timers.clear();
        self.clear()
    }

    /// Buffer a joined participant and push the join flush back.
    pub fn participant_joined(&mut self, name: impl Into<String>) {
        self.enqueue(BatchKind::Joined, name.into());
    }

    /// Buffer a departed participant and push the leave flush back.
    pub fn participant_left(&mut self, name: impl Into<String>) {
        self.enqueue(BatchKind::Left, name.into());
    }

    /// Fire every due timer, earliest first.
    ///
    /// Hide timers hide with their snapshot, so auto-hides run the same side
    /// effects as a manual dismiss. Flush timers flush their batch, reading
    /// the participant count from `participants`.
    pub fn handle_tick(&mut self, participants: &impl ParticipantCount) -> Vec<NotifierAction> {
        let now = self.env.now();

        let mut due: Vec<(E::Instant, Due)> = self
            .hide_timers
            .take_due(now)
            .into_iter()
            .map(|(deadline, _, snapshot)| (deadline, Due::Hide(snapshot)))
            .chain(
                self.flush_timers
                    .take_due(now)
                    .into_iter()
                    .map(|(deadline, kind, ())| (deadline, Due::Flush(kind))),
            )
            .collect();
        due.sort_by_key(|(deadline, _)| *deadline);

        let mut actions = Vec::new();
        for (_, item) in due {
            match item {
                Due::Hide(snapshot) => {
                    actions.extend(self.hide(snapshot.uid.clone(), Some(snapshot)));
                },
                Due::Flush(kind) => actions.extend(self.flush(kind, participants)),
            }
        }
        actions
    }

    /// Turn a batch into at most one notification and empty it.
    ///
    /// Large meetings (count above the kind's silence threshold) discard the
    /// batch silently. An empty batch produces nothing.
    pub fn flush(
        &mut self,
        kind: BatchKind,
        participants: &impl ParticipantCount,
    ) -> Vec<NotifierAction> {
        self.flush_timers.cancel(&kind);
        let names = self.buffer_mut(kind).take();

        let count = participants.participant_count();
        let threshold = self.config.silence_threshold(kind);
        if count > threshold {
            tracing::debug!(?kind, count, threshold, dropped = names.len(), "batch silenced");
            return vec![];
        }

        let Some(props) = kind.props_for(&names) else {
            return vec![];
        };
        if !self.admits(&props) {
            return vec![];
        }

        self.display(props, TimeoutClass::Short)
    }

    /// Earliest armed deadline. `None` if nothing is pending.
    pub fn next_deadline(&self) -> Option<E::Instant> {
        match (self.hide_timers.next_deadline(), self.flush_timers.next_deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Global enable flag.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Active conference.
    pub fn conference(&self) -> Option<ConferenceId> {
        self.conference
    }

    /// Names waiting in a batch.
    pub fn pending_batch(&self, kind: BatchKind) -> &[String] {
        match kind {
            BatchKind::Joined => self.joined.names(),
            BatchKind::Left => self.left.names(),
        }
    }

    /// Whether an auto-hide timer is armed for `uid`.
    pub fn has_hide_timer(&self, uid: &str) -> bool {
        self.hide_timers.contains(&uid.to_owned())
    }

    /// Number of armed auto-hide timers.
    pub fn hide_timer_count(&self) -> usize {
        self.hide_timers.len()
    }

    /// Active configuration.
    pub fn config(&self) -> &NotifierConfig {
        &self.config
    }

    fn enqueue(&mut self, kind: BatchKind, name: String) {
        self.buffer_mut(kind).push(name);
        let deadline = self.env.now() + self.config.flush_window();
        let rescheduled = self.flush_timers.schedule(kind, deadline, ());
        tracing::trace!(?kind, rescheduled, pending = self.pending_batch(kind).len(), "batched");
    }

    fn buffer_mut(&mut self, kind: BatchKind) -> &mut BatchBuffer {
        match kind {
            BatchKind::Joined => &mut self.joined,
            BatchKind::Left => &mut self.left,
        }
    }

    /// Global flag plus allow/deny lists.
    fn admits(&self, props: &DisplayProps) -> bool {
        if !self.enabled {
            tracing::debug!(key = ?props.key(), "notifications disabled");
            return false;
        }
        if !self.config.admits(props.key()) {
            tracing::debug!(key = ?props.key(), "notification key filtered by config");
            return false;
        }
        true
    }

    /// Queue an admitted notification and arm its auto-hide timer.
    fn display(&mut self, mut props: DisplayProps, timeout: TimeoutClass) -> Vec<NotifierAction> {
        let uid = match props.uid.clone() {
            Some(uid) => uid,
            None => self.next_uid(),
        };
        props.uid = Some(uid.clone());

        let resolved_timeout = timeout.resolve(&self.config.timeouts);
        let notification = Notification {
            uid: uid.clone(),
            props,
            timeout,
            resolved_timeout,
            conference: self.conference,
        };

        match resolved_timeout {
            Some(after) => {
                let deadline = self.env.now() + after;
                self.hide_timers.schedule(uid.clone(), deadline, notification.clone());
            },
            // A sticky notification replacing a timed one must not inherit its timer
            None => {
                self.hide_timers.cancel(&uid);
            },
        }

        tracing::debug!(
            %uid,
            ?timeout,
            timeout_ms = resolved_timeout.map(|d| d.as_millis() as u64),
            "showing notification"
        );
        vec![NotifierAction::Dispatch(StoreEvent::Show { notification })]
    }

    /// Strictly increasing uid derived from the wall clock.
    fn next_uid(&mut self) -> Uid {
        let millis = self.env.wall_clock_millis().max(self.last_uid_millis + 1);
        self.last_uid_millis = millis;
        millis.to_string()
    }
}

/// Time left until `deadline`, zero if it already passed.
pub fn time_until<I>(now: I, deadline: I) -> Duration
where
    I: Copy + Ord + std::ops::Sub<Output = Duration>,
{
    if deadline <= now { Duration::ZERO } else { deadline - now }
}

#[cfg(test)]
mod tests {
    use std::{
        future::Future,
        sync::{Arc, Mutex},
        time::Instant,
    };

    use super::*;
    use crate::payload::{SESSION_PAUSED_TEXT, SESSION_RESUMED_TEXT};

    /// Manually advanced clock.
    #[derive(Clone)]
    struct ManualEnv {
        start: Instant,
        offset: Arc<Mutex<Duration>>,
    }

    impl ManualEnv {
        fn new() -> Self {
            Self { start: Instant::now(), offset: Arc::new(Mutex::new(Duration::ZERO)) }
        }

        fn advance(&self, by: Duration) {
            *self.offset.lock().unwrap() += by;
        }
    }

    impl Environment for ManualEnv {
        type Instant = Instant;

        fn now(&self) -> Instant {
            self.start + *self.offset.lock().unwrap()
        }

        fn sleep(&self, _duration: Duration) -> impl Future<Output = ()> + Send {
            std::future::ready(())
        }

        fn wall_clock_millis(&self) -> u64 {
            1_700_000_000_000 + self.offset.lock().unwrap().as_millis() as u64
        }
    }

    fn notifier() -> (Notifier<ManualEnv>, ManualEnv) {
        let env = ManualEnv::new();
        (Notifier::new(env.clone(), NotifierConfig::default()), env)
    }

    fn titled(title: &str) -> DisplayProps {
        DisplayProps { title: Some(title.into()), ..DisplayProps::default() }
    }

    fn shown(actions: &[NotifierAction]) -> Vec<&Notification> {
        actions
            .iter()
            .filter_map(|a| match a {
                NotifierAction::Dispatch(StoreEvent::Show { notification }) => Some(notification),
                _ => None,
            })
            .collect()
    }

    fn device(json: &str) -> ShowRequest {
        ShowRequest::new(DisplayProps { description: Some(json.into()), ..DisplayProps::default() })
    }

    #[test]
    fn show_generates_increasing_uids() {
        let (mut notifier, _) = notifier();
        let a = notifier.show(ShowRequest::new(titled("a"))).unwrap();
        let b = notifier.show(ShowRequest::new(titled("b"))).unwrap();

        let a = shown(&a)[0].uid.parse::<u64>().unwrap();
        let b = shown(&b)[0].uid.parse::<u64>().unwrap();
        assert!(b > a, "same-millisecond uids must not collide");
    }

    #[test]
    fn show_keeps_caller_uid() {
        let (mut notifier, _) = notifier();
        let props = DisplayProps { uid: Some("fixed".into()), ..titled("x") };
        let actions = notifier.show(ShowRequest::new(props)).unwrap();

        assert_eq!(shown(&actions)[0].uid, "fixed");
        assert!(notifier.has_hide_timer("fixed"));
    }

    #[test]
    fn empty_payload_is_noop() {
        let (mut notifier, _) = notifier();
        let actions = notifier.show(ShowRequest::default()).unwrap();

        assert!(actions.is_empty());
        assert_eq!(notifier.hide_timer_count(), 0);
    }

    #[test]
    fn disabled_blocks_show_but_not_hide() {
        let (mut notifier, _) = notifier();
        let actions = notifier.set_enabled(false);
        assert_eq!(actions, vec![NotifierAction::Dispatch(StoreEvent::ConfigSet {
            enabled: false
        })]);

        assert!(notifier.show(ShowRequest::new(titled("x"))).unwrap().is_empty());
        assert_eq!(notifier.hide("x".into(), None).len(), 1);
    }

    #[test]
    fn malformed_description_propagates() {
        let (mut notifier, _) = notifier();
        let result = notifier.show(device(r#"{"deviceMessageType":"#));

        assert!(matches!(result, Err(NotifierError::MalformedDescription { .. })));
    }

    #[test]
    fn plain_description_passes_through() {
        let (mut notifier, _) = notifier();
        let props = DisplayProps { description: Some("Recording started".into()), ..titled("x") };
        let actions = notifier.show(ShowRequest::new(props)).unwrap();

        let notification = shown(&actions)[0];
        assert_eq!(notification.props.description.as_deref(), Some("Recording started"));
        assert_eq!(notification.timeout, TimeoutClass::Long);
    }

    #[test]
    fn pause_session_is_instant_and_mutes_on_hide() {
        let (mut notifier, _) = notifier();
        let actions = notifier
            .show(device(r#"{"deviceMessageType":"PAUSE_SESSION","recipientRole":"patient"}"#))
            .unwrap();

        let notification = shown(&actions)[0].clone();
        assert_eq!(notification.timeout, TimeoutClass::Instant);
        assert_eq!(notification.resolved_timeout, Some(Duration::ZERO));
        assert_eq!(notification.props.description.as_deref(), Some(SESSION_PAUSED_TEXT));
        assert_eq!(notification.props.is_mic_muted, Some(true));

        // Instant timeout is due on the very next tick
        let actions = notifier.handle_tick(&1usize);
        assert_eq!(actions, vec![
            NotifierAction::SetMuted { media: MediaType::Audio, muted: true },
            NotifierAction::Dispatch(StoreEvent::Hide { uid: notification.uid, conference: None }),
        ]);
    }

    #[test]
    fn resume_session_unmutes() {
        let (mut notifier, _) = notifier();
        let actions = notifier
            .show(device(r#"{"deviceMessageType":"RESUME_SESSION","raisedHand":true}"#))
            .unwrap();
        let notification = shown(&actions)[0].clone();
        assert_eq!(notification.props.description.as_deref(), Some(SESSION_RESUMED_TEXT));

        let actions = notifier.hide(notification.uid.clone(), Some(notification));
        assert_eq!(actions[0], NotifierAction::SetMuted { media: MediaType::Audio, muted: false });
    }

    #[test]
    fn device_message_without_mic_state_is_long() {
        let (mut notifier, _) = notifier();
        let actions = notifier.show(device(r#"{"raisedHand":true,"title":"Ada"}"#)).unwrap();
        let notification = shown(&actions)[0];

        assert_eq!(notification.timeout, TimeoutClass::Long);
        assert_eq!(notification.props.title.as_deref(), Some("Ada"));
    }

    #[test]
    fn ineligible_device_message_is_dropped() {
        let (mut notifier, _) = notifier();
        let actions = notifier.show(device(r#"{"deviceMessageType":"MESSAGE"}"#)).unwrap();

        assert!(actions.is_empty());
    }

    #[test]
    fn consultation_ended_navigates_after_hide() {
        let (mut notifier, _) = notifier();
        notifier.conference_changed(Some(9));
        let actions = notifier.show(device(r#"{"deviceMessageType":"CONSULTATION_ENDED"}"#)).unwrap();
        let notification = shown(&actions)[0].clone();

        let actions = notifier.hide(notification.uid.clone(), Some(notification.clone()));
        assert_eq!(actions, vec![
            NotifierAction::Dispatch(StoreEvent::Hide {
                uid: notification.uid,
                conference: Some(9),
            }),
            NotifierAction::Navigate,
        ]);
    }

    #[test]
    fn hide_without_snapshot_has_no_side_effects() {
        let (mut notifier, _) = notifier();
        let actions = notifier.hide("unknown".into(), None);

        assert_eq!(actions, vec![NotifierAction::Dispatch(StoreEvent::Hide {
            uid: "unknown".into(),
            conference: None,
        })]);
    }

    #[test]
    fn manual_hide_disarms_timer() {
        let (mut notifier, env) = notifier();
        let props = DisplayProps { uid: Some("n".into()), ..titled("x") };
        notifier.show(ShowRequest::with_timeout(props, TimeoutClass::Short)).unwrap();

        notifier.hide("n".into(), None);
        env.advance(Duration::from_secs(60));

        assert!(notifier.handle_tick(&0usize).is_empty());
    }

    #[test]
    fn sticky_never_arms_timer() {
        let (mut notifier, _) = notifier();
        let props = DisplayProps { uid: Some("n".into()), ..titled("x") };
        notifier.show(ShowRequest::with_timeout(props.clone(), TimeoutClass::Short)).unwrap();
        assert!(notifier.has_hide_timer("n"));

        notifier.show(ShowRequest::with_timeout(props, TimeoutClass::Sticky)).unwrap();
        assert!(!notifier.has_hide_timer("n"));
        assert_eq!(notifier.next_deadline(), None);
    }

    #[test]
    fn auto_hide_fires_at_resolved_timeout() {
        let env = ManualEnv::new();
        let config = NotifierConfig {
            timeouts: crate::TimeoutOverrides { medium: Some(3_000), ..Default::default() },
            ..NotifierConfig::default()
        };
        let mut notifier = Notifier::new(env.clone(), config);
        let props = DisplayProps { uid: Some("n".into()), ..titled("x") };
        notifier.show(ShowRequest::with_timeout(props, TimeoutClass::Medium)).unwrap();

        env.advance(Duration::from_millis(2_999));
        assert!(notifier.handle_tick(&0usize).is_empty());

        env.advance(Duration::from_millis(1));
        let actions = notifier.handle_tick(&0usize);
        assert!(matches!(
            actions.as_slice(),
            [NotifierAction::Dispatch(StoreEvent::Hide { uid, .. })] if uid == "n"
        ));
        assert_eq!(notifier.hide_timer_count(), 0);
    }

    #[test]
    fn conference_end_clears_everything() {
        let (mut notifier, _) = notifier();
        notifier.conference_changed(Some(1));
        notifier.show(ShowRequest::new(titled("x"))).unwrap();
        notifier.participant_joined("Ada");

        let actions = notifier.conference_changed(None);

        assert_eq!(actions, vec![NotifierAction::Dispatch(StoreEvent::Clear)]);
        assert_eq!(notifier.hide_timer_count(), 0);
        assert!(notifier.pending_batch(BatchKind::Joined).is_empty());
        assert_eq!(notifier.next_deadline(), None);
    }

    #[test]
    fn direct_switch_ends_the_previous_conference() {
        let (mut notifier, clock) = notifier();
        notifier.conference_changed(Some(1));
        notifier.show(ShowRequest::new(titled("x"))).unwrap();
        notifier.participant_left("Ada");

        let actions = notifier.conference_changed(Some(2));

        assert_eq!(actions, vec![NotifierAction::Dispatch(StoreEvent::Clear)]);
        assert_eq!(notifier.conference(), Some(2));
        assert_eq!(notifier.hide_timer_count(), 0);
        assert!(notifier.pending_batch(BatchKind::Left).is_empty());
        assert_eq!(notifier.next_deadline(), None);

        clock.advance(Duration::from_secs(60));
        assert!(notifier.handle_tick(&0usize).is_empty());
    }

    #[test]
    fn same_conference_is_noop() {
        let (mut notifier, _) = notifier();
        assert!(notifier.conference_changed(None).is_empty());
        assert!(notifier.conference_changed(Some(1)).is_empty());
        assert!(notifier.conference_changed(Some(1)).is_empty());
    }

    #[test]
    fn join_burst_collapses_into_one_flush() {
        let (mut notifier, env) = notifier();
        for name in ["A", "B", "C"] {
            notifier.participant_joined(name);
            env.advance(Duration::from_millis(1_500));
            assert!(notifier.handle_tick(&3usize).is_empty(), "flush fired early");
        }

        env.advance(Duration::from_millis(500));
        let actions = notifier.handle_tick(&3usize);
        let notifications = shown(&actions);

        assert_eq!(notifications.len(), 1);
        let props = &notifications[0].props;
        assert_eq!(props.title_key.as_deref(), Some("notify.connectedThreePlusMembers"));
        assert_eq!(props.title_arguments.get("name").map(String::as_str), Some("A"));
        assert_eq!(notifications[0].timeout, TimeoutClass::Short);
        assert!(notifier.pending_batch(BatchKind::Joined).is_empty());
    }

    #[test]
    fn large_meeting_silences_and_clears_batch() {
        let (mut notifier, env) = notifier();
        notifier.participant_left("A");
        env.advance(Duration::from_secs(2));

        let actions = notifier.handle_tick(&31usize);

        assert!(actions.is_empty());
        assert!(notifier.pending_batch(BatchKind::Left).is_empty());
        assert_eq!(notifier.next_deadline(), None);
    }

    #[test]
    fn batch_at_threshold_still_notifies() {
        let (mut notifier, _) = notifier();
        notifier.participant_joined("A");

        let actions = notifier.flush(BatchKind::Joined, &30usize);
        assert_eq!(shown(&actions).len(), 1);
    }

    #[test]
    fn empty_flush_dispatches_nothing() {
        let (mut notifier, _) = notifier();
        assert!(notifier.flush(BatchKind::Left, &1usize).is_empty());
    }

    #[test]
    fn batches_respect_enable_flag() {
        let (mut notifier, _) = notifier();
        notifier.set_enabled(false);
        notifier.participant_joined("A");

        assert!(notifier.flush(BatchKind::Joined, &1usize).is_empty());
        assert!(notifier.pending_batch(BatchKind::Joined).is_empty());
    }

    #[test]
    fn allow_list_filters_by_key() {
        let env = ManualEnv::new();
        let config = NotifierConfig {
            allowed: Some(vec!["notify.leftOneMember".into()]),
            ..NotifierConfig::default()
        };
        let mut notifier = Notifier::new(env, config);

        notifier.participant_joined("A");
        assert!(notifier.flush(BatchKind::Joined, &1usize).is_empty());

        notifier.participant_left("A");
        assert_eq!(shown(&notifier.flush(BatchKind::Left, &1usize)).len(), 1);

        assert!(notifier.show(ShowRequest::new(titled("no key"))).unwrap().is_empty());
    }

    #[test]
    fn time_until_saturates() {
        let now = Instant::now();
        assert_eq!(time_until(now, now), Duration::ZERO);
        assert_eq!(time_until(now + Duration::from_secs(1), now), Duration::ZERO);
        assert_eq!(time_until(now, now + Duration::from_secs(1)), Duration::from_secs(1));
    }
}
