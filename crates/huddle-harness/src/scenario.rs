//! Scripted sessions for simulation.
//!
//! A session is a list of [`ScriptStep`]s, each an [`AppEvent`] delivered a
//! delay after the previous one. Sessions are built by hand with
//! [`Scenario`], from fuzzer-chosen [`ScenarioOp`]s, or from a seed with
//! [`Scenario::random`] so failures reproduce from a single number.

use std::time::Duration;

use arbitrary::Arbitrary;
use huddle_app::AppEvent;
use huddle_core::{DisplayProps, Participant, TimeoutClass};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// One scripted input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptStep {
    /// Delay after the previous step.
    pub delay: Duration,
    /// Event to deliver.
    pub event: AppEvent,
}

/// A high-level session operation.
///
/// Small integer fields index into fixed pools of participants, senders and
/// uids so random operations collide often enough to be interesting.
#[derive(Debug, Clone, PartialEq, Eq, Arbitrary)]
pub enum ScenarioOp {
    /// Let time pass.
    Wait {
        /// Milliseconds to wait.
        millis: u16,
    },
    /// Chat message from a remote sender.
    Chat {
        /// Sender pool index.
        sender: u8,
        /// Uid pool index. `None` lets the notifier generate one.
        uid: Option<u8>,
    },
    /// Backend paused the session.
    PauseSession,
    /// Backend resumed the session.
    ResumeSession,
    /// Backend ended the consultation.
    ConsultationEnded,
    /// A remote participant raised a hand.
    RaiseHand {
        /// Sender pool index.
        sender: u8,
    },
    /// Plain informational notification.
    Plain {
        /// Uid pool index. `None` lets the notifier generate one.
        uid: Option<u8>,
        /// Timeout class selector.
        timeout: u8,
    },
    /// Description that looks like JSON but is not.
    Malformed,
    /// User dismissed a notification.
    Dismiss {
        /// Uid pool index.
        uid: u8,
    },
    /// User cleared everything.
    ClearAll,
    /// Participant joined.
    Join {
        /// Participant pool index.
        participant: u8,
    },
    /// Participant left.
    Leave {
        /// Participant pool index.
        participant: u8,
    },
    /// Joined a conference.
    JoinConference {
        /// Conference selector.
        conference: u8,
    },
    /// Left the conference.
    LeaveConference,
    /// Toggled notifications in settings.
    Toggle {
        /// New flag value.
        enabled: bool,
    },
}

/// Distinct uids a scenario uses.
const UID_POOL: u8 = 8;
/// Distinct participants a scenario uses.
const PARTICIPANT_POOL: u8 = 40;
/// Distinct conferences a scenario uses.
const CONFERENCE_POOL: u8 = 3;

const SENDERS: [&str; 4] = ["Dr. Ada", "Nurse Grace", "Alan", "Front desk"];

fn uid(index: u8) -> String {
    format!("n{}", index % UID_POOL)
}

fn device(json: String, uid: Option<String>) -> AppEvent {
    AppEvent::Show {
        props: DisplayProps { uid, description: Some(json), ..DisplayProps::default() },
        timeout: None,
    }
}

fn timeout_class(selector: u8) -> Option<TimeoutClass> {
    match selector % 6 {
        0 => Some(TimeoutClass::Short),
        1 => Some(TimeoutClass::Medium),
        2 => Some(TimeoutClass::Long),
        3 => Some(TimeoutClass::Sticky),
        4 => Some(TimeoutClass::Instant),
        _ => None,
    }
}

impl ScenarioOp {
    /// The event this operation delivers. `None` for [`ScenarioOp::Wait`].
    pub fn to_event(&self) -> Option<AppEvent> {
        let event = match *self {
            Self::Wait { .. } => return None,
            Self::Chat { sender, uid: slot } => {
                let sender = SENDERS[usize::from(sender) % SENDERS.len()];
                device(
                    format!(
                        r#"{{"deviceMessageType":"MESSAGE","title":"{sender}","content":"hello","recipientRole":"patient"}}"#
                    ),
                    slot.map(uid),
                )
            },
            Self::PauseSession => device(
                r#"{"deviceMessageType":"PAUSE_SESSION","recipientRole":"patient"}"#.into(),
                None,
            ),
            Self::ResumeSession => device(
                r#"{"deviceMessageType":"RESUME_SESSION","recipientRole":"patient"}"#.into(),
                None,
            ),
            Self::ConsultationEnded => {
                device(r#"{"deviceMessageType":"CONSULTATION_ENDED"}"#.into(), None)
            },
            Self::RaiseHand { sender } => {
                let sender = SENDERS[usize::from(sender) % SENDERS.len()];
                device(format!(r#"{{"raisedHand":true,"title":"{sender}"}}"#), None)
            },
            Self::Plain { uid: slot, timeout } => AppEvent::Show {
                props: DisplayProps {
                    uid: slot.map(uid),
                    title: Some("Recording started".into()),
                    ..DisplayProps::default()
                },
                timeout: timeout_class(timeout),
            },
            Self::Malformed => device(r#"{"deviceMessageType": PAUSE"#.into(), None),
            Self::Dismiss { uid: slot } => AppEvent::Dismiss { uid: uid(slot) },
            Self::ClearAll => AppEvent::ClearAll,
            Self::Join { participant } => {
                let index = participant % PARTICIPANT_POOL;
                AppEvent::ParticipantJoined {
                    participant: Participant::new(format!("p{index}"), format!("Participant {index}")),
                }
            },
            Self::Leave { participant } => {
                AppEvent::ParticipantLeft { id: format!("p{}", participant % PARTICIPANT_POOL) }
            },
            Self::JoinConference { conference } => AppEvent::ConferenceJoined {
                conference: u64::from(conference % CONFERENCE_POOL) + 1,
            },
            Self::LeaveConference => AppEvent::ConferenceLeft,
            Self::Toggle { enabled } => AppEvent::SetEnabled { enabled },
        };
        Some(event)
    }
}

/// Builder for scripted sessions.
#[derive(Debug, Clone, Default)]
pub struct Scenario {
    steps: Vec<ScriptStep>,
    pending_delay: Duration,
}

impl Scenario {
    /// Empty scenario.
    pub fn new() -> Self {
        Self::default()
    }

    /// Let `duration` pass before the next event.
    #[must_use]
    pub fn wait(mut self, duration: Duration) -> Self {
        self.pending_delay += duration;
        self
    }

    /// Let `millis` milliseconds pass before the next event.
    #[must_use]
    pub fn wait_ms(self, millis: u64) -> Self {
        self.wait(Duration::from_millis(millis))
    }

    /// Deliver `event` after any pending wait.
    #[must_use]
    pub fn then(mut self, event: AppEvent) -> Self {
        let delay = std::mem::take(&mut self.pending_delay);
        self.steps.push(ScriptStep { delay, event });
        self
    }

    /// Apply a high-level operation.
    #[must_use]
    pub fn op(self, op: &ScenarioOp) -> Self {
        match (op, op.to_event()) {
            (ScenarioOp::Wait { millis }, _) => self.wait_ms(u64::from(*millis)),
            (_, Some(event)) => self.then(event),
            (_, None) => self,
        }
    }

    /// Scenario from a list of operations.
    pub fn from_ops<'a>(ops: impl IntoIterator<Item = &'a ScenarioOp>) -> Self {
        ops.into_iter().fold(Self::new(), Self::op)
    }

    /// Reproducible random session of `len` operations.
    ///
    /// Waits are drawn so that timeouts and batch flushes fire regularly in
    /// the middle of the session.
    pub fn random(seed: u64, len: usize) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let ops: Vec<ScenarioOp> = (0..len).map(|_| random_op(&mut rng)).collect();
        Self::from_ops(&ops)
    }

    /// Scripted steps.
    pub fn steps(&self) -> &[ScriptStep] {
        &self.steps
    }

    /// Consume the scenario into its steps.
    pub fn into_steps(self) -> Vec<ScriptStep> {
        self.steps
    }
}

fn random_op(rng: &mut ChaCha8Rng) -> ScenarioOp {
    match rng.gen_range(0..100u32) {
        0..=24 => ScenarioOp::Wait { millis: rng.gen_range(0..6_000) },
        25..=34 => ScenarioOp::Chat {
            sender: rng.r#gen(),
            uid: rng.gen_bool(0.5).then(|| rng.r#gen()),
        },
        35..=37 => ScenarioOp::PauseSession,
        38..=40 => ScenarioOp::ResumeSession,
        41 => ScenarioOp::ConsultationEnded,
        42..=45 => ScenarioOp::RaiseHand { sender: rng.r#gen() },
        46..=53 => ScenarioOp::Plain { uid: rng.gen_bool(0.7).then(|| rng.r#gen()), timeout: rng.r#gen() },
        54 => ScenarioOp::Malformed,
        55..=62 => ScenarioOp::Dismiss { uid: rng.r#gen() },
        63..=64 => ScenarioOp::ClearAll,
        65..=79 => ScenarioOp::Join { participant: rng.r#gen() },
        80..=89 => ScenarioOp::Leave { participant: rng.r#gen() },
        90..=94 => ScenarioOp::JoinConference { conference: rng.r#gen() },
        95..=96 => ScenarioOp::LeaveConference,
        _ => ScenarioOp::Toggle { enabled: rng.gen_bool(0.8) },
    }
}
