//! Notification lifecycle core for Huddle.
//!
//! Pure, action-based state machines for the transient notifications a
//! conferencing client shows on screen: chat messages, device-control signals,
//! raised hands and batched participant join/leave notices.
//!
//! # Architecture
//!
//! Nothing in this crate performs I/O. The [`Notifier`] consumes
//! [`NotifierEvent`]s and returns ordered [`NotifierAction`]s; the caller
//! applies [`StoreEvent`]s to its state container and executes the device and
//! navigation side effects. Time comes from an [`env::Environment`], so the
//! same code runs against the wall clock in production and against virtual
//! time in simulation.
//!
//! # Components
//!
//! - [`Notifier`]: show/hide/clear lifecycle, eligibility, auto-hide timers
//! - [`NotificationQueue`]: ordered, uid-keyed queue the state container owns
//! - [`TimerRegistry`]: keyed deadlines with replace-on-reschedule semantics
//! - [`BatchBuffer`]: debounced join/leave name buffers
//! - [`Roster`]: searchable participant list
//! - [`NotifierConfig`]: allow/deny lists, timeout overrides, thresholds

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod batch;
pub mod config;
pub mod env;
pub mod error;
pub mod notification;
pub mod notifier;
pub mod payload;
pub mod queue;
pub mod roster;
pub mod timers;

pub use batch::{BatchBuffer, BatchKind};
pub use config::{NotifierConfig, TimeoutOverrides};
pub use env::Environment;
pub use error::{ConfigError, NotifierError};
pub use notification::{ConferenceId, DisplayProps, Notification, TimeoutClass, Uid};
pub use notifier::{MediaType, Notifier, NotifierAction, NotifierEvent, ShowRequest, StoreEvent};
pub use payload::{DeviceMessage, DeviceMessageType};
pub use queue::NotificationQueue;
pub use roster::{Participant, ParticipantCount, ParticipantId, Roster};
pub use timers::TimerRegistry;
