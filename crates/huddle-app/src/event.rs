//! Application input events.
//!
//! This module defines [`AppEvent`], the inputs that drive the
//! [`crate::App`] state container.
//!
//! Events originate from two distinct sources:
//! - The host UI (dismiss clicks, the settings toggle, participant search).
//! - The conference backend (messages, device signals, membership changes).
//!
//! Events are serializable so scripted sessions can be replayed from JSON.

use huddle_core::{ConferenceId, DisplayProps, Participant, ParticipantId, TimeoutClass, Uid};
use serde::{Deserialize, Serialize};

/// Events processed by the App state container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AppEvent {
    /// Show a notification.
    Show {
        /// Display payload.
        #[serde(default)]
        props: DisplayProps,
        /// Requested timeout class. Defaults to long.
        #[serde(default)]
        timeout: Option<TimeoutClass>,
    },

    /// The user dismissed a notification.
    Dismiss {
        /// Target notification.
        uid: Uid,
    },

    /// The user cleared every notification.
    ClearAll,

    /// Joined a conference.
    ConferenceJoined {
        /// Conference identifier.
        conference: ConferenceId,
    },

    /// Left the active conference.
    ConferenceLeft,

    /// A participant joined the active conference.
    ParticipantJoined {
        /// The participant.
        participant: Participant,
    },

    /// A participant left the active conference.
    ParticipantLeft {
        /// Participant identifier.
        id: ParticipantId,
    },

    /// Notifications toggled in settings.
    SetEnabled {
        /// New flag value.
        enabled: bool,
    },

    /// Participant search query changed.
    Search {
        /// Query text. Empty shows everyone.
        query: String,
    },

    /// Periodic tick.
    Tick,

    /// Quit the application.
    Quit,
}
