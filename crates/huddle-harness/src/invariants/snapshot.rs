//! Observable state snapshots for invariant checking.
//!
//! Snapshots capture what the host would render at a point in time.
//! Invariants operate on snapshots rather than live state to ensure
//! consistent, atomic checks.

use huddle_app::App;
use huddle_core::{ConferenceId, Notification, TimeoutClass, Uid};
use serde::Serialize;

/// Snapshot of the rendered application state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NotificationSnapshot {
    /// Active conference.
    pub conference: Option<ConferenceId>,
    /// Global enable flag.
    pub notifications_enabled: bool,
    /// Participants in the roster.
    pub participants: usize,
    /// Visible notifications in display order.
    pub notifications: Vec<NotificationEntry>,
}

impl NotificationSnapshot {
    /// Capture the observable state of `app`.
    pub fn from_app(app: &App) -> Self {
        Self {
            conference: app.conference(),
            notifications_enabled: app.notifications_enabled(),
            participants: app.roster().len(),
            notifications: app.queue().iter().map(NotificationEntry::from).collect(),
        }
    }

    /// Uids in display order.
    pub fn uids(&self) -> Vec<&str> {
        self.notifications.iter().map(|n| n.uid.as_str()).collect()
    }
}

/// One visible notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationEntry {
    /// Queue identifier.
    pub uid: Uid,
    /// Literal or localization-key title.
    pub title: Option<String>,
    /// Body text or localization key.
    pub description: Option<String>,
    /// Timeout class.
    pub timeout: TimeoutClass,
    /// Conference the notification was created in.
    pub conference: Option<ConferenceId>,
}

impl From<&Notification> for NotificationEntry {
    fn from(n: &Notification) -> Self {
        Self {
            uid: n.uid.clone(),
            title: n.props.title.clone().or_else(|| n.props.title_key.clone()),
            description: n.props.description.clone().or_else(|| n.props.description_key.clone()),
            timeout: n.timeout,
            conference: n.conference,
        }
    }
}
