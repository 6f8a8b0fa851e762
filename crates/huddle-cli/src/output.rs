//! JSON-lines effect output.
//!
//! Every effect the runtime produces becomes one [`EffectLine`]: a render
//! carries the visible notification list, device and navigation effects
//! carry their arguments. Timestamps are milliseconds since replay start.

use huddle_app::App;
use huddle_core::{ConferenceId, MediaType, Notification, TimeoutClass, Uid};
use serde::Serialize;

/// One line of replay output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EffectLine {
    /// Milliseconds since replay start.
    pub at_ms: u64,
    /// The effect itself.
    #[serde(flatten)]
    pub effect: OutputEffect,
}

/// Effect written to the output stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum OutputEffect {
    /// Visible state after a batch of changes.
    Render {
        /// Active conference.
        conference: Option<ConferenceId>,
        /// Visible notifications, oldest first.
        notifications: Vec<NotificationView>,
    },
    /// A local device was muted or unmuted.
    Muted {
        /// Device kind.
        media: MediaType,
        /// New state.
        muted: bool,
    },
    /// The session view was left.
    Navigated,
}

impl OutputEffect {
    /// Render effect for the current App state.
    #[must_use]
    pub fn render(app: &App) -> Self {
        Self::Render {
            conference: app.conference(),
            notifications: app.queue().iter().map(NotificationView::from).collect(),
        }
    }
}

/// What a frontend would draw for one notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationView {
    /// Notification uid.
    pub uid: Uid,
    /// Title text, or its translation key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Description text, or its translation key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Requested timeout class.
    pub timeout: TimeoutClass,
}

impl From<&Notification> for NotificationView {
    fn from(notification: &Notification) -> Self {
        let props = &notification.props;
        Self {
            uid: notification.uid.clone(),
            title: props.title.clone().or_else(|| props.title_key.clone()),
            description: props.description.clone().or_else(|| props.description_key.clone()),
            timeout: notification.timeout,
        }
    }
}
