//! Notification data model.
//!
//! A [`Notification`] is a uniquely identified display unit with an optional
//! auto-expiry. Its [`DisplayProps`] carry everything the rendering layer needs
//! (titles, translation keys and arguments, icon hints) plus the fields derived
//! from a structured device message that drive hide-time side effects.

use std::{collections::BTreeMap, time::Duration};

use serde::{Deserialize, Serialize};

use crate::config::TimeoutOverrides;

/// Notification identifier. Caller-supplied or derived from the wall clock.
pub type Uid = String;

/// Identifier of a conference session.
pub type ConferenceId = u64;

/// Built-in duration for [`TimeoutClass::Short`].
pub const DEFAULT_SHORT_TIMEOUT: Duration = Duration::from_millis(2_500);

/// Built-in duration for [`TimeoutClass::Medium`].
pub const DEFAULT_MEDIUM_TIMEOUT: Duration = Duration::from_millis(5_000);

/// Built-in duration for [`TimeoutClass::Long`].
pub const DEFAULT_LONG_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Coarse duration category mapped to a configurable millisecond value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeoutClass {
    /// Brief notices such as join/leave summaries.
    Short,
    /// Default for most informational notices.
    Medium,
    /// Messages the user should have time to read.
    Long,
    /// Never hidden automatically.
    Sticky,
    /// Hidden on the next timer pass; used for device-control signals.
    Instant,
}

impl TimeoutClass {
    /// Resolve to a concrete duration. `None` means never auto-hide.
    ///
    /// Configured overrides win over the built-in defaults for Short, Medium
    /// and Long. Sticky and Instant are not configurable.
    pub fn resolve(self, overrides: &TimeoutOverrides) -> Option<Duration> {
        match self {
            Self::Short => {
                Some(overrides.short.map_or(DEFAULT_SHORT_TIMEOUT, Duration::from_millis))
            },
            Self::Medium => {
                Some(overrides.medium.map_or(DEFAULT_MEDIUM_TIMEOUT, Duration::from_millis))
            },
            Self::Long => Some(overrides.long.map_or(DEFAULT_LONG_TIMEOUT, Duration::from_millis)),
            Self::Sticky => None,
            Self::Instant => Some(Duration::ZERO),
        }
    }
}

/// Structured display payload of a notification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DisplayProps {
    /// Caller-supplied identifier. Generated when absent.
    pub uid: Option<Uid>,
    /// Literal title text.
    pub title: Option<String>,
    /// Translation key for the title.
    pub title_key: Option<String>,
    /// Interpolation arguments for `title_key`.
    pub title_arguments: BTreeMap<String, String>,
    /// Literal description, or a JSON-encoded device message.
    pub description: Option<String>,
    /// Translation key for the description.
    pub description_key: Option<String>,
    /// Interpolation arguments for `description_key`.
    pub description_arguments: BTreeMap<String, String>,
    /// Icon hint for the rendering layer.
    pub icon: Option<String>,
    /// Styling hint for the rendering layer.
    pub appearance: Option<String>,
    /// Message identifier extracted from a device message.
    pub message_id: Option<String>,
    /// Microphone state requested by a device message. `None` if the message
    /// does not control the microphone.
    pub is_mic_muted: Option<bool>,
    /// Hiding this notification ends the session and triggers navigation.
    pub end_stream: bool,
}

impl DisplayProps {
    /// Props with only a title translation key.
    pub fn with_title_key(key: impl Into<String>) -> Self {
        Self { title_key: Some(key.into()), ..Self::default() }
    }

    /// Add a title interpolation argument.
    #[must_use]
    pub fn title_arg(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.title_arguments.insert(name.into(), value.into());
        self
    }

    /// True if there is nothing to display.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.title_key.is_none()
            && self.description.is_none()
            && self.description_key.is_none()
    }

    /// Key used by the allow/deny lists.
    ///
    /// Falls back from the title key to the description key to the device
    /// message id.
    pub fn key(&self) -> Option<&str> {
        self.title_key
            .as_deref()
            .or(self.description_key.as_deref())
            .or(self.message_id.as_deref())
    }
}

/// A queued notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Unique identifier within the queue.
    pub uid: Uid,
    /// Normalized display payload.
    pub props: DisplayProps,
    /// Requested timeout class.
    pub timeout: TimeoutClass,
    /// Concrete auto-hide delay. `None` for sticky notifications.
    pub resolved_timeout: Option<Duration>,
    /// Conference active when the notification was created.
    pub conference: Option<ConferenceId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_timeouts_without_overrides() {
        let overrides = TimeoutOverrides::default();

        assert_eq!(TimeoutClass::Short.resolve(&overrides), Some(DEFAULT_SHORT_TIMEOUT));
        assert_eq!(TimeoutClass::Medium.resolve(&overrides), Some(DEFAULT_MEDIUM_TIMEOUT));
        assert_eq!(TimeoutClass::Long.resolve(&overrides), Some(DEFAULT_LONG_TIMEOUT));
        assert_eq!(TimeoutClass::Sticky.resolve(&overrides), None);
        assert_eq!(TimeoutClass::Instant.resolve(&overrides), Some(Duration::ZERO));
    }

    #[test]
    fn overrides_replace_defaults() {
        let overrides = TimeoutOverrides { short: Some(1_000), medium: None, long: Some(60_000) };

        assert_eq!(TimeoutClass::Short.resolve(&overrides), Some(Duration::from_millis(1_000)));
        assert_eq!(TimeoutClass::Medium.resolve(&overrides), Some(DEFAULT_MEDIUM_TIMEOUT));
        assert_eq!(TimeoutClass::Long.resolve(&overrides), Some(Duration::from_secs(60)));
        assert_eq!(TimeoutClass::Sticky.resolve(&overrides), None);
    }

    #[test]
    fn empty_props_detected() {
        assert!(DisplayProps::default().is_empty());
        assert!(!DisplayProps::with_title_key("notify.raisedHand").is_empty());

        let icon_only = DisplayProps { icon: Some("hand".into()), ..DisplayProps::default() };
        assert!(icon_only.is_empty());
    }

    #[test]
    fn key_falls_back_to_message_id() {
        let props = DisplayProps { message_id: Some("raise-hand".into()), ..Default::default() };
        assert_eq!(props.key(), Some("raise-hand"));

        let props = DisplayProps {
            description_key: Some("notify.kicked".into()),
            message_id: Some("raise-hand".into()),
            ..Default::default()
        };
        assert_eq!(props.key(), Some("notify.kicked"));
    }

    #[test]
    fn props_deserialize_camel_case() {
        let props: DisplayProps = serde_json::from_str(
            r#"{"titleKey":"notify.moderator","titleArguments":{"name":"Ada"},"appearance":"normal"}"#,
        )
        .unwrap();

        assert_eq!(props.title_key.as_deref(), Some("notify.moderator"));
        assert_eq!(props.title_arguments.get("name").map(String::as_str), Some("Ada"));
        assert!(!props.end_stream);
    }
}
