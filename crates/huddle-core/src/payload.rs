//! Structured device messages carried in a notification description.
//!
//! Remote participants and the session backend signal device control (pause,
//! resume), chat content, raised hands and the end of a consultation by
//! placing a JSON object in the notification's `description`. This module
//! parses that object and normalizes it into [`DisplayProps`].

use serde::Deserialize;

use crate::notification::DisplayProps;

/// Message id used when a device message omits one.
pub const DEFAULT_MESSAGE_ID: &str = "raise-hand";

/// Sender title used when a device message omits one.
pub const DEFAULT_TITLE: &str = "Participant";

/// Text shown when a consultation ends.
pub const CONSULTATION_ENDED_TEXT: &str = "Consulation phase has ended";

/// Text shown when the session is paused.
pub const SESSION_PAUSED_TEXT: &str = "Session is paused";

/// Text shown when the session is resumed.
pub const SESSION_RESUMED_TEXT: &str = "Session is resumed";

/// Text shown for raised hands and unrecognized message types.
pub const RAISED_HAND_TEXT: &str = "Raised a hand";

/// Kind of device message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeviceMessageType {
    /// Chat content to display verbatim.
    Message,
    /// The consultation is over; hiding the notice leaves the session.
    ConsultationEnded,
    /// Session paused; the local microphone is muted.
    PauseSession,
    /// Session resumed; the local microphone is unmuted.
    ResumeSession,
    /// Any other value.
    #[serde(other)]
    Other,
}

/// A structured device message.
///
/// Every field is optional and `null` reads the same as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeviceMessage {
    /// Message identifier.
    pub message_id: Option<String>,
    /// Display name of the sender.
    pub title: Option<String>,
    /// Kind of message.
    pub device_message_type: Option<DeviceMessageType>,
    /// Raw chat content, shown for [`DeviceMessageType::Message`].
    pub content: Option<String>,
    /// Already handled elsewhere; suppressed unless it ends the session.
    pub is_handled: Option<bool>,
    /// Role the message is addressed to.
    pub recipient_role: Option<String>,
    /// The sender raised a hand.
    pub raised_hand: Option<bool>,
}

impl DeviceMessage {
    /// Parse a description.
    ///
    /// Returns `Ok(None)` for plain text. A description that starts like a
    /// JSON object but fails to parse is an error.
    pub fn parse(description: &str) -> Result<Option<Self>, serde_json::Error> {
        let trimmed = description.trim_start();
        if !trimmed.starts_with('{') {
            return Ok(None);
        }
        serde_json::from_str(trimmed).map(Some)
    }

    /// Message id, or [`DEFAULT_MESSAGE_ID`].
    pub fn message_id(&self) -> &str {
        self.message_id.as_deref().unwrap_or(DEFAULT_MESSAGE_ID)
    }

    /// Sender title, or [`DEFAULT_TITLE`].
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or(DEFAULT_TITLE)
    }

    /// Requested microphone state. `None` if the message does not control it.
    pub fn is_mic_muted(&self) -> Option<bool> {
        match self.device_message_type {
            Some(DeviceMessageType::PauseSession) => Some(true),
            Some(DeviceMessageType::ResumeSession) => Some(false),
            _ => None,
        }
    }

    /// Whether the message ends the session.
    pub fn is_end_of_session(&self) -> bool {
        self.device_message_type == Some(DeviceMessageType::ConsultationEnded)
    }

    /// Whether the message may be displayed.
    ///
    /// Handled messages are suppressed unless they end the session, and a
    /// message must target a role, carry a raised hand, or end the session.
    pub fn is_eligible(&self) -> bool {
        let end = self.is_end_of_session();
        let fresh = !self.is_handled.unwrap_or(false) || end;
        let addressed = self.recipient_role.is_some() || self.raised_hand.unwrap_or(false) || end;
        fresh && addressed
    }

    /// Text that replaces the description.
    pub fn display_text(&self) -> String {
        match self.device_message_type {
            Some(DeviceMessageType::Message) => self.content.clone().unwrap_or_default(),
            Some(DeviceMessageType::ConsultationEnded) => CONSULTATION_ENDED_TEXT.to_owned(),
            Some(DeviceMessageType::PauseSession) => SESSION_PAUSED_TEXT.to_owned(),
            Some(DeviceMessageType::ResumeSession) => SESSION_RESUMED_TEXT.to_owned(),
            Some(DeviceMessageType::Other) | None => RAISED_HAND_TEXT.to_owned(),
        }
    }

    /// Write the normalized fields into `props`.
    pub fn apply_to(&self, props: &mut DisplayProps) {
        props.message_id = Some(self.message_id().to_owned());
        props.title = Some(self.title().to_owned());
        props.is_mic_muted = self.is_mic_muted();
        props.end_stream = self.is_end_of_session();
        props.description = Some(self.display_text());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> DeviceMessage {
        DeviceMessage::parse(json).unwrap().unwrap()
    }

    #[test]
    fn plain_text_is_not_a_device_message() {
        assert_eq!(DeviceMessage::parse("hello there").unwrap(), None);
        assert_eq!(DeviceMessage::parse("").unwrap(), None);
    }

    #[test]
    fn truncated_object_is_an_error() {
        assert!(DeviceMessage::parse(r#"{"deviceMessageType": "PAUSE"#).is_err());
    }

    #[test]
    fn wrong_field_type_is_an_error() {
        assert!(DeviceMessage::parse(r#"{"isHandled": "no"}"#).is_err());
    }

    #[test]
    fn null_flags_read_as_false() {
        let message = parse(r#"{"raisedHand":true,"isHandled":null}"#);
        assert!(message.is_eligible());

        let message = parse(r#"{"raisedHand":null,"recipientRole":null}"#);
        assert!(!message.is_eligible());
    }

    #[test]
    fn defaults_for_missing_fields() {
        let message = parse("{}");

        assert_eq!(message.message_id(), DEFAULT_MESSAGE_ID);
        assert_eq!(message.title(), DEFAULT_TITLE);
        assert_eq!(message.is_mic_muted(), None);
        assert_eq!(message.display_text(), RAISED_HAND_TEXT);
    }

    #[test]
    fn mic_state_from_message_type() {
        assert_eq!(parse(r#"{"deviceMessageType":"PAUSE_SESSION"}"#).is_mic_muted(), Some(true));
        assert_eq!(parse(r#"{"deviceMessageType":"RESUME_SESSION"}"#).is_mic_muted(), Some(false));
        assert_eq!(parse(r#"{"deviceMessageType":"MESSAGE"}"#).is_mic_muted(), None);
    }

    #[test]
    fn unknown_message_type_maps_to_other() {
        let message = parse(r#"{"deviceMessageType":"WAVE"}"#);

        assert_eq!(message.device_message_type, Some(DeviceMessageType::Other));
        assert_eq!(message.display_text(), RAISED_HAND_TEXT);
    }

    #[test]
    fn display_text_per_type() {
        let chat = parse(r#"{"deviceMessageType":"MESSAGE","content":"hi all"}"#);
        assert_eq!(chat.display_text(), "hi all");

        let ended = parse(r#"{"deviceMessageType":"CONSULTATION_ENDED"}"#);
        assert_eq!(ended.display_text(), CONSULTATION_ENDED_TEXT);

        let paused = parse(r#"{"deviceMessageType":"PAUSE_SESSION"}"#);
        assert_eq!(paused.display_text(), SESSION_PAUSED_TEXT);

        let resumed = parse(r#"{"deviceMessageType":"RESUME_SESSION"}"#);
        assert_eq!(resumed.display_text(), SESSION_RESUMED_TEXT);
    }

    #[test]
    fn eligibility() {
        // Unaddressed
        assert!(!parse("{}").is_eligible());
        // Addressed to a role
        assert!(parse(r#"{"recipientRole":"moderator"}"#).is_eligible());
        // Raised hand
        assert!(parse(r#"{"raisedHand":true}"#).is_eligible());
        // Handled and addressed
        assert!(!parse(r#"{"raisedHand":true,"isHandled":true}"#).is_eligible());
        // Handled end of session still shows
        assert!(parse(r#"{"deviceMessageType":"CONSULTATION_ENDED","isHandled":true}"#).is_eligible());
    }

    #[test]
    fn apply_to_normalizes_props() {
        let message = parse(
            r#"{"messageId":"m-1","title":"Dr. Ada","deviceMessageType":"CONSULTATION_ENDED"}"#,
        );
        let mut props = DisplayProps::default();
        message.apply_to(&mut props);

        assert_eq!(props.message_id.as_deref(), Some("m-1"));
        assert_eq!(props.title.as_deref(), Some("Dr. Ada"));
        assert_eq!(props.description.as_deref(), Some(CONSULTATION_ENDED_TEXT));
        assert_eq!(props.is_mic_muted, None);
        assert!(props.end_stream);
    }
}
