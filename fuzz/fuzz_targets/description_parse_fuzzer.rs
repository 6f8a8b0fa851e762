//! Fuzz target for notification description parsing
//!
//! Harden the structured device-message path against hostile descriptions
//!
//! # Strategy
//!
//! - Random text: Arbitrary strings, with and without a leading brace
//! - Structured: Well-formed device messages with fuzzed field values
//! - Type confusion: Known keys carrying values of the wrong JSON type
//! - Deep nesting: Objects nested to arbitrary depth under a known key
//!
//! # Invariants
//!
//! - Parsing NEVER panics
//! - Text not starting with `{` is plain text, never an error
//! - A show either fails with a malformed-description error or queues at
//!   most one notification
//! - A failed show leaves no hide timer behind

#![no_main]

use arbitrary::Arbitrary;
use huddle_core::{
    DeviceMessage, DisplayProps, Notifier, NotifierAction, NotifierConfig, NotifierEvent,
    ShowRequest, StoreEvent,
};
use huddle_harness::SimEnv;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Clone, Arbitrary)]
enum DescriptionAttack {
    RandomText { text: String },
    Structured { kind: u8, title: String, content: String, raised_hand: bool, role: u8 },
    TypeConfusion { key: u8, number: i64 },
    DeeplyNested { depth: u8 },
}

const KINDS: [&str; 6] =
    ["MESSAGE", "CONSULTATION_ENDED", "PAUSE_SESSION", "RESUME_SESSION", "RAISE_HAND", "UNKNOWN"];
const KEYS: [&str; 6] =
    ["deviceMessageType", "title", "content", "raisedHand", "recipientRole", "messageId"];

fn description(attack: &DescriptionAttack) -> String {
    match attack {
        DescriptionAttack::RandomText { text } => text.clone(),
        DescriptionAttack::Structured { kind, title, content, raised_hand, role } => {
            let role = if role % 2 == 0 { "patient" } else { "doctor" };
            serde_json::json!({
                "deviceMessageType": KINDS[*kind as usize % KINDS.len()],
                "title": title,
                "content": content,
                "raisedHand": raised_hand,
                "recipientRole": role,
            })
            .to_string()
        },
        DescriptionAttack::TypeConfusion { key, number } => {
            format!(r#"{{"{}": {number}}}"#, KEYS[*key as usize % KEYS.len()])
        },
        DescriptionAttack::DeeplyNested { depth } => {
            let depth = (*depth % 100) as usize;
            format!(r#"{{"content": {}0{}}}"#, "[".repeat(depth), "]".repeat(depth))
        },
    }
}

fuzz_target!(|attack: DescriptionAttack| {
    let text = description(&attack);

    let parsed = DeviceMessage::parse(&text);
    if !text.trim_start().starts_with('{') {
        assert!(matches!(parsed, Ok(None)), "plain text must not parse as a device message");
    }

    let mut notifier = Notifier::new(SimEnv::new(), NotifierConfig::default());
    let props = DisplayProps {
        uid: Some("fuzz".into()),
        title: Some("t".into()),
        description: Some(text),
        ..DisplayProps::default()
    };

    match notifier.handle(NotifierEvent::Show(ShowRequest::new(props))) {
        Ok(actions) => {
            let shown = actions
                .iter()
                .filter(|a| matches!(a, NotifierAction::Dispatch(StoreEvent::Show { .. })))
                .count();
            assert!(shown <= 1, "one show request queued {shown} notifications");
        },
        Err(_) => {
            assert!(parsed.is_err(), "show failed on a description that parses");
            assert_eq!(notifier.hide_timer_count(), 0, "failed show left a hide timer");
        },
    }
});
