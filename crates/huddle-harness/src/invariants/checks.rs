//! Standard invariant checks.
//!
//! These invariants capture behavioral properties that must always hold.
//! They verify WHAT must be true, not specific test scenarios.

use std::collections::HashSet;

use super::{Invariant, InvariantResult, NotificationSnapshot, Violation};

/// Visible notifications are unique by uid.
///
/// Re-showing an existing uid must replace the entry, never duplicate it.
pub struct UniqueUids;

impl Invariant for UniqueUids {
    fn name(&self) -> &'static str {
        "UniqueUids"
    }

    fn check(&self, state: &NotificationSnapshot) -> InvariantResult {
        let mut seen = HashSet::new();
        for uid in state.uids() {
            if !seen.insert(uid) {
                return Err(Violation {
                    invariant: self.name(),
                    message: format!("uid {uid} visible more than once in {:?}", state.uids()),
                });
            }
        }
        Ok(())
    }
}

/// No notification outlives the conference it was created in.
///
/// Every visible notification was created either outside any conference or
/// in the active one. Ending a conference clears the queue, so anything else
/// is a leak from a previous session.
pub struct ConferenceConsistency;

impl Invariant for ConferenceConsistency {
    fn name(&self) -> &'static str {
        "ConferenceConsistency"
    }

    fn check(&self, state: &NotificationSnapshot) -> InvariantResult {
        let leaked = state.notifications.iter().find(|n| match n.conference {
            Some(created) => state.conference != Some(created),
            None => false,
        });

        match leaked {
            Some(n) => Err(Violation {
                invariant: self.name(),
                message: format!(
                    "notification {} from conference {:?} visible while active conference is {:?}",
                    n.uid, n.conference, state.conference
                ),
            }),
            None => Ok(()),
        }
    }
}

/// Every visible notification has a title or a description.
///
/// Empty payloads are rejected at show time and never reach the queue.
pub struct VisibleContent;

impl Invariant for VisibleContent {
    fn name(&self) -> &'static str {
        "VisibleContent"
    }

    fn check(&self, state: &NotificationSnapshot) -> InvariantResult {
        match state.notifications.iter().find(|n| n.title.is_none() && n.description.is_none()) {
            Some(n) => Err(Violation {
                invariant: self.name(),
                message: format!("notification {} has nothing to display", n.uid),
            }),
            None => Ok(()),
        }
    }
}
