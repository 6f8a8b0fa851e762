//! Ordered notification queue keyed by uid.

use crate::notification::{ConferenceId, Notification};

/// Ordered sequence of notifications, unique by uid.
///
/// Insertion order is preserved. Re-inserting an existing uid replaces the
/// earlier entry and moves it to the back, so the latest show wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationQueue {
    entries: Vec<Notification>,
}

impl NotificationQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a notification, replacing any entry with the same uid.
    ///
    /// Returns the replaced entry.
    pub fn upsert(&mut self, notification: Notification) -> Option<Notification> {
        let replaced = self.remove(&notification.uid);
        self.entries.push(notification);
        replaced
    }

    /// Remove the entry with `uid`.
    pub fn remove(&mut self, uid: &str) -> Option<Notification> {
        let pos = self.entries.iter().position(|n| n.uid == uid)?;
        Some(self.entries.remove(pos))
    }

    /// Remove the entry with `uid` if it belongs to `conference`.
    ///
    /// An entry created outside any conference, or a hide issued outside any
    /// conference, always matches.
    pub fn hide(&mut self, uid: &str, conference: Option<ConferenceId>) -> Option<Notification> {
        let pos = self.entries.iter().position(|n| {
            n.uid == uid
                && match (n.conference, conference) {
                    (Some(created), Some(active)) => created == active,
                    _ => true,
                }
        })?;
        Some(self.entries.remove(pos))
    }

    /// Remove every entry. Returns how many were removed.
    pub fn clear(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        count
    }

    /// Entry with `uid`.
    pub fn get(&self, uid: &str) -> Option<&Notification> {
        self.entries.iter().find(|n| n.uid == uid)
    }

    /// Whether an entry with `uid` is queued.
    pub fn contains(&self, uid: &str) -> bool {
        self.get(uid).is_some()
    }

    /// Entries in display order.
    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.entries.iter()
    }

    /// Number of queued entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
