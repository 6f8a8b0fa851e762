//! Join/leave batching.
//!
//! Participant joins and departures arrive in bursts (bulk invites, a room
//! emptying at the end of a call). Names are buffered per [`BatchKind`] and
//! turned into a single templated notification once the burst goes quiet.

use serde::{Deserialize, Serialize};

use crate::notification::DisplayProps;

/// Which batch buffer a name belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchKind {
    /// Participants that joined.
    Joined,
    /// Participants that left.
    Left,
}

impl BatchKind {
    /// Title keys for one, two and three-or-more names.
    fn title_keys(self) -> [&'static str; 3] {
        match self {
            Self::Joined => [
                "notify.connectedOneMember",
                "notify.connectedTwoMembers",
                "notify.connectedThreePlusMembers",
            ],
            Self::Left => {
                ["notify.leftOneMember", "notify.leftTwoMembers", "notify.leftThreePlusMembers"]
            },
        }
    }

    /// Build the notification props for a flushed batch.
    ///
    /// Returns `None` for an empty batch.
    pub fn props_for(self, names: &[String]) -> Option<DisplayProps> {
        let [one, two, many] = self.title_keys();
        let props = match names {
            [] => return None,
            [name] => DisplayProps::with_title_key(one).title_arg("name", name.as_str()),
            [first, second] => DisplayProps::with_title_key(two)
                .title_arg("first", first.as_str())
                .title_arg("second", second.as_str()),
            [first, rest @ ..] => DisplayProps::with_title_key(many)
                .title_arg("name", first.as_str())
                .title_arg("count", rest.len().to_string()),
        };
        Some(props)
    }
}

/// Names accumulated between flushes.
///
/// Names are appended and drained together; individual names are never
/// removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchBuffer {
    names: Vec<String>,
}

impl BatchBuffer {
    /// Append a name.
    pub fn push(&mut self, name: impl Into<String>) {
        self.names.push(name.into());
    }

    /// Drain every name, leaving the buffer empty.
    pub fn take(&mut self) -> Vec<String> {
        std::mem::take(&mut self.names)
    }

    /// Buffered names in arrival order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of buffered names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
