//! Searchable participant list.

use serde::{Deserialize, Serialize};

/// Participant identifier (endpoint id).
pub type ParticipantId = String;

/// Supplies the participant count of the active conference.
///
/// Read synchronously when a join/leave batch is flushed.
pub trait ParticipantCount {
    /// Current number of participants.
    fn participant_count(&self) -> usize;
}

impl ParticipantCount for usize {
    fn participant_count(&self) -> usize {
        *self
    }
}

/// A meeting participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Stable identifier.
    pub id: ParticipantId,
    /// Display name.
    pub name: String,
    /// Role in the meeting (e.g., "moderator"). `None` for regular members.
    #[serde(default)]
    pub role: Option<String>,
}

impl Participant {
    /// Create a participant without a role.
    pub fn new(id: impl Into<ParticipantId>, name: impl Into<String>) -> Self {
        Self { id: id.into(), name: name.into(), role: None }
    }
}

/// Participants of the active conference, in join order.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    participants: Vec<Participant>,
}

impl Roster {
    /// Create an empty roster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a participant, or update one with the same id in place.
    ///
    /// Returns the previous entry if this was an update.
    pub fn insert(&mut self, participant: Participant) -> Option<Participant> {
        match self.participants.iter_mut().find(|p| p.id == participant.id) {
            Some(existing) => Some(std::mem::replace(existing, participant)),
            None => {
                self.participants.push(participant);
                None
            },
        }
    }

    /// Remove the participant with `id`.
    pub fn remove(&mut self, id: &str) -> Option<Participant> {
        let pos = self.participants.iter().position(|p| p.id == id)?;
        Some(self.participants.remove(pos))
    }

    /// Participant with `id`.
    pub fn get(&self, id: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    /// Participants whose display name contains `query`, ignoring case.
    ///
    /// An empty or whitespace-only query matches everyone.
    pub fn search(&self, query: &str) -> Vec<&Participant> {
        let needle = query.trim().to_lowercase();
        self.participants.iter().filter(|p| p.name.to_lowercase().contains(&needle)).collect()
    }

    /// All participants in join order.
    pub fn iter(&self) -> impl Iterator<Item = &Participant> {
        self.participants.iter()
    }

    /// Remove everyone.
    pub fn clear(&mut self) {
        self.participants.clear();
    }

    /// Number of participants.
    pub fn len(&self) -> usize {
        self.participants.len()
    }

    /// Whether the roster is empty.
    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }
}

impl ParticipantCount for Roster {
    fn participant_count(&self) -> usize {
        self.len()
    }
}
