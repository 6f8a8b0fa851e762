//! Application state container.
//!
//! This module defines [`App`], which owns the state the UI renders: the
//! notification queue, the participant roster, the settings flag and the
//! active conference. It is completely decoupled from I/O and timing.
//!
//! The container has two inputs:
//!
//! - [`App::handle`] consumes [`AppEvent`]s and produces [`AppAction`]s,
//!   translating host events into notifier events.
//! - [`App::apply`] applies the [`StoreEvent`]s the notifier dispatches. This
//!   is the only way the queue changes.

use huddle_core::{
    ConferenceId, NotificationQueue, NotifierEvent, Participant, Roster, ShowRequest, StoreEvent,
};

use crate::{AppAction, AppEvent};

/// Application state container.
///
/// Pure state machine that processes events and produces actions.
/// No I/O dependencies - fully testable in simulation.
#[derive(Debug, Clone)]
pub struct App {
    /// Visible notifications, in display order.
    queue: NotificationQueue,
    /// Participants of the active conference.
    roster: Roster,
    /// Mirror of the notifier's global enable flag.
    notifications_enabled: bool,
    /// Active conference. `None` between conferences.
    conference: Option<ConferenceId>,
    /// Participant search query.
    search_query: String,
}

impl App {
    /// Create an empty App.
    pub fn new(notifications_enabled: bool) -> Self {
        Self {
            queue: NotificationQueue::new(),
            roster: Roster::new(),
            notifications_enabled,
            conference: None,
            search_query: String::new(),
        }
    }

    /// Process an event and return actions.
    pub fn handle(&mut self, event: AppEvent) -> Vec<AppAction> {
        match event {
            AppEvent::Tick => vec![],
            AppEvent::Quit => vec![AppAction::Quit],
            AppEvent::Show { props, timeout } => {
                vec![AppAction::Notify(NotifierEvent::Show(ShowRequest { props, timeout }))]
            },
            AppEvent::Dismiss { uid } => {
                let snapshot = self.queue.get(&uid).cloned();
                vec![AppAction::Notify(NotifierEvent::Hide { uid, snapshot })]
            },
            AppEvent::ClearAll => vec![AppAction::Notify(NotifierEvent::Clear)],
            AppEvent::SetEnabled { enabled } => {
                vec![AppAction::Notify(NotifierEvent::SetEnabled(enabled))]
            },
            AppEvent::ConferenceJoined { conference } => self.join_conference(conference),
            AppEvent::ConferenceLeft => self.leave_conference(),
            AppEvent::ParticipantJoined { participant } => self.participant_joined(participant),
            AppEvent::ParticipantLeft { id } => match self.roster.remove(&id) {
                Some(participant) => vec![
                    AppAction::Notify(NotifierEvent::ParticipantLeft { name: participant.name }),
                    AppAction::Render,
                ],
                None => vec![],
            },
            AppEvent::Search { query } => {
                self.search_query = query;
                vec![AppAction::Render]
            },
        }
    }

    /// Apply a notifier dispatch.
    ///
    /// Returns `true` if visible state changed.
    pub fn apply(&mut self, event: StoreEvent) -> bool {
        match event {
            StoreEvent::Show { notification } => {
                self.queue.upsert(notification);
                true
            },
            StoreEvent::Hide { uid, conference } => self.queue.hide(&uid, conference).is_some(),
            StoreEvent::Clear => self.queue.clear() > 0,
            StoreEvent::ConfigSet { enabled } => {
                let changed = self.notifications_enabled != enabled;
                self.notifications_enabled = enabled;
                changed
            },
        }
    }

    fn join_conference(&mut self, conference: ConferenceId) -> Vec<AppAction> {
        if self.conference == Some(conference) {
            return vec![];
        }

        // Switching directly ends the previous conference first
        let mut actions = self.leave_conference();
        actions.retain(|a| !matches!(a, AppAction::Render));

        self.conference = Some(conference);
        actions.push(AppAction::Notify(NotifierEvent::ConferenceChanged(Some(conference))));
        actions.push(AppAction::Render);
        actions
    }

    fn leave_conference(&mut self) -> Vec<AppAction> {
        if self.conference.take().is_none() {
            return vec![];
        }

        self.roster.clear();
        self.search_query.clear();
        vec![AppAction::Notify(NotifierEvent::ConferenceChanged(None)), AppAction::Render]
    }

    fn participant_joined(&mut self, participant: Participant) -> Vec<AppAction> {
        let name = participant.name.clone();
        match self.roster.insert(participant) {
            // Renames and role changes are not joins
            Some(_) => vec![AppAction::Render],
            None => {
                vec![AppAction::Notify(NotifierEvent::ParticipantJoined { name }), AppAction::Render]
            },
        }
    }

    /// Visible notifications.
    pub fn queue(&self) -> &NotificationQueue {
        &self.queue
    }

    /// Participants of the active conference.
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Whether notifications are enabled.
    pub fn notifications_enabled(&self) -> bool {
        self.notifications_enabled
    }

    /// Active conference.
    pub fn conference(&self) -> Option<ConferenceId> {
        self.conference
    }

    /// Current participant search query.
    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    /// Participants matching the search query.
    pub fn search_results(&self) -> Vec<&Participant> {
        self.roster.search(&self.search_query)
    }
}
