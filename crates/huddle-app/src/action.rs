//! Application side-effects and intents.
//!
//! This module defines the [`AppAction`] enum, which represents instructions
//! produced by the [`crate::App`] state container for the runtime to execute.

use huddle_core::NotifierEvent;

/// Actions produced by the App state container.
#[derive(Debug, Clone)]
pub enum AppAction {
    /// Render the UI.
    Render,

    /// Quit the application.
    Quit,

    /// Forward an event to the notifier.
    Notify(NotifierEvent),
}
