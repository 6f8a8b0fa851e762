//! Application layer for Huddle
//!
//! A state container and generic runtime around the notification core,
//! enabling deterministic simulation testing with the same code that runs in
//! production.
//!
//! # Components
//!
//! - [`App`]: state container (queue, roster, settings, active conference)
//! - [`Driver`]: Trait for platform-specific I/O abstraction
//! - [`Runtime`]: Generic orchestration loop using Driver

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod action;
mod app;
mod driver;
mod event;
mod runtime;

pub use action::AppAction;
pub use app::App;
pub use driver::Driver;
pub use event::AppEvent;
pub use runtime::Runtime;
