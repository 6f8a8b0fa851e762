//! Huddle session replay.
//!
//! Drives the production [`huddle_app::Runtime`] from a JSON-lines session
//! script on the real clock and writes every effect (renders, device
//! changes, navigation) to an output stream as JSON lines.
//!
//! # Script format
//!
//! One step per line. Blank lines and lines starting with `#` are skipped.
//!
//! ```text
//! {"delay_ms": 0, "event": {"type": "conference_joined", "conference": 1}}
//! {"delay_ms": 250, "event": {"type": "show", "props": {"title": "Hello"}, "timeout": "short"}}
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod driver;
pub mod error;
pub mod output;
pub mod system_env;

pub use driver::{ScriptDriver, ScriptStep, open_script};
pub use error::CliError;
pub use output::{EffectLine, NotificationView, OutputEffect};
pub use system_env::SystemEnv;
