//! Error types for the notification core.
//!
//! The lifecycle itself is nearly total: empty payloads, unknown uids and
//! duplicate hides are silent no-ops. The only failure a caller sees from the
//! [`crate::Notifier`] is a structured description that does not parse.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors returned by [`crate::Notifier::handle`].
#[derive(Error, Debug)]
pub enum NotifierError {
    /// The payload's description looked like a structured device message
    /// but was not valid JSON for one.
    #[error("malformed notification description: {source}")]
    MalformedDescription {
        /// Underlying JSON error.
        #[from]
        source: serde_json::Error,
    },
}

/// Errors raised while loading or validating a [`crate::NotifierConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The configuration file is not valid TOML for the schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The configuration parsed but holds a value that cannot be used.
    #[error("invalid config: {0}")]
    Invalid(String),
}
