//! Error types for session replay.

use std::{io, path::PathBuf};

use huddle_core::ConfigError;
use thiserror::Error;

/// Errors raised by the CLI and its [`crate::ScriptDriver`].
#[derive(Error, Debug)]
pub enum CliError {
    /// Notifier configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The session script could not be opened.
    #[error("failed to open script {path}: {source}")]
    OpenScript {
        /// Script path as given on the command line.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Reading the next script line failed.
    #[error("failed to read script: {0}")]
    ReadScript(#[source] io::Error),

    /// A script line is not a valid step.
    #[error("script line {line}: {source}")]
    InvalidStep {
        /// One-based line number.
        line: usize,
        /// Underlying JSON error.
        source: serde_json::Error,
    },

    /// An effect could not be written to the output stream.
    #[error("failed to write output: {0}")]
    Output(#[source] io::Error),

    /// An effect could not be encoded.
    #[error("failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),
}
