//! Notifier configuration.
//!
//! Read-only settings supplied by the host application: the global enable
//! flag, allow/deny lists of notification keys, timeout overrides and the
//! join/leave batching parameters. Usually loaded from a TOML file.

use std::{path::Path, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{batch::BatchKind, error::ConfigError};

/// Participant count above which join notifications are suppressed.
pub const DEFAULT_JOIN_SILENCE_THRESHOLD: usize = 30;

/// Participant count above which leave notifications are suppressed.
pub const DEFAULT_LEAVE_SILENCE_THRESHOLD: usize = 30;

/// Quiet window for the join/leave debounce.
pub const DEFAULT_FLUSH_WINDOW: Duration = Duration::from_millis(2_000);

/// Optional overrides for timeout classes, in milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutOverrides {
    /// Override for [`crate::TimeoutClass::Short`].
    pub short: Option<u64>,
    /// Override for [`crate::TimeoutClass::Medium`].
    pub medium: Option<u64>,
    /// Override for [`crate::TimeoutClass::Long`].
    pub long: Option<u64>,
}

/// Notifier configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifierConfig {
    /// Initial value of the global enable flag.
    pub enabled: bool,
    /// Keys allowed to display. `None` allows every key.
    ///
    /// A notification's key is its title key, else its description key, else
    /// its device message id. With an allow-list set, a notification that has
    /// only literal text and no key is filtered out.
    pub allowed: Option<Vec<String>>,
    /// Keys that never display, checked after the allow-list.
    pub disabled: Vec<String>,
    /// Timeout class overrides.
    pub timeouts: TimeoutOverrides,
    /// Participant count above which join batches are discarded.
    pub join_silence_threshold: usize,
    /// Participant count above which leave batches are discarded.
    pub leave_silence_threshold: usize,
    /// Debounce window for join/leave batches, in milliseconds.
    pub flush_window_ms: u64,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            allowed: None,
            disabled: Vec::new(),
            timeouts: TimeoutOverrides::default(),
            join_silence_threshold: DEFAULT_JOIN_SILENCE_THRESHOLD,
            leave_silence_threshold: DEFAULT_LEAVE_SILENCE_THRESHOLD,
            flush_window_ms: DEFAULT_FLUSH_WINDOW.as_millis() as u64,
        }
    }
}

impl NotifierConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let input = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        Self::from_toml_str(&input)
    }

    /// Reject values the notifier cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.flush_window_ms == 0 {
            return Err(ConfigError::Invalid("flush_window_ms must be positive".into()));
        }

        let overrides = [
            ("short", self.timeouts.short),
            ("medium", self.timeouts.medium),
            ("long", self.timeouts.long),
        ];
        for (name, value) in overrides {
            if value == Some(0) {
                return Err(ConfigError::Invalid(format!(
                    "timeouts.{name} must be positive; use a sticky notification instead"
                )));
            }
        }

        Ok(())
    }

    /// Debounce window for join/leave batches.
    pub fn flush_window(&self) -> Duration {
        Duration::from_millis(self.flush_window_ms)
    }

    /// Silence threshold for the given batch kind.
    pub fn silence_threshold(&self, kind: BatchKind) -> usize {
        match kind {
            BatchKind::Joined => self.join_silence_threshold,
            BatchKind::Left => self.leave_silence_threshold,
        }
    }

    /// Whether the allow/deny lists admit a notification key.
    ///
    /// With an allow-list configured, a notification without a key is not
    /// admitted.
    pub fn admits(&self, key: Option<&str>) -> bool {
        let allowed = match (&self.allowed, key) {
            (None, _) => true,
            (Some(list), Some(key)) => list.iter().any(|k| k == key),
            (Some(_), None) => false,
        };

        allowed && !key.is_some_and(|key| self.disabled.iter().any(|k| k == key))
    }
}
