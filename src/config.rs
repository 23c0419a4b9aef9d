//! Tracker configuration loaded from environment variables.
//!
//! All settings come from environment variables (or a `.env` file via
//! `dotenvy`). Every key is optional.

use std::path::PathBuf;

use crate::domain::WeightUnit;
use crate::domain::event_bus::DEFAULT_TAP_CAPACITY;
use crate::error::TrackerError;

/// Top-level tracker configuration.
///
/// Loaded once at startup via [`TrackerConfig::from_env`].
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerConfig {
    /// Snapshot file to load at startup and save on [`crate::app::TrackerApp::persist`].
    /// `None` keeps everything in memory.
    pub data_file: Option<PathBuf>,

    /// Unit for freshly created settings.
    pub default_unit: WeightUnit,

    /// Capacity of the event bus async tap.
    pub event_tap_capacity: usize,

    /// Whether the binary writes the snapshot back before exiting.
    pub autosave: bool,

    /// Log filter used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            data_file: None,
            default_unit: WeightUnit::Kilograms,
            event_tap_capacity: DEFAULT_TAP_CAPACITY,
            autosave: true,
            log_filter: "info".to_string(),
        }
    }
}

impl TrackerConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to defaults when a variable is not set.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::InvalidConfig`] if `TRACKER_DEFAULT_UNIT` is
    /// set to an unsupported unit.
    pub fn from_env() -> Result<Self, TrackerError> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        let data_file = std::env::var("TRACKER_DATA_FILE")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        let default_unit = match std::env::var("TRACKER_DEFAULT_UNIT") {
            Ok(raw) => raw
                .parse::<WeightUnit>()
                .map_err(|e| TrackerError::InvalidConfig(format!("TRACKER_DEFAULT_UNIT: {e}")))?,
            Err(_) => defaults.default_unit,
        };

        let event_tap_capacity =
            parse_env("TRACKER_EVENT_TAP_CAPACITY", defaults.event_tap_capacity);
        let autosave = parse_env_bool("TRACKER_AUTOSAVE", defaults.autosave);
        let log_filter = std::env::var("TRACKER_LOG").unwrap_or(defaults.log_filter);

        Ok(Self {
            data_file,
            default_unit,
            event_tap_capacity,
            autosave,
            log_filter,
        })
    }
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Parses an environment variable as a boolean. Accepts `"true"`, `"1"`,
/// `"false"`, `"0"` (case-insensitive). Returns `default` otherwise.
fn parse_env_bool(key: &str, default: bool) -> bool {
    match std::env::var(key).ok().map(|v| v.to_ascii_lowercase()).as_deref() {
        Some("true" | "1") => true,
        Some("false" | "0") => false,
        _ => default,
    }
}
