//! Tracker error types with numeric code mapping.
//!
//! [`TrackerError`] is the central error type for the crate. Each variant
//! maps to a stable numeric code so the UI layer can render failures
//! without matching on message text.

use crate::domain::{EntryId, GoalId};

/// Library-wide error enum.
///
/// # Error Code Ranges
///
/// | Range     | Category              |
/// |-----------|-----------------------|
/// | 1000–1999 | Validation            |
/// | 2000–2999 | Not Found             |
/// | 3000–3999 | Persistence / Internal|
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    /// Weight magnitude was zero, negative, or not finite.
    #[error("invalid weight: {0} (must be a positive finite number)")]
    InvalidWeight(f64),

    /// Unit string is not one of the supported units.
    #[error("unsupported unit: {0:?}")]
    UnsupportedUnit(String),

    /// Goal parameters are inconsistent.
    #[error("invalid goal: {0}")]
    InvalidGoal(String),

    /// Settings patch or record was rejected.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    /// Configuration value could not be used.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Weight entry with the given ID was not found.
    #[error("weight entry not found: {0}")]
    EntryNotFound(EntryId),

    /// Goal with the given ID was not found.
    #[error("goal not found: {0}")]
    GoalNotFound(GoalId),

    /// An operation needed a weight entry but none is logged yet.
    #[error("no weight entries recorded")]
    NoEntries,

    /// Persistence layer failure.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// Snapshot (de)serialization failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error (e.g. a poisoned lock).
    #[error("internal error: {0}")]
    Internal(String),
}

impl TrackerError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidWeight(_) => 1001,
            Self::UnsupportedUnit(_) => 1002,
            Self::InvalidGoal(_) => 1003,
            Self::InvalidSettings(_) => 1004,
            Self::InvalidConfig(_) => 1005,
            Self::EntryNotFound(_) => 2001,
            Self::GoalNotFound(_) => 2002,
            Self::NoEntries => 2003,
            Self::Persistence(_) => 3001,
            Self::Serialization(_) => 3002,
            Self::Internal(_) => 3000,
        }
    }

    /// Returns `true` if the error originated in the storage layer.
    ///
    /// Only these failures are re-broadcast as data-save errors; validation
    /// failures go back to the caller alone.
    #[must_use]
    pub const fn is_persistence(&self) -> bool {
        matches!(
            self,
            Self::Persistence(_) | Self::Serialization(_) | Self::Internal(_)
        )
    }
}
