//! Serialized store snapshot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{UserSettings, WeightEntry, WeightGoal};

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Full store contents as written to a snapshot file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    /// Format version, see [`SNAPSHOT_VERSION`].
    pub version: u32,
    /// When the snapshot was taken.
    pub taken_at: DateTime<Utc>,
    /// All weight entries, oldest first.
    pub entries: Vec<WeightEntry>,
    /// All goals, active and inactive.
    pub goals: Vec<WeightGoal>,
    /// The settings singleton.
    pub settings: UserSettings,
}
