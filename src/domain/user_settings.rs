//! Per-installation user preferences.

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::weight_entry::validate_weight;
use super::{SettingsId, WeightUnit};
use crate::error::TrackerError;

/// The singleton settings record. Exactly one lives in a store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSettings {
    /// Record identifier; stable for the lifetime of the installation.
    pub id: SettingsId,
    /// Unit used for display and as the default when logging.
    pub preferred_unit: WeightUnit,
    /// Optional long-term target weight, in [`Self::preferred_unit`].
    pub target_weight: Option<f64>,
    /// Whether reminder notifications are enabled.
    pub notifications_enabled: bool,
    /// Time of day for the weigh-in reminder.
    pub reminder_time: Option<NaiveTime>,
    /// Legacy flag from the removed health-data integration. Kept so old
    /// snapshots still load; never read.
    #[serde(default)]
    pub health_kit_enabled: bool,
    /// Record creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl UserSettings {
    /// Creates default settings with the given preferred unit.
    #[must_use]
    pub fn new(preferred_unit: WeightUnit) -> Self {
        let now = Utc::now();
        Self {
            id: SettingsId::new(),
            preferred_unit,
            target_weight: None,
            notifications_enabled: false,
            reminder_time: None,
            health_kit_enabled: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies a partial update.
    ///
    /// Switching [`Self::preferred_unit`] converts a stored target weight
    /// into the new unit unless the same patch sets the target.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::InvalidSettings`] if the new target weight is
    /// not a positive finite number. Settings are unchanged on error.
    pub fn apply(&mut self, update: &SettingsUpdate) -> Result<(), TrackerError> {
        if let Some(Some(target)) = update.target_weight {
            validate_weight(target)
                .map_err(|_| TrackerError::InvalidSettings(format!("target weight {target}")))?;
        }
        if let Some(unit) = update.preferred_unit {
            let previous = self.preferred_unit;
            if update.target_weight.is_none() && unit != previous {
                self.target_weight = self.target_weight.map(|t| previous.convert(t, unit));
            }
            self.preferred_unit = unit;
        }
        if let Some(target) = update.target_weight {
            self.target_weight = target;
        }
        if let Some(enabled) = update.notifications_enabled {
            self.notifications_enabled = enabled;
        }
        if let Some(time) = update.reminder_time {
            self.reminder_time = time;
        }
        self.updated_at = Utc::now();
        Ok(())
    }
}

impl Default for UserSettings {
    fn default() -> Self {
        Self::new(WeightUnit::default())
    }
}

/// Patch for [`UserSettings`]. `None` leaves a field untouched; for the
/// optional fields `Some(None)` clears the value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettingsUpdate {
    /// New preferred unit.
    pub preferred_unit: Option<WeightUnit>,
    /// New target weight, or `Some(None)` to clear it.
    pub target_weight: Option<Option<f64>>,
    /// Toggle reminder notifications.
    pub notifications_enabled: Option<bool>,
    /// New reminder time, or `Some(None)` to clear it.
    pub reminder_time: Option<Option<NaiveTime>>,
}
