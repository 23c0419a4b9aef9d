//! A single logged weight measurement.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{EntryId, WeightUnit};
use crate::error::TrackerError;

/// One weight reading taken by the user.
///
/// Created on a log action and otherwise immutable, except through
/// [`WeightEntry::amend`] for corrective edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightEntry {
    /// Unique entry identifier (immutable after creation).
    pub id: EntryId,
    /// Weight magnitude in [`Self::unit`]. Always positive and finite.
    pub weight: f64,
    /// When the measurement was taken.
    pub timestamp: DateTime<Utc>,
    /// Unit the weight was recorded in.
    pub unit: WeightUnit,
    /// Record creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl WeightEntry {
    /// Creates a validated entry.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::InvalidWeight`] if `weight` is not a positive
    /// finite number.
    pub fn new(
        weight: f64,
        unit: WeightUnit,
        timestamp: DateTime<Utc>,
    ) -> Result<Self, TrackerError> {
        validate_weight(weight)?;
        let now = Utc::now();
        Ok(Self {
            id: EntryId::new(),
            weight,
            timestamp,
            unit,
            created_at: now,
            updated_at: now,
        })
    }

    /// Applies a corrective edit. `id` and `created_at` are preserved.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::InvalidWeight`] if `weight` is invalid; the
    /// entry is left unchanged in that case.
    pub fn amend(
        &mut self,
        weight: f64,
        unit: WeightUnit,
        timestamp: DateTime<Utc>,
    ) -> Result<(), TrackerError> {
        validate_weight(weight)?;
        self.weight = weight;
        self.unit = unit;
        self.timestamp = timestamp;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Returns the weight converted into `unit`.
    #[must_use]
    pub fn weight_in(&self, unit: WeightUnit) -> f64 {
        self.unit.convert(self.weight, unit)
    }
}

/// Checks the positive-finite weight invariant.
pub(crate) fn validate_weight(weight: f64) -> Result<(), TrackerError> {
    if weight.is_finite() && weight > 0.0 {
        Ok(())
    } else {
        Err(TrackerError::InvalidWeight(weight))
    }
}
