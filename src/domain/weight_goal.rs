//! Weight goal with progress tracking.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::weight_entry::validate_weight;
use super::{GoalId, WeightUnit};
use crate::error::TrackerError;

/// A target weight the user wants to reach by a date.
///
/// Goals are never hard-deleted: completion or cancellation flips
/// [`Self::is_active`] to `false` so history can keep referencing them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightGoal {
    /// Unique goal identifier.
    pub id: GoalId,
    /// Weight to reach, in [`Self::unit`].
    pub target_weight: f64,
    /// Deadline for reaching the target.
    pub target_date: DateTime<Utc>,
    /// When the goal was set.
    pub start_date: DateTime<Utc>,
    /// Weight at the time the goal was set, in [`Self::unit`].
    pub start_weight: f64,
    /// Unit both goal weights are expressed in.
    pub unit: WeightUnit,
    /// Whether this is the user's current goal.
    pub is_active: bool,
    /// Number of progress milestones already announced for this goal.
    #[serde(default)]
    pub milestones_announced: u8,
    /// Record creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl WeightGoal {
    /// Creates a validated, active goal.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::InvalidWeight`] for a non-positive weight and
    /// [`TrackerError::InvalidGoal`] if the target equals the start weight
    /// or the target date is not after the start date.
    pub fn new(
        start_weight: f64,
        target_weight: f64,
        unit: WeightUnit,
        start_date: DateTime<Utc>,
        target_date: DateTime<Utc>,
    ) -> Result<Self, TrackerError> {
        validate_weight(start_weight)?;
        validate_weight(target_weight)?;
        if (start_weight - target_weight).abs() < f64::EPSILON {
            return Err(TrackerError::InvalidGoal(
                "target weight equals start weight".to_string(),
            ));
        }
        if target_date <= start_date {
            return Err(TrackerError::InvalidGoal(format!(
                "target date {target_date} is not after start date {start_date}"
            )));
        }
        let now = Utc::now();
        Ok(Self {
            id: GoalId::new(),
            target_weight,
            target_date,
            start_date,
            start_weight,
            unit,
            is_active: true,
            milestones_announced: 0,
            created_at: now,
            updated_at: now,
        })
    }

    /// Returns `true` if the goal is to lose weight.
    #[must_use]
    pub fn is_weight_loss(&self) -> bool {
        self.target_weight < self.start_weight
    }

    /// Fraction of the distance from start to target covered by
    /// `current_weight`, clamped to `[0, 1]`.
    ///
    /// Moving away from the target yields `0.0`; reaching or passing it
    /// yields `1.0`.
    #[must_use]
    pub fn progress(&self, current_weight: f64, current_unit: WeightUnit) -> f64 {
        let current = current_unit.convert(current_weight, self.unit);
        let total = self.start_weight - self.target_weight;
        if total.abs() < f64::EPSILON {
            return 1.0;
        }
        ((self.start_weight - current) / total).clamp(0.0, 1.0)
    }

    /// Raises the announced-milestone count to `reached`.
    ///
    /// Returns `true` if the count grew, meaning a new milestone should be
    /// announced.
    pub fn record_milestones(&mut self, reached: u8) -> bool {
        if reached > self.milestones_announced {
            self.milestones_announced = reached;
            self.updated_at = Utc::now();
            true
        } else {
            false
        }
    }

    /// Marks the goal inactive (completed or cancelled).
    pub fn deactivate(&mut self) {
        if self.is_active {
            self.is_active = false;
            self.updated_at = Utc::now();
        }
    }
}
