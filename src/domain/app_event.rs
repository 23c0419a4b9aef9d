//! Domain events propagated to UI observers.
//!
//! [`EventKind`] is the closed set of event names observers subscribe to;
//! [`AppEvent`] is the message itself, with a typed payload per kind.
//! Events are transient: they are never persisted.

use std::fmt;
use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use super::WeightGoal;
use crate::error::TrackerError;

/// Subscription key identifying one kind of [`AppEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Request to show the quick-log sheet.
    OpenQuickLog,
    /// Request to show the charts screen.
    OpenCharts,
    /// Request to show the goals screen.
    OpenGoals,
    /// Request to show the settings screen.
    OpenSettings,
    /// Request to return to the main view.
    OpenMainView,
    /// Weight entries changed; views should refetch.
    WeightDataUpdated,
    /// The active goal changed or was cleared.
    GoalUpdated,
    /// Creating a goal failed.
    GoalCreationFailed,
    /// User settings changed.
    SettingsUpdated,
    /// A write to the store failed.
    DataSaveError,
    /// A progress threshold toward the active goal was crossed.
    GoalMilestoneReached,
    /// The user logged on a milestone number of consecutive days.
    StreakAchieved,
    /// The active goal was reached.
    WeightGoalCompleted,
}

impl EventKind {
    /// Every event kind, in declaration order.
    pub const ALL: [Self; 13] = [
        Self::OpenQuickLog,
        Self::OpenCharts,
        Self::OpenGoals,
        Self::OpenSettings,
        Self::OpenMainView,
        Self::WeightDataUpdated,
        Self::GoalUpdated,
        Self::GoalCreationFailed,
        Self::SettingsUpdated,
        Self::DataSaveError,
        Self::GoalMilestoneReached,
        Self::StreakAchieved,
        Self::WeightGoalCompleted,
    ];

    /// Returns the event name as a static string slice.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OpenQuickLog => "open_quick_log",
            Self::OpenCharts => "open_charts",
            Self::OpenGoals => "open_goals",
            Self::OpenSettings => "open_settings",
            Self::OpenMainView => "open_main_view",
            Self::WeightDataUpdated => "weight_data_updated",
            Self::GoalUpdated => "goal_updated",
            Self::GoalCreationFailed => "goal_creation_failed",
            Self::SettingsUpdated => "settings_updated",
            Self::DataSaveError => "data_save_error",
            Self::GoalMilestoneReached => "goal_milestone_reached",
            Self::StreakAchieved => "streak_achieved",
            Self::WeightGoalCompleted => "weight_goal_completed",
        }
    }

    /// Returns `true` for the screen navigation requests.
    #[must_use]
    pub const fn is_navigation(self) -> bool {
        matches!(
            self,
            Self::OpenQuickLog
                | Self::OpenCharts
                | Self::OpenGoals
                | Self::OpenSettings
                | Self::OpenMainView
        )
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque failure descriptor carried by error events.
///
/// Observers only render it; they never branch on its contents beyond the
/// optional numeric code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    /// Numeric code from [`TrackerError::error_code`], if the failure
    /// originated in this crate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<u32>,
    /// Human-readable description.
    pub message: String,
}

impl Failure {
    /// Creates a failure with a message and no code.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    /// Returns the failure message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "[{code}] {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl From<&TrackerError> for Failure {
    fn from(err: &TrackerError) -> Self {
        Self {
            code: Some(err.error_code()),
            message: err.to_string(),
        }
    }
}

impl From<TrackerError> for Failure {
    fn from(err: TrackerError) -> Self {
        Self::from(&err)
    }
}

impl From<&str> for Failure {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// A domain event with its payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AppEvent {
    /// See [`EventKind::OpenQuickLog`].
    OpenQuickLog,
    /// See [`EventKind::OpenCharts`].
    OpenCharts,
    /// See [`EventKind::OpenGoals`].
    OpenGoals,
    /// See [`EventKind::OpenSettings`].
    OpenSettings,
    /// See [`EventKind::OpenMainView`].
    OpenMainView,
    /// See [`EventKind::WeightDataUpdated`].
    WeightDataUpdated,
    /// See [`EventKind::GoalUpdated`].
    GoalUpdated {
        /// The current goal, or `None` when the goal was cleared.
        goal: Option<WeightGoal>,
    },
    /// See [`EventKind::GoalCreationFailed`].
    GoalCreationFailed {
        /// Why creation failed.
        error: Failure,
    },
    /// See [`EventKind::SettingsUpdated`].
    SettingsUpdated,
    /// See [`EventKind::DataSaveError`].
    DataSaveError {
        /// Why the save failed.
        error: Failure,
    },
    /// See [`EventKind::GoalMilestoneReached`].
    GoalMilestoneReached {
        /// Progress toward the goal in `[0, 1]`, clamped by the publisher.
        progress: f64,
        /// The goal the milestone belongs to.
        goal: WeightGoal,
    },
    /// See [`EventKind::StreakAchieved`].
    StreakAchieved {
        /// Consecutive days with at least one entry.
        days: NonZeroU32,
    },
    /// See [`EventKind::WeightGoalCompleted`].
    WeightGoalCompleted {
        /// The goal that was reached.
        goal: WeightGoal,
    },
}

impl AppEvent {
    /// Returns the subscription key for this event.
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::OpenQuickLog => EventKind::OpenQuickLog,
            Self::OpenCharts => EventKind::OpenCharts,
            Self::OpenGoals => EventKind::OpenGoals,
            Self::OpenSettings => EventKind::OpenSettings,
            Self::OpenMainView => EventKind::OpenMainView,
            Self::WeightDataUpdated => EventKind::WeightDataUpdated,
            Self::GoalUpdated { .. } => EventKind::GoalUpdated,
            Self::GoalCreationFailed { .. } => EventKind::GoalCreationFailed,
            Self::SettingsUpdated => EventKind::SettingsUpdated,
            Self::DataSaveError { .. } => EventKind::DataSaveError,
            Self::GoalMilestoneReached { .. } => EventKind::GoalMilestoneReached,
            Self::StreakAchieved { .. } => EventKind::StreakAchieved,
            Self::WeightGoalCompleted { .. } => EventKind::WeightGoalCompleted,
        }
    }

    /// Returns `true` if the event carries a payload.
    #[must_use]
    pub const fn has_payload(&self) -> bool {
        matches!(
            self,
            Self::GoalUpdated { .. }
                | Self::GoalCreationFailed { .. }
                | Self::DataSaveError { .. }
                | Self::GoalMilestoneReached { .. }
                | Self::StreakAchieved { .. }
                | Self::WeightGoalCompleted { .. }
        )
    }
}
