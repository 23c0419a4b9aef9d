//! Fixed catalogue of domain notifications.
//!
//! [`UpdateNotifier`] is the only component that builds [`AppEvent`]s for
//! the application. It exposes one method per event kind so callers can
//! never publish a malformed payload or an unknown event.

use std::num::NonZeroU32;

use crate::domain::{AppEvent, Delivery, EventBus, Failure, WeightGoal};

/// Publishes domain events on the shared [`EventBus`].
///
/// Constructed once by the composition root and cloned into the services
/// and screens that need it. Holds nothing but the bus handle.
#[derive(Debug, Clone)]
pub struct UpdateNotifier {
    bus: EventBus,
}

impl UpdateNotifier {
    /// Creates a notifier publishing on `bus`.
    #[must_use]
    pub fn new(bus: EventBus) -> Self {
        Self { bus }
    }

    /// Returns the underlying bus, for observers to subscribe on.
    #[must_use]
    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    fn emit(&self, event: AppEvent) -> Delivery {
        self.bus.publish(event)
    }

    /// Requests the quick-log sheet.
    pub fn open_quick_log(&self) -> Delivery {
        self.emit(AppEvent::OpenQuickLog)
    }

    /// Requests the charts screen.
    pub fn open_charts(&self) -> Delivery {
        self.emit(AppEvent::OpenCharts)
    }

    /// Requests the goals screen.
    pub fn open_goals(&self) -> Delivery {
        self.emit(AppEvent::OpenGoals)
    }

    /// Requests the settings screen.
    pub fn open_settings(&self) -> Delivery {
        self.emit(AppEvent::OpenSettings)
    }

    /// Requests a return to the main view.
    pub fn open_main_view(&self) -> Delivery {
        self.emit(AppEvent::OpenMainView)
    }

    /// Tells every view showing weight data to refetch.
    pub fn notify_weight_data_updated(&self) -> Delivery {
        self.emit(AppEvent::WeightDataUpdated)
    }

    /// Announces the current goal; `None` means the goal was cleared.
    pub fn notify_goal_updated(&self, goal: Option<&WeightGoal>) -> Delivery {
        self.emit(AppEvent::GoalUpdated {
            goal: goal.cloned(),
        })
    }

    /// Reports that a goal could not be created.
    pub fn notify_goal_creation_failed(&self, error: impl Into<Failure>) -> Delivery {
        let error = error.into();
        tracing::warn!(%error, "goal creation failed");
        self.emit(AppEvent::GoalCreationFailed { error })
    }

    /// Announces changed user settings.
    pub fn notify_settings_updated(&self) -> Delivery {
        self.emit(AppEvent::SettingsUpdated)
    }

    /// Reports a failed write to the store.
    pub fn notify_data_save_error(&self, error: impl Into<Failure>) -> Delivery {
        let error = error.into();
        tracing::warn!(%error, "data save failed");
        self.emit(AppEvent::DataSaveError { error })
    }

    /// Announces a progress milestone toward `goal`.
    ///
    /// `progress` must already be clamped to `[0, 1]`; it is forwarded
    /// unchecked.
    pub fn notify_goal_milestone_reached(&self, progress: f64, goal: &WeightGoal) -> Delivery {
        self.emit(AppEvent::GoalMilestoneReached {
            progress,
            goal: goal.clone(),
        })
    }

    /// Announces a logging streak of `days` consecutive days.
    pub fn notify_streak_achieved(&self, days: NonZeroU32) -> Delivery {
        self.emit(AppEvent::StreakAchieved { days })
    }

    /// Announces that `goal` was reached.
    pub fn notify_weight_goal_completed(&self, goal: &WeightGoal) -> Delivery {
        self.emit(AppEvent::WeightGoalCompleted { goal: goal.clone() })
    }
}
