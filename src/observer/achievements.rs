//! Feed of progress announcements shown as banners.

use std::num::NonZeroU32;
use std::sync::{Arc, Mutex};

use super::NotificationObserver;
use crate::domain::{AppEvent, EventBus, EventKind, Failure, GoalId, SubscriptionSet};
use crate::sync::lock_unpoisoned;

/// One banner-worthy item.
#[derive(Debug, Clone, PartialEq)]
pub enum Achievement {
    /// A progress threshold toward a goal was crossed.
    Milestone {
        /// Goal the progress belongs to.
        goal_id: GoalId,
        /// Progress in `[0, 1]`.
        progress: f64,
    },
    /// Consecutive logging days.
    Streak {
        /// Streak length.
        days: NonZeroU32,
    },
    /// A goal was reached.
    GoalCompleted {
        /// The completed goal.
        goal_id: GoalId,
    },
    /// Goal creation failed; shown as an error banner.
    GoalCreationFailed {
        /// Failure to render.
        error: Failure,
    },
}

/// Collects [`Achievement`]s from the bus in arrival order.
#[derive(Debug, Default)]
pub struct AchievementFeed {
    items: Arc<Mutex<Vec<Achievement>>>,
    subscriptions: SubscriptionSet,
}

impl AchievementFeed {
    /// Creates an empty feed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every item received so far.
    #[must_use]
    pub fn items(&self) -> Vec<Achievement> {
        lock_unpoisoned(&self.items).clone()
    }

    /// Removes and returns every item received so far.
    pub fn take(&self) -> Vec<Achievement> {
        std::mem::take(&mut *lock_unpoisoned(&self.items))
    }
}

fn to_achievement(event: &AppEvent) -> Option<Achievement> {
    match event {
        AppEvent::GoalMilestoneReached { progress, goal } => Some(Achievement::Milestone {
            goal_id: goal.id,
            progress: *progress,
        }),
        AppEvent::StreakAchieved { days } => Some(Achievement::Streak { days: *days }),
        AppEvent::WeightGoalCompleted { goal } => {
            Some(Achievement::GoalCompleted { goal_id: goal.id })
        }
        AppEvent::GoalCreationFailed { error } => Some(Achievement::GoalCreationFailed {
            error: error.clone(),
        }),
        _ => None,
    }
}

impl NotificationObserver for AchievementFeed {
    fn setup_notification_observers(&mut self, bus: &EventBus) {
        self.remove_notification_observers();
        for kind in [
            EventKind::GoalMilestoneReached,
            EventKind::StreakAchieved,
            EventKind::WeightGoalCompleted,
            EventKind::GoalCreationFailed,
        ] {
            let items = Arc::clone(&self.items);
            self.subscriptions.push(bus.subscribe(kind, move |event| {
                if let Some(item) = to_achievement(event) {
                    lock_unpoisoned(&items).push(item);
                }
            }));
        }
    }

    fn subscriptions(&self) -> &SubscriptionSet {
        &self.subscriptions
    }

    fn subscriptions_mut(&mut self) -> &mut SubscriptionSet {
        &mut self.subscriptions
    }
}
