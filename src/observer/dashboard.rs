//! Main-screen view-model.

use std::sync::{Arc, Mutex};

use super::NotificationObserver;
use crate::domain::{
    AppEvent, EventBus, EventKind, Failure, SubscriptionSet, WeightEntry, WeightGoal, WeightUnit,
};
use crate::persistence::WeightStore;
use crate::sync::lock_unpoisoned;

/// What the dashboard currently shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardState {
    /// Entries, oldest first.
    pub entries: Vec<WeightEntry>,
    /// The goal currently displayed, if any.
    pub active_goal: Option<WeightGoal>,
    /// Display unit.
    pub preferred_unit: WeightUnit,
    /// How many times entries were refetched.
    pub refresh_count: u64,
    /// Last save failure reported on the bus.
    pub last_error: Option<Failure>,
}

impl DashboardState {
    /// Most recent entry's weight in the display unit.
    #[must_use]
    pub fn latest_weight(&self) -> Option<f64> {
        self.entries
            .last()
            .map(|e| e.weight_in(self.preferred_unit))
    }
}

/// Headless model behind the main screen.
///
/// Refetches from the store whenever weight data or settings change and
/// tracks the active goal from goal updates.
#[derive(Debug)]
pub struct DashboardModel {
    store: Arc<dyn WeightStore>,
    state: Arc<Mutex<DashboardState>>,
    subscriptions: SubscriptionSet,
}

impl DashboardModel {
    /// Creates the model and loads the initial state from `store`.
    #[must_use]
    pub fn new(store: Arc<dyn WeightStore>) -> Self {
        let state = Arc::new(Mutex::new(DashboardState::default()));
        refresh_entries(store.as_ref(), &state);
        refresh_settings(store.as_ref(), &state);
        if let Ok(goal) = store.active_goal() {
            lock_unpoisoned(&state).active_goal = goal;
        }
        Self {
            store,
            state,
            subscriptions: SubscriptionSet::new(),
        }
    }

    /// Returns a copy of the current state.
    #[must_use]
    pub fn state(&self) -> DashboardState {
        lock_unpoisoned(&self.state).clone()
    }
}

fn refresh_entries(store: &dyn WeightStore, state: &Mutex<DashboardState>) {
    match store.entries() {
        Ok(entries) => {
            let mut state = lock_unpoisoned(state);
            state.entries = entries;
            state.refresh_count = state.refresh_count.saturating_add(1);
        }
        Err(e) => tracing::warn!(error = %e, "dashboard failed to refetch entries"),
    }
}

fn refresh_settings(store: &dyn WeightStore, state: &Mutex<DashboardState>) {
    match store.settings() {
        Ok(settings) => lock_unpoisoned(state).preferred_unit = settings.preferred_unit,
        Err(e) => tracing::warn!(error = %e, "dashboard failed to refetch settings"),
    }
}

impl NotificationObserver for DashboardModel {
    fn setup_notification_observers(&mut self, bus: &EventBus) {
        self.remove_notification_observers();

        let store = Arc::clone(&self.store);
        let state = Arc::clone(&self.state);
        self.subscriptions
            .push(bus.subscribe(EventKind::WeightDataUpdated, move |_| {
                refresh_entries(store.as_ref(), &state);
            }));

        let state = Arc::clone(&self.state);
        self.subscriptions
            .push(bus.subscribe(EventKind::GoalUpdated, move |event| {
                if let AppEvent::GoalUpdated { goal } = event {
                    lock_unpoisoned(&state).active_goal = goal.clone().filter(|g| g.is_active);
                }
            }));

        let store = Arc::clone(&self.store);
        let state = Arc::clone(&self.state);
        self.subscriptions
            .push(bus.subscribe(EventKind::SettingsUpdated, move |_| {
                refresh_settings(store.as_ref(), &state);
            }));

        let state = Arc::clone(&self.state);
        self.subscriptions
            .push(bus.subscribe(EventKind::DataSaveError, move |event| {
                if let AppEvent::DataSaveError { error } = event {
                    lock_unpoisoned(&state).last_error = Some(error.clone());
                }
            }));
    }

    fn subscriptions(&self) -> &SubscriptionSet {
        &self.subscriptions
    }

    fn subscriptions_mut(&mut self) -> &mut SubscriptionSet {
        &mut self.subscriptions
    }
}
