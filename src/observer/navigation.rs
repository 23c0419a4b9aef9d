//! Screen routing driven by navigation requests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use super::NotificationObserver;
use crate::domain::{AppEvent, EventBus, EventKind, SubscriptionSet};
use crate::sync::lock_unpoisoned;

/// Top-level screens of the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Screen {
    /// Main view with the latest weight and goal.
    #[default]
    Main,
    /// Quick-log sheet.
    QuickLog,
    /// Progress charts.
    Charts,
    /// Goal management.
    Goals,
    /// Settings.
    Settings,
}

impl Screen {
    /// Maps a navigation event to its destination.
    #[must_use]
    pub const fn for_event(event: &AppEvent) -> Option<Self> {
        match event {
            AppEvent::OpenMainView => Some(Self::Main),
            AppEvent::OpenQuickLog => Some(Self::QuickLog),
            AppEvent::OpenCharts => Some(Self::Charts),
            AppEvent::OpenGoals => Some(Self::Goals),
            AppEvent::OpenSettings => Some(Self::Settings),
            _ => None,
        }
    }
}

/// Number of screens kept in [`NavigationModel::history`].
pub const HISTORY_LIMIT: usize = 32;

/// Tracks the presented screen and the most recent routes.
#[derive(Debug, Default)]
pub struct NavigationModel {
    history: Arc<Mutex<VecDeque<Screen>>>,
    subscriptions: SubscriptionSet,
}

impl NavigationModel {
    /// Creates a model showing [`Screen::Main`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The screen currently presented.
    #[must_use]
    pub fn current(&self) -> Screen {
        lock_unpoisoned(&self.history).back().copied().unwrap_or_default()
    }

    /// The last [`HISTORY_LIMIT`] screens presented, oldest first.
    #[must_use]
    pub fn history(&self) -> Vec<Screen> {
        lock_unpoisoned(&self.history).iter().copied().collect()
    }
}

impl NotificationObserver for NavigationModel {
    fn setup_notification_observers(&mut self, bus: &EventBus) {
        self.remove_notification_observers();
        for kind in EventKind::ALL.into_iter().filter(|k| k.is_navigation()) {
            let history = Arc::clone(&self.history);
            self.subscriptions.push(bus.subscribe(kind, move |event| {
                if let Some(screen) = Screen::for_event(event) {
                    tracing::debug!(?screen, "navigating");
                    let mut history = lock_unpoisoned(&history);
                    if history.len() == HISTORY_LIMIT {
                        history.pop_front();
                    }
                    history.push_back(screen);
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::UpdateNotifier;

    #[test]
    fn follows_navigation_requests() {
        let bus = EventBus::new(8);
        let mut nav = NavigationModel::new();
        assert_eq!(nav.current(), Screen::Main);
        nav.setup_notification_observers(&bus);
        assert_eq!(nav.subscriptions().len(), 5);

        let notifier = UpdateNotifier::new(bus);
        notifier.open_charts();
        notifier.open_settings();
        notifier.notify_settings_updated();
        notifier.open_main_view();

        assert_eq!(nav.current(), Screen::Main);
        assert_eq!(nav.history(), vec![Screen::Charts, Screen::Settings, Screen::Main]);
    }

    #[test]
    fn history_keeps_only_recent_screens() {
        let bus = EventBus::new(8);
        let mut nav = NavigationModel::new();
        nav.setup_notification_observers(&bus);
        let notifier = UpdateNotifier::new(bus);
        for _ in 0..HISTORY_LIMIT {
            notifier.open_charts();
        }
        notifier.open_goals();

        let history = nav.history();
        assert_eq!(history.len(), HISTORY_LIMIT);
        assert_eq!(history.last(), Some(&Screen::Goals));
        assert_eq!(nav.current(), Screen::Goals);
    }
}
