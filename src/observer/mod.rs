//! Observer contract for screens and view-models.
//!
//! A component that reacts to bus events implements
//! [`NotificationObserver`]: it registers its handlers in
//! [`setup_notification_observers`](NotificationObserver::setup_notification_observers)
//! and keeps the returned guards in a [`SubscriptionSet`]. Removal releases
//! that set, and so does dropping the component, so no registration can
//! outlive its owner.

pub mod achievements;
pub mod dashboard;
pub mod navigation;

use crate::domain::{EventBus, SubscriptionSet};

pub use achievements::{Achievement, AchievementFeed};
pub use dashboard::{DashboardModel, DashboardState};
pub use navigation::{NavigationModel, Screen};

/// Capability of components that subscribe to bus events.
pub trait NotificationObserver {
    /// Subscribes to the events this component cares about.
    ///
    /// Implementations should call
    /// [`remove_notification_observers`](Self::remove_notification_observers)
    /// first so repeated activation does not register handlers twice.
    fn setup_notification_observers(&mut self, bus: &EventBus);

    /// The guards owned by this component.
    fn subscriptions(&self) -> &SubscriptionSet;

    /// Mutable access to the guards owned by this component.
    fn subscriptions_mut(&mut self) -> &mut SubscriptionSet;

    /// Unsubscribes everything registered by
    /// [`setup_notification_observers`](Self::setup_notification_observers).
    fn remove_notification_observers(&mut self) {
        self.subscriptions_mut().clear();
    }

    /// Returns `true` while any handler is registered.
    fn is_observing(&self) -> bool {
        !self.subscriptions().is_empty()
    }
}
