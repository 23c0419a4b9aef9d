//! Subscription handles and scoped cleanup.
//!
//! [`EventBus::subscribe`](super::EventBus::subscribe) returns a
//! [`Subscription`] guard; dropping the guard removes the registration.
//! Observers that register several handlers keep them in a
//! [`SubscriptionSet`].

use std::fmt;
use std::sync::Weak;

use super::event_bus::BusInner;
use super::EventKind;

/// Raw identifier of a bus registration.
///
/// Unique for the lifetime of the bus that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub(crate) u64);

impl SubscriptionId {
    /// Returns the numeric value of the identifier.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// Guard for one bus registration. Dropping it unsubscribes.
///
/// Holds only a weak reference to the bus, so a guard that outlives its bus
/// is harmless.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: SubscriptionId,
    kind: EventKind,
    bus: Option<Weak<BusInner>>,
}

impl Subscription {
    pub(crate) fn new(id: SubscriptionId, kind: EventKind, bus: Weak<BusInner>) -> Self {
        Self {
            id,
            kind,
            bus: Some(bus),
        }
    }

    /// Returns the registration identifier.
    #[must_use]
    pub const fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Returns the event kind this registration listens to.
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        self.kind
    }

    /// Releases the guard without unsubscribing.
    ///
    /// The registration then lives until
    /// [`EventBus::unsubscribe`](super::EventBus::unsubscribe) is called with
    /// the returned ID, or until the bus is dropped.
    #[must_use = "the returned id is the only way to unsubscribe a detached handler"]
    pub fn detach(mut self) -> SubscriptionId {
        self.bus = None;
        self.id
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(bus) = self.bus.take().and_then(|weak| weak.upgrade()) {
            bus.remove(self.id);
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("attached", &self.bus.is_some())
            .finish()
    }
}

/// Owned collection of [`Subscription`] guards released together.
#[derive(Debug, Default)]
pub struct SubscriptionSet {
    subscriptions: Vec<Subscription>,
}

impl SubscriptionSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes ownership of a guard.
    pub fn push(&mut self, subscription: Subscription) {
        self.subscriptions.push(subscription);
    }

    /// Unsubscribes everything held by the set.
    pub fn clear(&mut self) {
        self.subscriptions.clear();
    }

    /// Returns the number of held subscriptions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    /// Returns `true` if the set holds no subscriptions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Returns `true` if any held subscription listens to `kind`.
    #[must_use]
    pub fn listens_to(&self, kind: EventKind) -> bool {
        self.subscriptions.iter().any(|s| s.kind() == kind)
    }
}

impl Extend<Subscription> for SubscriptionSet {
    fn extend<I: IntoIterator<Item = Subscription>>(&mut self, iter: I) {
        self.subscriptions.extend(iter);
    }
}

impl FromIterator<Subscription> for SubscriptionSet {
    fn from_iter<I: IntoIterator<Item = Subscription>>(iter: I) -> Self {
        Self {
            subscriptions: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::EventBus;

    #[test]
    fn dropping_guard_unsubscribes() {
        let bus = EventBus::new(8);
        let sub = bus.subscribe(EventKind::SettingsUpdated, |_| {});
        assert_eq!(bus.subscriber_count(EventKind::SettingsUpdated), 1);
        drop(sub);
        assert_eq!(bus.subscriber_count(EventKind::SettingsUpdated), 0);
    }

    #[test]
    fn detached_registration_survives_until_unsubscribed() {
        let bus = EventBus::new(8);
        let id = bus.subscribe(EventKind::OpenCharts, |_| {}).detach();
        assert_eq!(bus.subscriber_count(EventKind::OpenCharts), 1);
        assert!(bus.unsubscribe(id));
        assert_eq!(bus.subscriber_count(EventKind::OpenCharts), 0);
    }

    #[test]
    fn guard_outliving_bus_is_harmless() {
        let bus = EventBus::new(8);
        let sub = bus.subscribe(EventKind::OpenGoals, |_| {});
        drop(bus);
        drop(sub);
    }

    #[test]
    fn set_releases_all_on_clear() {
        let bus = EventBus::new(8);
        let mut set: SubscriptionSet = [EventKind::GoalUpdated, EventKind::StreakAchieved]
            .into_iter()
            .map(|kind| bus.subscribe(kind, |_| {}))
            .collect();
        set.push(bus.subscribe(EventKind::GoalUpdated, |_| {}));
        assert_eq!(set.len(), 3);
        assert!(set.listens_to(EventKind::StreakAchieved));
        assert_eq!(bus.len(), 3);
        set.clear();
        assert!(set.is_empty());
        assert!(bus.is_empty());
    }

    #[test]
    fn display_format() {
        assert_eq!(SubscriptionId(7).to_string(), "sub-7");
    }
}
