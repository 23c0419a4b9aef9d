//! In-process publish/subscribe channel for domain events.
//!
//! [`EventBus`] keeps an ordered table of handler registrations keyed by
//! [`EventKind`]. [`EventBus::publish`] fans an [`AppEvent`] out to the
//! matching handlers synchronously, on the caller's thread, in
//! registration order. A panicking handler is isolated: it is logged and
//! delivery continues with the next one.
//!
//! Every published event is also mirrored into a [`tokio::sync::broadcast`]
//! channel so async consumers can follow the stream via [`EventBus::tap`].

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::broadcast;

use super::subscription::{Subscription, SubscriptionId};
use super::{AppEvent, EventKind};
use crate::sync::lock_unpoisoned;

/// Default capacity of the async tap channel.
pub const DEFAULT_TAP_CAPACITY: usize = 256;

type Handler = dyn Fn(&AppEvent) + Send + Sync;

struct Registration {
    id: SubscriptionId,
    kind: EventKind,
    /// Cleared on unsubscribe so an in-flight publish skips the handler.
    active: AtomicBool,
    handler: Box<Handler>,
}

impl Registration {
    fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }
}

pub(crate) struct BusInner {
    next_id: AtomicU64,
    registrations: Mutex<Vec<Arc<Registration>>>,
    tap: broadcast::Sender<AppEvent>,
}

impl BusInner {
    fn table(&self) -> MutexGuard<'_, Vec<Arc<Registration>>> {
        // Handlers never run under this lock; a poisoned table is still valid.
        lock_unpoisoned(&self.registrations)
    }

    /// Snapshot of the live registrations for `kind`, in registration order.
    fn matching(&self, kind: EventKind) -> Vec<Arc<Registration>> {
        self.table()
            .iter()
            .filter(|r| r.kind == kind)
            .map(Arc::clone)
            .collect()
    }

    pub(crate) fn remove(&self, id: SubscriptionId) -> bool {
        // The handler may own guards of its own; drop it outside the lock.
        let registration = {
            let mut table = self.table();
            let Some(pos) = table.iter().position(|r| r.id == id) else {
                return false;
            };
            table.remove(pos)
        };
        registration.active.store(false, Ordering::Release);
        tracing::trace!(subscription = %id, event = %registration.kind, "unsubscribed");
        true
    }
}

/// Outcome of a single [`EventBus::publish`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Delivery {
    /// Handlers that ran to completion.
    pub delivered: usize,
    /// Handlers that panicked and were skipped over.
    pub failed: usize,
}

impl Delivery {
    /// Total number of handlers invoked.
    #[must_use]
    pub const fn attempted(&self) -> usize {
        self.delivered.saturating_add(self.failed)
    }
}

/// Synchronous fan-out bus for [`AppEvent`]s.
///
/// Cloning is cheap and every clone shares the same registration table.
/// The bus is meant to be built once by the composition root and handed to
/// whoever needs it.
///
/// # Concurrency
///
/// - The registration table is guarded by a mutex.
/// - `publish` snapshots the matching registrations and releases the lock
///   before running handlers, so handlers may subscribe, unsubscribe
///   (themselves included) or publish again without deadlocking.
/// - A registration removed while a publish is in flight is not invoked
///   once the publish reaches it.
#[derive(Clone)]
pub struct EventBus {
    inner: Arc<BusInner>,
}

impl EventBus {
    /// Creates a bus whose async tap buffers up to `tap_capacity` events.
    ///
    /// A capacity of zero is raised to one.
    #[must_use]
    pub fn new(tap_capacity: usize) -> Self {
        let (tap, _) = broadcast::channel(tap_capacity.max(1));
        Self {
            inner: Arc::new(BusInner {
                next_id: AtomicU64::new(1),
                registrations: Mutex::new(Vec::new()),
                tap,
            }),
        }
    }

    /// Registers `handler` for events of `kind`.
    ///
    /// Registrations are independent: subscribing the same handler twice
    /// makes it fire twice. The returned guard unsubscribes on drop.
    pub fn subscribe<F>(&self, kind: EventKind, handler: F) -> Subscription
    where
        F: Fn(&AppEvent) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        let registration = Arc::new(Registration {
            id,
            kind,
            active: AtomicBool::new(true),
            handler: Box::new(handler),
        });
        self.inner.table().push(registration);
        tracing::trace!(subscription = %id, event = %kind, "subscribed");
        Subscription::new(id, kind, Arc::downgrade(&self.inner))
    }

    /// Removes exactly one registration.
    ///
    /// Returns `false` (and does nothing else) if `id` is unknown or was
    /// already removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.remove(id)
    }

    /// Delivers `event` to every handler registered for its kind.
    ///
    /// Publishing with no subscribers is not an error. Handler panics are
    /// caught, logged and counted in [`Delivery::failed`]; they never reach
    /// the publisher.
    pub fn publish(&self, event: AppEvent) -> Delivery {
        let kind = event.kind();
        let mut delivery = Delivery::default();

        for registration in self.inner.matching(kind) {
            if !registration.is_active() {
                continue;
            }
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| (registration.handler)(&event)));
            match outcome {
                Ok(()) => delivery.delivered = delivery.delivered.saturating_add(1),
                Err(payload) => {
                    delivery.failed = delivery.failed.saturating_add(1);
                    tracing::error!(
                        event = %kind,
                        subscription = %registration.id,
                        reason = panic_message(payload.as_ref()),
                        "event handler panicked; continuing delivery"
                    );
                }
            }
        }

        tracing::debug!(
            event = %kind,
            delivered = delivery.delivered,
            failed = delivery.failed,
            "event published"
        );

        if self.inner.tap.receiver_count() > 0 {
            // Only fails when every receiver is gone in the meantime.
            let _ = self.inner.tap.send(event);
        }
        delivery
    }

    /// Creates an async receiver for every event published from now on.
    ///
    /// Slow receivers lose the oldest events once the tap capacity is
    /// exceeded and observe `RecvError::Lagged`.
    #[must_use]
    pub fn tap(&self) -> broadcast::Receiver<AppEvent> {
        self.inner.tap.subscribe()
    }

    /// Returns the number of registrations for `kind`.
    #[must_use]
    pub fn subscriber_count(&self, kind: EventKind) -> usize {
        self.inner.table().iter().filter(|r| r.kind == kind).count()
    }

    /// Returns the total number of registrations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.table().len()
    }

    /// Returns `true` if nothing is subscribed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.table().is_empty()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_TAP_CAPACITY)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("registrations", &self.len())
            .field("tap_receivers", &self.inner.tap.receiver_count())
            .finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}
