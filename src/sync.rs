//! Lock helpers shared by the event bus and the observers.

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Locks `mutex`, recovering the data if a previous holder panicked.
///
/// Only for state that stays consistent across a panic: the bus table and
/// view-model snapshots written from event handlers.
pub(crate) fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
