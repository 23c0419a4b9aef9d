//! Persistence layer: the store contract plus an in-memory implementation.
//!
//! [`WeightStore`] is the durable CRUD collaborator the tracker service
//! writes through. [`InMemoryStore`] keeps everything behind a lock and can
//! be saved to / restored from a JSON snapshot file.

pub mod file;
pub mod memory;
pub mod models;

use std::fmt;

use crate::domain::{EntryId, GoalId, UserSettings, WeightEntry, WeightGoal};
use crate::error::TrackerError;

pub use file::{load_snapshot, save_snapshot};
pub use memory::InMemoryStore;
pub use models::StoreSnapshot;

/// Durable storage for weight entries, goals, and the settings singleton.
///
/// Implementations must be safe to share across threads. All methods are
/// synchronous; failures surface as [`TrackerError::Persistence`] (or
/// [`TrackerError::Internal`] for a broken lock).
pub trait WeightStore: Send + Sync + fmt::Debug {
    /// Inserts a new entry.
    ///
    /// # Errors
    ///
    /// Returns an error if an entry with the same ID exists or the write
    /// fails.
    fn insert_entry(&self, entry: WeightEntry) -> Result<(), TrackerError>;

    /// Replaces an existing entry.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::EntryNotFound`] if no entry has that ID.
    fn update_entry(&self, entry: WeightEntry) -> Result<(), TrackerError>;

    /// Removes an entry, returning it.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::EntryNotFound`] if no entry has that ID.
    fn delete_entry(&self, id: EntryId) -> Result<WeightEntry, TrackerError>;

    /// Fetches one entry.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::EntryNotFound`] if no entry has that ID.
    fn entry(&self, id: EntryId) -> Result<WeightEntry, TrackerError>;

    /// Returns all entries ordered by measurement timestamp, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn entries(&self) -> Result<Vec<WeightEntry>, TrackerError>;

    /// Inserts a new goal.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn insert_goal(&self, goal: WeightGoal) -> Result<(), TrackerError>;

    /// Replaces an existing goal.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::GoalNotFound`] if no goal has that ID.
    fn update_goal(&self, goal: WeightGoal) -> Result<(), TrackerError>;

    /// Deactivates the current active goal (if any) and inserts `goal` as
    /// the new one, returning the goal it replaced.
    ///
    /// The default runs the steps one by one; implementations that can
    /// should override it to make the swap atomic.
    ///
    /// # Errors
    ///
    /// Returns an error if either write fails.
    fn replace_active_goal(&self, goal: WeightGoal) -> Result<Option<WeightGoal>, TrackerError> {
        let previous = match self.active_goal()? {
            Some(mut old) => {
                old.deactivate();
                self.update_goal(old.clone())?;
                Some(old)
            }
            None => None,
        };
        self.insert_goal(goal)?;
        Ok(previous)
    }

    /// Returns every goal ever created, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn goals(&self) -> Result<Vec<WeightGoal>, TrackerError>;

    /// Returns the goal currently marked active, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn active_goal(&self) -> Result<Option<WeightGoal>, TrackerError> {
        Ok(self.goals()?.into_iter().rev().find(|g| g.is_active))
    }

    /// Returns the live settings record.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn settings(&self) -> Result<UserSettings, TrackerError>;

    /// Replaces the live settings record.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::InvalidSettings`] if `settings` is not the
    /// live record (different ID).
    fn save_settings(&self, settings: UserSettings) -> Result<(), TrackerError>;

    /// Looks up a goal by ID.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::GoalNotFound`] if no goal has that ID.
    fn goal(&self, id: GoalId) -> Result<WeightGoal, TrackerError> {
        self.goals()?
            .into_iter()
            .find(|g| g.id == id)
            .ok_or(TrackerError::GoalNotFound(id))
    }
}
