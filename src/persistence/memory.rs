//! Lock-protected in-memory store.

use std::collections::{HashMap, HashSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;

use super::WeightStore;
use super::models::{SNAPSHOT_VERSION, StoreSnapshot};
use crate::domain::weight_entry::validate_weight;
use crate::domain::{EntryId, UserSettings, WeightEntry, WeightGoal, WeightUnit};
use crate::error::TrackerError;

#[derive(Debug)]
struct StoreState {
    entries: HashMap<EntryId, WeightEntry>,
    goals: Vec<WeightGoal>,
    settings: UserSettings,
}

/// [`WeightStore`] kept entirely in memory.
///
/// A single [`RwLock`] guards all records, so reads run concurrently and
/// writes are serialized. Use [`InMemoryStore::snapshot`] together with
/// [`super::save_snapshot`] to make the contents durable.
#[derive(Debug)]
pub struct InMemoryStore {
    state: RwLock<StoreState>,
}

impl InMemoryStore {
    /// Creates an empty store with fresh settings in `preferred_unit`.
    #[must_use]
    pub fn new(preferred_unit: WeightUnit) -> Self {
        Self {
            state: RwLock::new(StoreState {
                entries: HashMap::new(),
                goals: Vec::new(),
                settings: UserSettings::new(preferred_unit),
            }),
        }
    }

    /// Rebuilds a store from a snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Persistence`] if the snapshot version is
    /// newer than this build understands, or if the records break an entity
    /// rule: duplicate IDs, a non-positive weight, or more than one active
    /// goal.
    pub fn from_snapshot(snapshot: StoreSnapshot) -> Result<Self, TrackerError> {
        if snapshot.version > SNAPSHOT_VERSION {
            return Err(TrackerError::Persistence(format!(
                "snapshot version {} is newer than supported version {SNAPSHOT_VERSION}",
                snapshot.version
            )));
        }
        let mut entries = HashMap::with_capacity(snapshot.entries.len());
        for entry in snapshot.entries {
            let id = entry.id;
            validate_weight(entry.weight).map_err(|_| {
                TrackerError::Persistence(format!("entry {id} has invalid weight {}", entry.weight))
            })?;
            if entries.insert(id, entry).is_some() {
                return Err(TrackerError::Persistence(format!(
                    "duplicate entry {id} in snapshot"
                )));
            }
        }
        let mut goal_ids = HashSet::with_capacity(snapshot.goals.len());
        for goal in &snapshot.goals {
            if !goal_ids.insert(goal.id) {
                return Err(TrackerError::Persistence(format!(
                    "duplicate goal {} in snapshot",
                    goal.id
                )));
            }
            validate_weight(goal.start_weight)
                .and_then(|()| validate_weight(goal.target_weight))
                .map_err(|_| {
                    TrackerError::Persistence(format!("goal {} has invalid weights", goal.id))
                })?;
        }
        let active = snapshot.goals.iter().filter(|g| g.is_active).count();
        if active > 1 {
            return Err(TrackerError::Persistence(format!(
                "snapshot has {active} active goals"
            )));
        }
        Ok(Self {
            state: RwLock::new(StoreState {
                entries,
                goals: snapshot.goals,
                settings: snapshot.settings,
            }),
        })
    }

    /// Captures the full store contents.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Internal`] if the lock is poisoned.
    pub fn snapshot(&self) -> Result<StoreSnapshot, TrackerError> {
        let state = self.read()?;
        Ok(StoreSnapshot {
            version: SNAPSHOT_VERSION,
            taken_at: Utc::now(),
            entries: sorted_entries(&state.entries),
            goals: state.goals.clone(),
            settings: state.settings.clone(),
        })
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, StoreState>, TrackerError> {
        self.state
            .read()
            .map_err(|_| TrackerError::Internal("store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, StoreState>, TrackerError> {
        self.state
            .write()
            .map_err(|_| TrackerError::Internal("store lock poisoned".to_string()))
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new(WeightUnit::default())
    }
}

fn sorted_entries(entries: &HashMap<EntryId, WeightEntry>) -> Vec<WeightEntry> {
    let mut list: Vec<WeightEntry> = entries.values().cloned().collect();
    list.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then(a.created_at.cmp(&b.created_at)));
    list
}

impl WeightStore for InMemoryStore {
    fn insert_entry(&self, entry: WeightEntry) -> Result<(), TrackerError> {
        let mut state = self.write()?;
        if state.entries.contains_key(&entry.id) {
            return Err(TrackerError::Persistence(format!(
                "entry {} already exists",
                entry.id
            )));
        }
        state.entries.insert(entry.id, entry);
        Ok(())
    }

    fn update_entry(&self, entry: WeightEntry) -> Result<(), TrackerError> {
        let mut state = self.write()?;
        let slot = state
            .entries
            .get_mut(&entry.id)
            .ok_or(TrackerError::EntryNotFound(entry.id))?;
        *slot = entry;
        Ok(())
    }

    fn delete_entry(&self, id: EntryId) -> Result<WeightEntry, TrackerError> {
        self.write()?
            .entries
            .remove(&id)
            .ok_or(TrackerError::EntryNotFound(id))
    }

    fn entry(&self, id: EntryId) -> Result<WeightEntry, TrackerError> {
        self.read()?
            .entries
            .get(&id)
            .cloned()
            .ok_or(TrackerError::EntryNotFound(id))
    }

    fn entries(&self) -> Result<Vec<WeightEntry>, TrackerError> {
        Ok(sorted_entries(&self.read()?.entries))
    }

    fn insert_goal(&self, goal: WeightGoal) -> Result<(), TrackerError> {
        let mut state = self.write()?;
        if state.goals.iter().any(|g| g.id == goal.id) {
            return Err(TrackerError::Persistence(format!(
                "goal {} already exists",
                goal.id
            )));
        }
        state.goals.push(goal);
        Ok(())
    }

    fn update_goal(&self, goal: WeightGoal) -> Result<(), TrackerError> {
        let mut state = self.write()?;
        let slot = state
            .goals
            .iter_mut()
            .find(|g| g.id == goal.id)
            .ok_or(TrackerError::GoalNotFound(goal.id))?;
        *slot = goal;
        Ok(())
    }

    fn replace_active_goal(&self, goal: WeightGoal) -> Result<Option<WeightGoal>, TrackerError> {
        let mut state = self.write()?;
        if state.goals.iter().any(|g| g.id == goal.id) {
            return Err(TrackerError::Persistence(format!(
                "goal {} already exists",
                goal.id
            )));
        }
        let mut previous = None;
        for old in state.goals.iter_mut().filter(|g| g.is_active) {
            old.deactivate();
            previous = Some(old.clone());
        }
        state.goals.push(goal);
        Ok(previous)
    }

    fn goals(&self) -> Result<Vec<WeightGoal>, TrackerError> {
        Ok(self.read()?.goals.clone())
    }

    fn settings(&self) -> Result<UserSettings, TrackerError> {
        Ok(self.read()?.settings.clone())
    }

    fn save_settings(&self, settings: UserSettings) -> Result<(), TrackerError> {
        let mut state = self.write()?;
        if state.settings.id != settings.id {
            return Err(TrackerError::InvalidSettings(format!(
                "settings {} is not the live record {}",
                settings.id, state.settings.id
            )));
        }
        state.settings = settings;
        Ok(())
    }
}
