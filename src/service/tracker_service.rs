//! Business logic: entity mutations and the notifications they trigger.
//!
//! [`TrackerService`] is the only place that writes to the store. After
//! each write it decides which notifications to emit: data refreshes,
//! goal progress milestones, goal completion, logging streaks, and
//! failure reports when the store rejects a write.

use std::collections::BTreeSet;
use std::num::NonZeroU32;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, NaiveDate, Utc};

use super::UpdateNotifier;
use crate::domain::{EntryId, SettingsUpdate, UserSettings, WeightEntry, WeightGoal, WeightUnit};
use crate::error::TrackerError;
use crate::persistence::WeightStore;
use crate::sync::lock_unpoisoned;

/// Progress fractions announced as goal milestones.
pub const GOAL_MILESTONES: [f64; 3] = [0.25, 0.5, 0.75];

/// Consecutive-day counts announced as streaks.
pub const STREAK_MILESTONES: [u32; 7] = [3, 7, 14, 30, 60, 100, 365];

/// Parameters for [`TrackerService::create_goal`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewGoal {
    /// Weight to reach.
    pub target_weight: f64,
    /// Deadline.
    pub target_date: DateTime<Utc>,
    /// Starting weight; defaults to the most recent entry.
    pub start_weight: Option<f64>,
    /// Unit of both weights; defaults to the preferred unit.
    pub unit: Option<WeightUnit>,
}

/// Coordinates the store and the [`UpdateNotifier`].
///
/// Every mutation method follows the pattern: validate → write to store →
/// emit notifications → return result. Store failures are re-broadcast to
/// the UI and also returned to the caller. Once an entry is written, goal
/// and streak checks are best-effort and never fail the call.
#[derive(Debug)]
pub struct TrackerService {
    store: Arc<dyn WeightStore>,
    notifier: UpdateNotifier,
    /// Serializes read-modify-write sequences on goals. Never held while
    /// notifying.
    goal_lock: Mutex<()>,
}

/// Outcome of checking the active goal against the newest entry.
#[derive(Debug)]
enum GoalCheck {
    Unchanged,
    Milestone { progress: f64, goal: WeightGoal },
    Completed(WeightGoal),
}

impl TrackerService {
    /// Creates a new `TrackerService`.
    #[must_use]
    pub fn new(store: Arc<dyn WeightStore>, notifier: UpdateNotifier) -> Self {
        Self {
            store,
            notifier,
            goal_lock: Mutex::new(()),
        }
    }

    /// Returns a reference to the inner [`UpdateNotifier`].
    #[must_use]
    pub fn notifier(&self) -> &UpdateNotifier {
        &self.notifier
    }

    /// Returns a reference to the inner store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn WeightStore> {
        &self.store
    }

    /// Records a new weight measurement.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::InvalidWeight`] for a bad weight, or the
    /// store's error (also broadcast as a data-save error) if the write
    /// fails.
    pub fn log_weight(
        &self,
        weight: f64,
        unit: WeightUnit,
        timestamp: DateTime<Utc>,
    ) -> Result<WeightEntry, TrackerError> {
        let entry = WeightEntry::new(weight, unit, timestamp)?;
        self.store
            .insert_entry(entry.clone())
            .map_err(|e| self.report_save_failure(e))?;

        tracing::info!(entry_id = %entry.id, weight, unit = %unit, "weight logged");
        self.notifier.notify_weight_data_updated();
        self.follow_up("goal check", self.evaluate_goal());
        self.follow_up("streak check", self.evaluate_streak(&entry));
        Ok(entry)
    }

    /// Applies a corrective edit to an existing entry.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::EntryNotFound`] if the entry does not exist,
    /// [`TrackerError::InvalidWeight`] for a bad weight, or a store error
    /// (also broadcast) if the write fails.
    pub fn edit_entry(
        &self,
        id: EntryId,
        weight: f64,
        unit: WeightUnit,
        timestamp: DateTime<Utc>,
    ) -> Result<WeightEntry, TrackerError> {
        let mut entry = self.store.entry(id)?;
        entry.amend(weight, unit, timestamp)?;
        self.store
            .update_entry(entry.clone())
            .map_err(|e| self.report_save_failure(e))?;

        tracing::info!(entry_id = %id, weight, unit = %unit, "weight entry edited");
        self.notifier.notify_weight_data_updated();
        self.follow_up("goal check", self.evaluate_goal());
        Ok(entry)
    }

    /// Deletes an entry.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::EntryNotFound`] if the entry does not exist,
    /// or a store error (also broadcast) if the write fails.
    pub fn delete_entry(&self, id: EntryId) -> Result<WeightEntry, TrackerError> {
        let removed = self
            .store
            .delete_entry(id)
            .map_err(|e| self.report_save_failure(e))?;

        tracing::info!(entry_id = %id, "weight entry deleted");
        self.notifier.notify_weight_data_updated();
        Ok(removed)
    }

    /// Creates a new active goal, deactivating the previous one.
    ///
    /// Any failure, validation included, is broadcast as a goal creation
    /// failure before being returned.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::NoEntries`] if no start weight was given and
    /// nothing is logged yet, [`TrackerError::InvalidGoal`] /
    /// [`TrackerError::InvalidWeight`] for bad parameters, or a store error.
    pub fn create_goal(&self, new_goal: NewGoal) -> Result<WeightGoal, TrackerError> {
        match self.try_create_goal(new_goal) {
            Ok(goal) => {
                tracing::info!(
                    goal_id = %goal.id,
                    start = goal.start_weight,
                    target = goal.target_weight,
                    unit = %goal.unit,
                    "goal created"
                );
                self.notifier.notify_goal_updated(Some(&goal));
                Ok(goal)
            }
            Err(err) => {
                self.notifier.notify_goal_creation_failed(&err);
                Err(err)
            }
        }
    }

    fn try_create_goal(&self, new_goal: NewGoal) -> Result<WeightGoal, TrackerError> {
        let settings = self.store.settings()?;
        let unit = new_goal.unit.unwrap_or(settings.preferred_unit);
        let start_weight = match new_goal.start_weight {
            Some(weight) => weight,
            None => self
                .latest_entry()?
                .ok_or(TrackerError::NoEntries)?
                .weight_in(unit),
        };
        let goal = WeightGoal::new(
            start_weight,
            new_goal.target_weight,
            unit,
            Utc::now(),
            new_goal.target_date,
        )?;

        let previous = {
            let _guard = lock_unpoisoned(&self.goal_lock);
            self.store.replace_active_goal(goal.clone())?
        };
        if let Some(previous) = previous {
            tracing::debug!(goal_id = %previous.id, "previous goal deactivated");
        }
        Ok(goal)
    }

    /// Cancels the active goal, if any.
    ///
    /// # Errors
    ///
    /// Returns a store error (also broadcast) if the write fails.
    pub fn clear_goal(&self) -> Result<Option<WeightGoal>, TrackerError> {
        let cleared = {
            let _guard = lock_unpoisoned(&self.goal_lock);
            let Some(mut goal) = self.store.active_goal()? else {
                return Ok(None);
            };
            goal.deactivate();
            self.store.update_goal(goal.clone()).map(|()| goal)
        };
        let goal = cleared.map_err(|e| self.report_save_failure(e))?;

        tracing::info!(goal_id = %goal.id, "goal cleared");
        self.notifier.notify_goal_updated(None);
        Ok(Some(goal))
    }

    /// Applies a settings patch.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::InvalidSettings`] for a bad patch, or a store
    /// error (also broadcast) if the write fails.
    pub fn update_settings(&self, update: &SettingsUpdate) -> Result<UserSettings, TrackerError> {
        let mut settings = self.store.settings()?;
        settings.apply(update)?;
        self.store
            .save_settings(settings.clone())
            .map_err(|e| self.report_save_failure(e))?;

        tracing::info!(unit = %settings.preferred_unit, "settings updated");
        self.notifier.notify_settings_updated();
        Ok(settings)
    }

    /// Returns all entries, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn entries(&self) -> Result<Vec<WeightEntry>, TrackerError> {
        self.store.entries()
    }

    /// Returns the active goal, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn active_goal(&self) -> Result<Option<WeightGoal>, TrackerError> {
        self.store.active_goal()
    }

    /// Returns the settings record.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn settings(&self) -> Result<UserSettings, TrackerError> {
        self.store.settings()
    }

    /// Returns the length of the logging streak ending on the newest
    /// entry's day (0 if nothing is logged).
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn current_streak(&self) -> Result<u32, TrackerError> {
        let days = logged_days(&self.store.entries()?);
        Ok(days.last().map_or(0, |last| streak_ending_at(&days, *last)))
    }

    fn latest_entry(&self) -> Result<Option<WeightEntry>, TrackerError> {
        Ok(self.store.entries()?.pop())
    }

    fn report_save_failure(&self, err: TrackerError) -> TrackerError {
        if err.is_persistence() {
            self.notifier.notify_data_save_error(&err);
        }
        err
    }

    /// Logs and broadcasts a failed check that ran after a successful write.
    fn follow_up(&self, step: &'static str, result: Result<(), TrackerError>) {
        if let Err(err) = result {
            let err = self.report_save_failure(err);
            tracing::warn!(step, error = %err, "check after write failed");
        }
    }

    /// Checks the active goal against the newest entry and announces the
    /// outcome.
    fn evaluate_goal(&self) -> Result<(), TrackerError> {
        match self.check_goal()? {
            GoalCheck::Unchanged => {}
            GoalCheck::Milestone { progress, goal } => {
                tracing::info!(goal_id = %goal.id, progress, "goal milestone reached");
                self.notifier.notify_goal_milestone_reached(progress, &goal);
            }
            GoalCheck::Completed(goal) => {
                tracing::info!(goal_id = %goal.id, "goal completed");
                self.notifier.notify_weight_goal_completed(&goal);
                self.notifier.notify_goal_updated(Some(&goal));
            }
        }
        Ok(())
    }

    /// Persists completion or a newly crossed milestone band.
    fn check_goal(&self) -> Result<GoalCheck, TrackerError> {
        let _guard = lock_unpoisoned(&self.goal_lock);
        let Some(mut goal) = self.store.active_goal()? else {
            return Ok(GoalCheck::Unchanged);
        };
        let Some(latest) = self.latest_entry()? else {
            return Ok(GoalCheck::Unchanged);
        };
        let progress = goal.progress(latest.weight, latest.unit);

        if progress >= 1.0 {
            goal.deactivate();
            self.store.update_goal(goal.clone())?;
            return Ok(GoalCheck::Completed(goal));
        }

        let reached = GOAL_MILESTONES.iter().filter(|m| progress >= **m).count();
        if !goal.record_milestones(u8::try_from(reached).unwrap_or(u8::MAX)) {
            return Ok(GoalCheck::Unchanged);
        }
        self.store.update_goal(goal.clone())?;
        Ok(GoalCheck::Milestone { progress, goal })
    }

    /// Announces a streak when `entry` is the first one on the newest
    /// logged day and completes a milestone run of days.
    fn evaluate_streak(&self, entry: &WeightEntry) -> Result<(), TrackerError> {
        let entries = self.store.entries()?;
        let day = entry.timestamp.date_naive();
        let days = logged_days(&entries);
        if days.last() != Some(&day) {
            return Ok(());
        }
        let same_day = entries.iter().filter(|e| e.timestamp.date_naive() == day).count();
        if same_day != 1 {
            return Ok(());
        }
        let streak = streak_ending_at(&days, day);
        if STREAK_MILESTONES.contains(&streak)
            && let Some(days) = NonZeroU32::new(streak)
        {
            tracing::info!(days = streak, "logging streak achieved");
            self.notifier.notify_streak_achieved(days);
        }
        Ok(())
    }
}

/// Distinct UTC calendar days with at least one entry, ascending.
fn logged_days(entries: &[WeightEntry]) -> Vec<NaiveDate> {
    entries
        .iter()
        .map(|e| e.timestamp.date_naive())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Number of consecutive logged days ending at `last` (inclusive).
fn streak_ending_at(days: &[NaiveDate], last: NaiveDate) -> u32 {
    let mut streak = 0u32;
    let mut cursor = last;
    while days.binary_search(&cursor).is_ok() {
        streak = streak.saturating_add(1);
        match cursor.checked_sub_signed(Duration::days(1)) {
            Some(prev) => cursor = prev,
            None => break,
        }
    }
    streak
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{AppEvent, EventBus, EventKind, GoalId, Subscription};
    use crate::persistence::InMemoryStore;
    use chrono::TimeZone;

    struct Harness {
        service: TrackerService,
        events: Arc<Mutex<Vec<AppEvent>>>,
        _subs: Vec<Subscription>,
    }

    impl Harness {
        fn new() -> Self {
            Self::with_store(Arc::new(InMemoryStore::new(WeightUnit::Kilograms)))
        }

        fn with_store(store: Arc<dyn WeightStore>) -> Self {
            let bus = EventBus::new(16);
            let events = Arc::new(Mutex::new(Vec::new()));
            let subs = EventKind::ALL
                .iter()
                .map(|kind| {
                    let sink = Arc::clone(&events);
                    bus.subscribe(*kind, move |e| {
                        if let Ok(mut l) = sink.lock() {
                            l.push(e.clone());
                        }
                    })
                })
                .collect();
            Self {
                service: TrackerService::new(store, UpdateNotifier::new(bus)),
                events,
                _subs: subs,
            }
        }

        fn drain(&self) -> Vec<AppEvent> {
            self.events
                .lock()
                .map(|mut l| std::mem::take(&mut *l))
                .unwrap_or_default()
        }

        fn kinds(&self) -> Vec<EventKind> {
            self.drain().iter().map(AppEvent::kind).collect()
        }

        fn log(&self, weight: f64, at: DateTime<Utc>) -> WeightEntry {
            let Ok(entry) = self.service.log_weight(weight, WeightUnit::Kilograms, at) else {
                panic!("log {weight}");
            };
            entry
        }

        fn goal(&self, target: f64) -> WeightGoal {
            let Ok(goal) = self.service.create_goal(NewGoal {
                target_weight: target,
                target_date: Utc::now() + Duration::days(90),
                start_weight: None,
                unit: None,
            }) else {
                panic!("create goal");
            };
            goal
        }
    }

    /// Store whose writes always fail.
    #[derive(Debug)]
    struct FailingStore(InMemoryStore);

    impl WeightStore for FailingStore {
        fn insert_entry(&self, _: WeightEntry) -> Result<(), TrackerError> {
            Err(TrackerError::Persistence("disk full".into()))
        }
        fn update_entry(&self, _: WeightEntry) -> Result<(), TrackerError> {
            Err(TrackerError::Persistence("disk full".into()))
        }
        fn delete_entry(&self, _: EntryId) -> Result<WeightEntry, TrackerError> {
            Err(TrackerError::Persistence("disk full".into()))
        }
        fn entry(&self, id: EntryId) -> Result<WeightEntry, TrackerError> {
            self.0.entry(id)
        }
        fn entries(&self) -> Result<Vec<WeightEntry>, TrackerError> {
            self.0.entries()
        }
        fn insert_goal(&self, _: WeightGoal) -> Result<(), TrackerError> {
            Err(TrackerError::Persistence("disk full".into()))
        }
        fn update_goal(&self, _: WeightGoal) -> Result<(), TrackerError> {
            Err(TrackerError::Persistence("disk full".into()))
        }
        fn goals(&self) -> Result<Vec<WeightGoal>, TrackerError> {
            self.0.goals()
        }
        fn settings(&self) -> Result<UserSettings, TrackerError> {
            self.0.settings()
        }
        fn save_settings(&self, _: UserSettings) -> Result<(), TrackerError> {
            Err(TrackerError::Persistence("disk full".into()))
        }
    }

    /// Store that accepts everything except goal updates.
    #[derive(Debug, Default)]
    struct GoalUpdateFailingStore(InMemoryStore);

    impl WeightStore for GoalUpdateFailingStore {
        fn insert_entry(&self, entry: WeightEntry) -> Result<(), TrackerError> {
            self.0.insert_entry(entry)
        }
        fn update_entry(&self, entry: WeightEntry) -> Result<(), TrackerError> {
            self.0.update_entry(entry)
        }
        fn delete_entry(&self, id: EntryId) -> Result<WeightEntry, TrackerError> {
            self.0.delete_entry(id)
        }
        fn entry(&self, id: EntryId) -> Result<WeightEntry, TrackerError> {
            self.0.entry(id)
        }
        fn entries(&self) -> Result<Vec<WeightEntry>, TrackerError> {
            self.0.entries()
        }
        fn insert_goal(&self, goal: WeightGoal) -> Result<(), TrackerError> {
            self.0.insert_goal(goal)
        }
        fn update_goal(&self, _: WeightGoal) -> Result<(), TrackerError> {
            Err(TrackerError::Persistence("goal table locked".into()))
        }
        fn goals(&self) -> Result<Vec<WeightGoal>, TrackerError> {
            self.0.goals()
        }
        fn settings(&self) -> Result<UserSettings, TrackerError> {
            self.0.settings()
        }
        fn save_settings(&self, settings: UserSettings) -> Result<(), TrackerError> {
            self.0.save_settings(settings)
        }
    }

    #[test]
    fn logging_emits_data_updated() {
        let h = Harness::new();
        h.log(80.0, Utc::now());
        assert_eq!(h.kinds(), vec![EventKind::WeightDataUpdated]);
    }

    #[test]
    fn invalid_weight_emits_nothing() {
        let h = Harness::new();
        let res = h.service.log_weight(-2.0, WeightUnit::Kilograms, Utc::now());
        assert!(matches!(res, Err(TrackerError::InvalidWeight(_))));
        assert!(h.drain().is_empty());
    }

    #[test]
    fn save_failure_is_broadcast_and_returned() {
        let h = Harness::with_store(Arc::new(FailingStore(InMemoryStore::default())));
        let res = h.service.log_weight(80.0, WeightUnit::Kilograms, Utc::now());
        assert!(matches!(res, Err(TrackerError::Persistence(_))));
        let events = h.drain();
        let [AppEvent::DataSaveError { error }] = events.as_slice() else {
            panic!("expected one data save error, got {events:?}");
        };
        assert_eq!(error.code, Some(3001));
        assert!(error.message().contains("disk full"));
    }

    #[test]
    fn stored_entry_is_returned_when_goal_update_fails() {
        let h = Harness::with_store(Arc::new(GoalUpdateFailingStore::default()));
        let start = Utc::now() - Duration::days(2);
        h.log(90.0, start);
        h.goal(80.0);
        h.drain();

        let res = h.service.log_weight(79.0, WeightUnit::Kilograms, start + Duration::days(1));
        assert!(res.is_ok());
        assert!(matches!(h.service.entries(), Ok(list) if list.len() == 2));
        assert_eq!(
            h.kinds(),
            vec![EventKind::WeightDataUpdated, EventKind::DataSaveError]
        );
        assert!(matches!(h.service.active_goal(), Ok(Some(_))));
    }

    #[test]
    fn goal_creation_failure_is_broadcast() {
        let h = Harness::new();
        let res = h.service.create_goal(NewGoal {
            target_weight: 75.0,
            target_date: Utc::now() + Duration::days(30),
            start_weight: None,
            unit: None,
        });
        assert!(matches!(res, Err(TrackerError::NoEntries)));
        assert_eq!(h.kinds(), vec![EventKind::GoalCreationFailed]);
    }

    #[test]
    fn new_goal_replaces_active_goal() {
        let h = Harness::new();
        h.log(90.0, Utc::now());
        let first = h.goal(85.0);
        let second = h.goal(80.0);
        assert!(matches!(h.service.active_goal(), Ok(Some(g)) if g.id == second.id));
        assert!(matches!(h.service.store().goal(first.id), Ok(g) if !g.is_active));
        let active = h
            .service
            .store()
            .goals()
            .map(|goals| goals.iter().filter(|g| g.is_active).count())
            .unwrap_or_default();
        assert_eq!(active, 1);
    }

    #[test]
    fn milestones_are_announced_once() {
        let h = Harness::new();
        let start = Utc::now() - Duration::days(10);
        h.log(90.0, start);
        let goal = h.goal(80.0);
        h.drain();

        // 30%: crosses 0.25
        h.log(87.0, start + Duration::days(1));
        // still 30%: nothing new
        h.log(87.0, start + Duration::days(1) + Duration::hours(1));
        // 80%: crosses 0.5 and 0.75 in one step, announced once
        h.log(82.0, start + Duration::days(3));

        let milestones: Vec<(f64, GoalId)> = h
            .drain()
            .into_iter()
            .filter_map(|e| match e {
                AppEvent::GoalMilestoneReached { progress, goal } => Some((progress, goal.id)),
                _ => None,
            })
            .collect();
        assert_eq!(milestones.len(), 2);
        assert!(milestones.iter().all(|(_, id)| *id == goal.id));
        assert!(
            milestones
                .iter()
                .zip([0.3, 0.8])
                .all(|((p, _), want)| (p - want).abs() < 1e-9)
        );
    }

    #[test]
    fn milestones_survive_a_restart() {
        let store = Arc::new(InMemoryStore::new(WeightUnit::Kilograms));
        let h = Harness::with_store(Arc::clone(&store) as Arc<dyn WeightStore>);
        let start = Utc::now() - Duration::days(10);
        h.log(90.0, start);
        h.goal(80.0);
        h.log(87.0, start + Duration::days(1));
        assert!(h.kinds().contains(&EventKind::GoalMilestoneReached));

        let Ok(snapshot) = store.snapshot() else {
            panic!("snapshot");
        };
        let Ok(restored) = InMemoryStore::from_snapshot(snapshot) else {
            panic!("restore");
        };
        let h = Harness::with_store(Arc::new(restored));
        h.log(86.9, start + Duration::days(2));
        assert!(!h.kinds().contains(&EventKind::GoalMilestoneReached));
        assert!(matches!(h.service.active_goal(), Ok(Some(g)) if g.milestones_announced == 1));
    }

    #[test]
    fn concurrent_goal_creation_leaves_one_active_goal() {
        let h = Harness::new();
        h.log(90.0, Utc::now());
        std::thread::scope(|scope| {
            for target in [80.0, 81.0, 82.0, 83.0, 84.0, 85.0] {
                let service = &h.service;
                scope.spawn(move || {
                    let _ = service.create_goal(NewGoal {
                        target_weight: target,
                        target_date: Utc::now() + Duration::days(30),
                        start_weight: None,
                        unit: None,
                    });
                });
            }
        });
        let Ok(goals) = h.service.store().goals() else {
            panic!("goals");
        };
        assert_eq!(goals.len(), 6);
        assert_eq!(goals.iter().filter(|g| g.is_active).count(), 1);
    }

    #[test]
    fn reaching_target_completes_and_deactivates_goal() {
        let h = Harness::new();
        let start = Utc::now() - Duration::days(5);
        h.log(90.0, start);
        let goal = h.goal(80.0);
        h.drain();

        h.log(79.5, start + Duration::days(1));
        assert_eq!(
            h.kinds(),
            vec![
                EventKind::WeightDataUpdated,
                EventKind::WeightGoalCompleted,
                EventKind::GoalUpdated
            ]
        );
        assert!(matches!(h.service.active_goal(), Ok(None)));
        assert!(matches!(h.service.store().goal(goal.id), Ok(g) if !g.is_active));
    }

    #[test]
    fn clear_goal_announces_absent_goal() {
        let h = Harness::new();
        h.log(90.0, Utc::now());
        h.goal(85.0);
        h.drain();
        assert!(matches!(h.service.clear_goal(), Ok(Some(_))));
        assert_eq!(h.drain(), vec![AppEvent::GoalUpdated { goal: None }]);
        assert!(matches!(h.service.clear_goal(), Ok(None)));
        assert!(h.drain().is_empty());
    }

    #[test]
    fn third_consecutive_day_is_a_streak() {
        let h = Harness::new();
        let Some(day0) = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).single() else {
            panic!("valid timestamp");
        };
        h.log(80.0, day0);
        h.log(80.0, day0 + Duration::days(1));
        h.drain();
        h.log(80.0, day0 + Duration::days(2));
        let events = h.drain();
        assert!(events.iter().any(|e| matches!(
            e,
            AppEvent::StreakAchieved { days } if days.get() == 3
        )));
        assert!(matches!(h.service.current_streak(), Ok(3)));

        // A second entry on the same day does not repeat the announcement.
        h.log(79.8, day0 + Duration::days(2) + Duration::minutes(5));
        assert!(!h.kinds().contains(&EventKind::StreakAchieved));
    }

    #[test]
    fn gap_resets_streak() {
        let days = [
            NaiveDate::from_ymd_opt(2024, 1, 1),
            NaiveDate::from_ymd_opt(2024, 1, 3),
            NaiveDate::from_ymd_opt(2024, 1, 4),
        ];
        let days: Vec<NaiveDate> = days.into_iter().flatten().collect();
        let Some(last) = days.last().copied() else {
            panic!("dates");
        };
        assert_eq!(streak_ending_at(&days, last), 2);
    }

    #[test]
    fn settings_update_notifies() {
        let h = Harness::new();
        let update = SettingsUpdate {
            preferred_unit: Some(WeightUnit::Pounds),
            ..SettingsUpdate::default()
        };
        assert!(matches!(
            h.service.update_settings(&update),
            Ok(s) if s.preferred_unit == WeightUnit::Pounds
        ));
        assert_eq!(h.kinds(), vec![EventKind::SettingsUpdated]);
    }

    #[test]
    fn edit_and_delete_notify() {
        let h = Harness::new();
        let entry = h.log(80.0, Utc::now());
        h.drain();
        let edited = h.service.edit_entry(entry.id, 79.0, WeightUnit::Kilograms, entry.timestamp);
        assert!(edited.is_ok());
        assert!(h.service.delete_entry(entry.id).is_ok());
        assert_eq!(
            h.kinds(),
            vec![EventKind::WeightDataUpdated, EventKind::WeightDataUpdated]
        );
        assert!(matches!(
            h.service.delete_entry(entry.id),
            Err(TrackerError::EntryNotFound(_))
        ));
        assert!(h.drain().is_empty());
    }
}
