//! Composition root wiring the store, bus, notifier, and service.

use std::sync::Arc;

use crate::config::TrackerConfig;
use crate::domain::EventBus;
use crate::error::TrackerError;
use crate::persistence::{self, InMemoryStore, WeightStore};
use crate::service::{TrackerService, UpdateNotifier};

/// Process-lifetime application services.
///
/// Built explicitly once at startup; everything else receives references
/// (or cheap clones) from here instead of reaching for global state.
#[derive(Debug)]
pub struct TrackerApp {
    config: TrackerConfig,
    store: Arc<InMemoryStore>,
    bus: EventBus,
    service: Arc<TrackerService>,
}

impl TrackerApp {
    /// Builds the application, restoring the snapshot file if configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot file exists but cannot be read or
    /// parsed.
    pub fn build(config: TrackerConfig) -> Result<Self, TrackerError> {
        let store = match config.data_file.as_deref() {
            Some(path) => match persistence::load_snapshot(path)? {
                Some(snapshot) => {
                    tracing::info!(
                        path = %path.display(),
                        entries = snapshot.entries.len(),
                        goals = snapshot.goals.len(),
                        "snapshot restored"
                    );
                    InMemoryStore::from_snapshot(snapshot)?
                }
                None => InMemoryStore::new(config.default_unit),
            },
            None => InMemoryStore::new(config.default_unit),
        };
        let store = Arc::new(store);

        let bus = EventBus::new(config.event_tap_capacity);
        let shared: Arc<InMemoryStore> = Arc::clone(&store);
        let dyn_store: Arc<dyn WeightStore> = shared;
        let service = Arc::new(TrackerService::new(
            dyn_store,
            UpdateNotifier::new(bus.clone()),
        ));

        Ok(Self {
            config,
            store,
            bus,
            service,
        })
    }

    /// Returns the configuration the app was built with.
    #[must_use]
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Returns the shared event bus.
    #[must_use]
    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// Returns the notifier used by the service.
    #[must_use]
    pub fn notifier(&self) -> &UpdateNotifier {
        self.service.notifier()
    }

    /// Returns the tracker service.
    #[must_use]
    pub fn service(&self) -> &Arc<TrackerService> {
        &self.service
    }

    /// Returns the store as a trait object, for view-models.
    #[must_use]
    pub fn store(&self) -> Arc<dyn WeightStore> {
        Arc::clone(self.service.store())
    }

    /// Writes the store to the configured snapshot file.
    ///
    /// Returns `false` if no data file is configured.
    ///
    /// # Errors
    ///
    /// Returns a persistence error if the snapshot cannot be written; the
    /// failure is also broadcast as a data-save error.
    pub fn persist(&self) -> Result<bool, TrackerError> {
        let Some(path) = self.config.data_file.as_deref() else {
            return Ok(false);
        };
        let result = self
            .store
            .snapshot()
            .and_then(|snapshot| persistence::save_snapshot(path, &snapshot));
        if let Err(err) = result {
            self.notifier().notify_data_save_error(&err);
            return Err(err);
        }
        tracing::info!(path = %path.display(), "store persisted");
        Ok(true)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::WeightUnit;
    use chrono::Utc;

    #[test]
    fn in_memory_app_does_not_persist() {
        let Ok(app) = TrackerApp::build(TrackerConfig::default()) else {
            panic!("build");
        };
        assert!(matches!(app.persist(), Ok(false)));
    }

    #[test]
    fn persisted_data_survives_rebuild() {
        let name = format!("weight-tracker-app-{}.json", uuid::Uuid::new_v4());
        let path = std::env::temp_dir().join(name);
        let config = TrackerConfig {
            data_file: Some(path.clone()),
            default_unit: WeightUnit::Pounds,
            ..TrackerConfig::default()
        };

        let Ok(app) = TrackerApp::build(config.clone()) else {
            panic!("build");
        };
        assert!(app.service().log_weight(170.0, WeightUnit::Pounds, Utc::now()).is_ok());
        assert!(matches!(app.persist(), Ok(true)));

        let Ok(reloaded) = TrackerApp::build(config) else {
            panic!("rebuild");
        };
        let Ok(entries) = reloaded.service().entries() else {
            panic!("entries");
        };
        assert_eq!(entries.len(), 1);
        assert!(matches!(
            reloaded.service().settings(),
            Ok(s) if s.preferred_unit == WeightUnit::Pounds
        ));
        let _ = std::fs::remove_file(&path);
    }
}
