//! weight-tracker entry point.
//!
//! Builds the application, logs every reading given on the command line
//! (e.g. `81.4`, `81.4kg`, `179lb`) and persists the store.

use anyhow::Context;
use chrono::Utc;
use tracing_subscriber::EnvFilter;

use weight_tracker::app::TrackerApp;
use weight_tracker::config::TrackerConfig;
use weight_tracker::domain::WeightUnit;
use weight_tracker::observer::{AchievementFeed, DashboardModel, NotificationObserver};

fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = TrackerConfig::from_env().context("loading configuration")?;

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .init();

    let autosave = config.autosave;
    let app = TrackerApp::build(config).context("building application")?;

    // Attach view-models
    let mut dashboard = DashboardModel::new(app.store());
    dashboard.setup_notification_observers(app.bus());
    let mut feed = AchievementFeed::new();
    feed.setup_notification_observers(app.bus());

    let preferred = app.service().settings()?.preferred_unit;
    for arg in std::env::args().skip(1) {
        let (weight, unit) = parse_reading(&arg, preferred)?;
        app.service()
            .log_weight(weight, unit, Utc::now())
            .with_context(|| format!("logging {arg}"))?;
    }

    let state = dashboard.state();
    let streak = app.service().current_streak()?;
    tracing::info!(
        entries = state.entries.len(),
        latest = ?state.latest_weight(),
        unit = %state.preferred_unit,
        goal = ?state.active_goal.as_ref().map(|g| g.target_weight),
        streak,
        "dashboard"
    );
    for item in feed.take() {
        tracing::info!(?item, "achievement");
    }

    if autosave {
        app.persist().context("saving snapshot")?;
    }
    Ok(())
}

/// Splits `"81.4kg"` into magnitude and unit; a bare number uses `default`.
fn parse_reading(raw: &str, default: WeightUnit) -> anyhow::Result<(f64, WeightUnit)> {
    let raw = raw.trim();
    let split = raw
        .find(|c: char| c.is_ascii_alphabetic())
        .unwrap_or(raw.len());
    let (number, unit) = raw.split_at(split);
    let weight: f64 = number
        .trim()
        .parse::<f64>()
        .with_context(|| format!("invalid weight {raw:?}"))?;
    let unit = if unit.is_empty() {
        default
    } else {
        unit.parse::<WeightUnit>()?
    };
    Ok((weight, unit))
}
