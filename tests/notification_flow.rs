//! End-to-end notification scenarios through the public API.

#![allow(clippy::panic)]

use std::sync::{Arc, Mutex};

use chrono::{Duration, Utc};
use tokio_test::{assert_err, assert_ok};

use weight_tracker::app::TrackerApp;
use weight_tracker::config::TrackerConfig;
use weight_tracker::domain::{AppEvent, EventBus, EventKind, WeightUnit};
use weight_tracker::observer::{AchievementFeed, DashboardModel, NotificationObserver};
use weight_tracker::service::{NewGoal, UpdateNotifier};

type Calls = Arc<Mutex<Vec<(&'static str, AppEvent)>>>;

fn recorder(calls: &Calls, name: &'static str) -> impl Fn(&AppEvent) + Send + Sync + 'static {
    let calls = Arc::clone(calls);
    move |event| {
        if let Ok(mut list) = calls.lock() {
            list.push((name, event.clone()));
        }
    }
}

fn drain(calls: &Calls) -> Vec<(&'static str, AppEvent)> {
    calls
        .lock()
        .map(|mut l| std::mem::take(&mut *l))
        .unwrap_or_default()
}

#[test]
fn two_subscribers_then_one() {
    let bus = EventBus::new(8);
    let notifier = UpdateNotifier::new(bus.clone());
    let calls: Calls = Arc::new(Mutex::new(Vec::new()));

    let a = bus.subscribe(EventKind::WeightDataUpdated, recorder(&calls, "A"));
    let _b = bus.subscribe(EventKind::WeightDataUpdated, recorder(&calls, "B"));

    notifier.notify_weight_data_updated();
    assert_eq!(
        drain(&calls),
        vec![
            ("A", AppEvent::WeightDataUpdated),
            ("B", AppEvent::WeightDataUpdated)
        ]
    );

    assert!(bus.unsubscribe(a.detach()));
    notifier.notify_weight_data_updated();
    assert_eq!(drain(&calls), vec![("B", AppEvent::WeightDataUpdated)]);
}

#[test]
fn goal_creation_failure_carries_exact_error() {
    let bus = EventBus::new(8);
    let notifier = UpdateNotifier::new(bus.clone());
    let calls: Calls = Arc::new(Mutex::new(Vec::new()));
    let _sub = bus.subscribe(EventKind::GoalCreationFailed, recorder(&calls, "ui"));

    notifier.notify_goal_creation_failed("disk full");
    let received = drain(&calls);
    let [(_, AppEvent::GoalCreationFailed { error })] = received.as_slice() else {
        panic!("expected one failure event, got {received:?}");
    };
    assert_eq!(error.message(), "disk full");
}

#[test]
fn faulty_subscriber_is_isolated() {
    let bus = EventBus::new(8);
    let calls: Calls = Arc::new(Mutex::new(Vec::new()));
    let _first = bus.subscribe(EventKind::SettingsUpdated, |_| panic!("view crashed"));
    let _second = bus.subscribe(EventKind::SettingsUpdated, recorder(&calls, "second"));

    let delivery = UpdateNotifier::new(bus).notify_settings_updated();
    assert_eq!(delivery.failed, 1);
    assert_eq!(delivery.delivered, 1);
    assert_eq!(drain(&calls).len(), 1);
}

#[test]
fn full_session_drives_view_models() {
    let app = assert_ok!(TrackerApp::build(TrackerConfig::default()));
    let mut dashboard = DashboardModel::new(app.store());
    dashboard.setup_notification_observers(app.bus());
    let mut feed = AchievementFeed::new();
    feed.setup_notification_observers(app.bus());

    let service = app.service();
    let start = Utc::now() - Duration::days(20);
    assert_ok!(service.log_weight(100.0, WeightUnit::Kilograms, start));
    let goal = assert_ok!(service.create_goal(NewGoal {
        target_weight: 90.0,
        target_date: Utc::now() + Duration::days(60),
        start_weight: None,
        unit: None,
    }));
    assert_eq!(dashboard.state().active_goal.map(|g| g.id), Some(goal.id));

    assert_ok!(service.log_weight(94.0, WeightUnit::Kilograms, start + Duration::days(5)));
    assert_ok!(service.log_weight(89.5, WeightUnit::Kilograms, start + Duration::days(10)));

    let state = dashboard.state();
    assert_eq!(state.entries.len(), 3);
    assert_eq!(state.active_goal, None);
    assert_eq!(feed.items().len(), 2, "one milestone, one completion");

    assert_err!(service.log_weight(0.0, WeightUnit::Kilograms, Utc::now()));
    assert_eq!(dashboard.state().entries.len(), 3);

    dashboard.remove_notification_observers();
    feed.remove_notification_observers();
    assert!(app.bus().is_empty());
}

#[test]
fn tap_sees_service_notifications() {
    let app = assert_ok!(TrackerApp::build(TrackerConfig::default()));
    let mut rx = app.bus().tap();
    assert_ok!(app.service().log_weight(72.0, WeightUnit::Kilograms, Utc::now()));

    let event = assert_ok!(tokio_test::block_on(rx.recv()));
    assert_eq!(event, AppEvent::WeightDataUpdated);
}
