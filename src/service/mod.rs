//! Service layer: the notification catalogue and the business logic that
//! drives it.

pub mod tracker_service;
pub mod update_notifier;

pub use tracker_service::{NewGoal, TrackerService};
pub use update_notifier::UpdateNotifier;
