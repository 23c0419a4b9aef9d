//! Domain layer: entities, events, and the event bus.
//!
//! This module contains the persisted records (weight entries, goals,
//! settings), the closed catalogue of transient events observers react
//! to, and the bus that delivers them.

pub mod app_event;
pub mod event_bus;
pub mod ids;
pub mod subscription;
pub mod user_settings;
pub mod weight_entry;
pub mod weight_goal;
pub mod weight_unit;

pub use app_event::{AppEvent, EventKind, Failure};
pub use event_bus::{Delivery, EventBus};
pub use ids::{EntryId, GoalId, SettingsId};
pub use subscription::{Subscription, SubscriptionId, SubscriptionSet};
pub use user_settings::{SettingsUpdate, UserSettings};
pub use weight_entry::WeightEntry;
pub use weight_goal::WeightGoal;
pub use weight_unit::WeightUnit;
