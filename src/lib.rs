//! # weight-tracker-core
//!
//! Local core of a personal weight tracker: typed records for weight
//! entries, goals and settings, plus the in-process notification system
//! that keeps every screen in sync after a change.
//!
//! ## Architecture
//!
//! ```text
//! Screens / view-models (observer/)
//!     │  subscribe via NotificationObserver
//!     │
//!     ├── EventBus (domain/)          synchronous, ordered fan-out
//!     │
//!     ├── UpdateNotifier (service/)   one method per event kind
//!     ├── TrackerService (service/)   mutations → notifications
//!     │
//!     └── WeightStore (persistence/)  in-memory + JSON snapshots
//! ```
//!
//! [`app::TrackerApp`] is the composition root: it builds one bus, one
//! notifier and one service per process and hands out references.

pub mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod observer;
pub mod persistence;
pub mod service;

mod sync;
