//! # sr-alerts
//!
//! Owns the set of active alerts and the most-recent-first notification feed.
//! New alerts arrive either through direct calls on [`AlertStore`] or from a
//! timed injector that polls an [`AlertSource`] and hands drafts to an
//! applier over a channel, so the timer never mutates the store itself.

pub mod ids;
pub mod injector;
pub mod monitor;
pub mod source;
pub mod store;

pub use ids::AlertIdGenerator;
pub use injector::{run_applier, spawn_injector};
pub use monitor::RiskMonitorSource;
pub use source::{AlertDraft, AlertSource, RandomAlertSource, ScriptedAlertSource, SourceError};
pub use store::{Alert, AlertStore, Notification, NotificationView};
