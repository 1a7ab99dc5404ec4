//! Core domain types for the sitrep engine.
//!
//! Everything here is plain data: observations fetched from the weather
//! provider, alert identifiers and categories, resource ledger records, and
//! social signals. Behavior lives in the component crates.

pub mod alert;
pub mod observation;
pub mod resource;
pub mod signal;

// Re-export primary types for convenient access via `sr_core::types::*`.
pub use alert::{AlertCategory, AlertId};
pub use observation::{Advisory, Observation};
pub use resource::{Priority, ResourceRecord, ResourceType};
pub use signal::{NeedType, SocialSignal, Urgency};

/// Error returned when parsing one of the string-backed enums fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value:?}")]
pub struct UnknownVariant {
    /// Which enum was being parsed (e.g. `"alert category"`).
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

impl UnknownVariant {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}
