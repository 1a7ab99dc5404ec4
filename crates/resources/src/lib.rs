//! # sr-resources
//!
//! Read-only analytics over the resource ledger: per-type and per-location
//! allocation aggregates with urgency bands, conjunctive filtering, stable
//! sorting, ledger-wide summaries, and tallies of social need signals.

pub mod aggregate;
pub mod filter;
pub mod ledger;
pub mod signals;
pub mod sort;
pub mod summary;

pub use aggregate::{
    classify_percentage, classify_urgency, group_by, AggregateReport, AggregationError,
    AllocationUrgency, Dimension, ResourceAggregate,
};
pub use filter::{filter, ResourceFilter};
pub use ledger::{Ledger, LedgerError};
pub use signals::{count_by_need, count_by_urgency, SignalSummary};
pub use sort::{sort_by, SortDirection, SortField};
pub use summary::LedgerSummary;
