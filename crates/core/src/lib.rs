//! # sr-core
//!
//! Shared types, configuration, and logging for the sitrep situational
//! aggregation engine.
//!
//! This crate provides the building blocks used by every other crate in the
//! workspace: weather observations and advisories, alert categories, resource
//! ledger records, the layered [`config::AppConfig`], and the tracing setup.

pub mod config;
pub mod logging;
pub mod types;
