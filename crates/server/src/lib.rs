//! # sr-server
//!
//! HTTP surface and process lifecycle for the sitrep engine. The library
//! target exists so integration tests can drive the router directly.

pub mod engine;
pub mod error;
pub mod server;

pub use engine::{AppState, Engine};
pub use error::ApiError;
pub use server::{router, run_server};
