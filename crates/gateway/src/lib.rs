//! # sr-gateway
//!
//! Fetch-and-cache gateway for weather observations. Wraps an
//! [`ObservationProvider`] (the OpenWeatherMap REST client in production)
//! behind a time-bounded cache with lazy expiry and per-key request
//! coalescing.

pub mod cache;
pub mod gateway;
pub mod key;
pub mod openweather;
pub mod provider;

pub use cache::{CacheEntry, ObservationCache};
pub use gateway::{FetchGateway, GatewayConfig};
pub use key::QueryKey;
pub use openweather::OpenWeatherClient;
pub use provider::{GatewayError, ObservationProvider};
