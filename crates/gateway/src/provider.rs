//! Observation provider trait.
//!
//! The [`ObservationProvider`] trait is the seam between the gateway and
//! whatever service actually produces weather observations. The gateway
//! never talks HTTP itself; it only calls this trait.

use async_trait::async_trait;

use sr_core::types::Observation;

use crate::key::QueryKey;

/// Errors surfaced by the gateway and its providers.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GatewayError {
    /// Network failure, timeout, non-success HTTP status, or a malformed
    /// payload. Never retried by the gateway.
    #[error("observation provider unavailable: {0}")]
    ProviderUnavailable(String),
    /// The provider does not know the requested location.
    #[error("location not found: {0}")]
    LocationNotFound(String),
    /// Latitude or longitude out of range; rejected before any fetch.
    #[error("invalid coordinates: lat {lat}, lon {lon}")]
    InvalidCoordinates { lat: f64, lon: f64 },
}

/// Source of weather observations (imperial units).
///
/// Implementors handle transport and payload mapping. They do not cache;
/// caching and coalescing belong to [`FetchGateway`](crate::FetchGateway).
#[async_trait]
pub trait ObservationProvider: Send + Sync {
    /// Current conditions for a city name.
    async fn by_city(&self, city: &str) -> Result<Observation, GatewayError>;

    /// Current conditions at a latitude/longitude.
    async fn by_coordinates(&self, lat: f64, lon: f64) -> Result<Observation, GatewayError>;

    /// Dispatch on a normalized key.
    async fn fetch(&self, key: &QueryKey) -> Result<Observation, GatewayError> {
        match key {
            QueryKey::City(name) => self.by_city(name).await,
            QueryKey::Coordinates { .. } => {
                let (lat, lon) = key.lat_lon().unwrap_or_default();
                self.by_coordinates(lat, lon).await
            }
        }
    }
}
