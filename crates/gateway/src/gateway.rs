//! Fetch-and-cache gateway.
//!
//! [`FetchGateway`] sits in front of an [`ObservationProvider`] and answers
//! repeated lookups for the same place from memory until the TTL lapses.
//! Concurrent misses for one key share a single in-flight provider call and
//! all receive its outcome, success or failure. Different keys never contend.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use sr_core::config::{CacheConfig, ProviderConfig};
use sr_core::types::Observation;

use crate::cache::ObservationCache;
use crate::key::QueryKey;
use crate::provider::{GatewayError, ObservationProvider};

/// Tunables for [`FetchGateway`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GatewayConfig {
    /// How long a fetched observation is served from memory.
    pub ttl: Duration,
    /// Upper bound on a single provider call.
    pub request_timeout: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(30 * 60),
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl GatewayConfig {
    pub fn from_settings(cache: &CacheConfig, provider: &ProviderConfig) -> Self {
        Self {
            ttl: Duration::from_secs(cache.ttl_secs),
            request_timeout: Duration::from_millis(provider.timeout_ms),
        }
    }
}

/// Outcome of one provider call, shared by every caller that joined it.
type Shared = Arc<OnceCell<Result<Arc<Observation>, GatewayError>>>;

/// Caching, coalescing front for an [`ObservationProvider`].
pub struct FetchGateway {
    provider: Arc<dyn ObservationProvider>,
    cache: ObservationCache,
    request_timeout: Duration,
    /// One shared outcome per key with a miss in progress.
    in_flight: DashMap<QueryKey, Shared>,
    provider_calls: AtomicU64,
}

impl FetchGateway {
    pub fn new(provider: Arc<dyn ObservationProvider>, config: GatewayConfig) -> Self {
        Self {
            provider,
            cache: ObservationCache::new(config.ttl),
            request_timeout: config.request_timeout,
            in_flight: DashMap::new(),
            provider_calls: AtomicU64::new(0),
        }
    }

    /// Observation for a city name.
    pub async fn fetch_city(&self, name: &str) -> Result<Arc<Observation>, GatewayError> {
        self.fetch(QueryKey::city(name)?).await
    }

    /// Observation at a latitude/longitude. Out-of-range input fails with
    /// `InvalidCoordinates` and never reaches the provider.
    pub async fn fetch_coordinates(
        &self,
        lat: f64,
        lon: f64,
    ) -> Result<Arc<Observation>, GatewayError> {
        self.fetch(QueryKey::coordinates(lat, lon)?).await
    }

    /// Observation for a normalized key, from cache when fresh.
    pub async fn fetch(&self, key: QueryKey) -> Result<Arc<Observation>, GatewayError> {
        if let Some(hit) = self.cache.get_fresh(&key) {
            debug!(key = %key, "cache hit");
            return Ok(hit);
        }

        let slot: Shared = self
            .in_flight
            .entry(key.clone())
            .or_insert_with(|| Arc::new(OnceCell::new()))
            .clone();

        // If the caller running the init is dropped, the next waiter runs it.
        let result = slot
            .get_or_init(|| async {
                // An earlier burst may have filled the entry after our miss.
                match self.cache.get_fresh(&key) {
                    Some(hit) => Ok(hit),
                    None => self.refresh(&key).await,
                }
            })
            .await
            .clone();

        // Retire this burst's slot so the next miss calls the provider afresh.
        self.in_flight
            .remove_if(&key, |_, current| Arc::ptr_eq(current, &slot));

        result
    }

    /// Call the provider and store a successful result.
    async fn refresh(&self, key: &QueryKey) -> Result<Arc<Observation>, GatewayError> {
        self.provider_calls.fetch_add(1, Ordering::Relaxed);
        debug!(key = %key, "cache miss, calling provider");

        let outcome = tokio::time::timeout(self.request_timeout, self.provider.fetch(key)).await;
        let mut observation = match outcome {
            Ok(Ok(observation)) => observation,
            Ok(Err(err)) => {
                warn!(key = %key, error = %err, "provider fetch failed");
                return Err(err);
            }
            Err(_) => {
                warn!(key = %key, timeout_ms = self.request_timeout.as_millis() as u64, "provider fetch timed out");
                return Err(GatewayError::ProviderUnavailable(format!(
                    "no response within {} ms",
                    self.request_timeout.as_millis()
                )));
            }
        };

        observation.location_key = key.to_string();
        let stored = self.cache.insert(key.clone(), observation);
        info!(
            key = %key,
            temperature = stored.temperature,
            wind_speed = stored.wind_speed,
            precipitation = stored.precipitation_probability,
            "observation refreshed"
        );
        Ok(stored)
    }

    /// Number of cached entries, including stale ones not yet overwritten.
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    /// Drop the entry for `key`. Returns whether one existed.
    pub fn invalidate(&self, key: &QueryKey) -> bool {
        self.cache.remove(key)
    }

    pub fn clear(&self) {
        self.cache.clear();
    }

    /// Total provider calls issued since construction.
    pub fn provider_calls(&self) -> u64 {
        self.provider_calls.load(Ordering::Relaxed)
    }

    pub fn ttl(&self) -> Duration {
        self.cache.ttl()
    }
}

impl std::fmt::Debug for FetchGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchGateway")
            .field("ttl", &self.cache.ttl())
            .field("request_timeout", &self.request_timeout)
            .field("cached", &self.cache.len())
            .field("in_flight", &self.in_flight.len())
            .finish()
    }
}
