//! In-memory TTL cache of observations keyed by normalized query.
//!
//! Entries are never evicted proactively. A stale entry stays in the map
//! until the next successful fetch for its key overwrites it, and stale
//! entries are never served.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tokio::time::Instant;

use sr_core::types::Observation;

use crate::key::QueryKey;

/// One cached observation and the instant it was fetched.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub key: QueryKey,
    pub observation: Arc<Observation>,
    pub fetched_at: Instant,
}

impl CacheEntry {
    /// True while strictly less than `ttl` has elapsed since the fetch.
    pub fn is_fresh(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.fetched_at) < ttl
    }
}

/// Thread-safe map of [`QueryKey`] to [`CacheEntry`].
///
/// Uses the tokio clock so paused-time tests can step past the TTL.
#[derive(Debug)]
pub struct ObservationCache {
    ttl: Duration,
    entries: RwLock<HashMap<QueryKey, CacheEntry>>,
}

impl ObservationCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Return the cached observation if it is still fresh.
    pub fn get_fresh(&self, key: &QueryKey) -> Option<Arc<Observation>> {
        let now = Instant::now();
        let entries = self.entries.read();
        entries
            .get(key)
            .filter(|entry| entry.is_fresh(now, self.ttl))
            .map(|entry| Arc::clone(&entry.observation))
    }

    /// Store `observation` under `key`, replacing any previous entry.
    pub fn insert(&self, key: QueryKey, observation: Observation) -> Arc<Observation> {
        let observation = Arc::new(observation);
        let entry = CacheEntry {
            key: key.clone(),
            observation: Arc::clone(&observation),
            fetched_at: Instant::now(),
        };
        self.entries.write().insert(key, entry);
        observation
    }

    pub fn remove(&self, key: &QueryKey) -> bool {
        self.entries.write().remove(key).is_some()
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Number of entries, fresh or stale.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
