use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Mutex as AsyncMutex;
use tokio::time::Instant;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub data: Value,
    pub timestamp: Instant,
}

impl CacheEntry {
    fn is_fresh(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.timestamp) < ttl
    }
}

type Slot = Arc<AsyncMutex<Option<CacheEntry>>>;

/// Memoizes JSON values per key for a fixed time-to-live.
///
/// Each key owns its own async lock, held across the whole
/// check-fetch-store sequence: concurrent misses on one key share a single
/// fetch, while lookups on other keys proceed independently.
pub struct CacheStore {
    ttl: Duration,
    slots: Mutex<HashMap<String, Slot>>,
}

impl CacheStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slots: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn slot(&self, key: &str) -> Slot {
        // poisoning only means another request panicked mid-insert; the map is still usable
        let mut slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        slots
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(AsyncMutex::new(None)))
            .clone()
    }

    /// Returns the cached value for `key` if it is younger than the TTL,
    /// otherwise runs `fetch` and stores its result. Errors from `fetch` are
    /// returned as-is and leave any previous entry in place.
    pub async fn get_cached_data<F, Fut, E>(&self, key: &str, fetch: F) -> Result<Value, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value, E>>,
    {
        let slot = self.slot(key);
        let mut entry = slot.lock().await;

        let current_time = Instant::now();
        if let Some(cached) = entry.as_ref() {
            if cached.is_fresh(current_time, self.ttl) {
                debug!("Cache hit for {}", key);
                return Ok(cached.data.clone());
            }
        }

        debug!("Cache miss for {}", key);
        let data = fetch().await?;
        *entry = Some(CacheEntry {
            data: data.clone(),
            timestamp: current_time,
        });

        Ok(data)
    }

    /// Current entry for `key`, fresh or not.
    pub async fn entry(&self, key: &str) -> Option<CacheEntry> {
        let slot = self.slot(key);
        let entry = slot.lock().await;
        entry.clone()
    }
}
