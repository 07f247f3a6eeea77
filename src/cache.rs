/// TTL cache for upstream API payloads
use crate::clock::SharedClock;
use crate::types::{ApiSelector, Params};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

pub struct ResponseCache {
    entries: Arc<Mutex<HashMap<String, CacheEntry>>>,
    ttl_ms: u64,
    clock: SharedClock,
}

struct CacheEntry {
    payload: Value,
    inserted_at: u64,
}

impl ResponseCache {
    pub fn new(ttl: Duration, clock: SharedClock) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            ttl_ms: ttl.as_millis() as u64,
            clock,
        }
    }

    pub fn from_config(config: &crate::config::CacheConfig, clock: SharedClock) -> Self {
        Self::new(Duration::from_secs(config.ttl), clock)
    }

    /// Live payload for `key`, if any. Stale entries stay in place until overwritten.
    pub fn get(&self, key: &str) -> Option<Value> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let now = self.clock.now_millis();

        match entries.get(key) {
            Some(entry) if now.saturating_sub(entry.inserted_at) < self.ttl_ms => {
                crate::metrics::METRICS.cache_hits_total.inc();
                Some(entry.payload.clone())
            }
            _ => {
                crate::metrics::METRICS.cache_misses_total.inc();
                None
            }
        }
    }

    /// Current time on the cache's clock, for stamping a request before it is sent
    pub fn now_millis(&self) -> u64 {
        self.clock.now_millis()
    }

    /// Store `payload` as fetched at `requested_at`. The entry expires one ttl
    /// after the request started, not after the response arrived.
    pub fn set(&self, key: String, payload: Value, requested_at: u64) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);

        entries.insert(key, CacheEntry {
            payload,
            inserted_at: requested_at,
        });

        crate::metrics::METRICS.cache_size.set(entries.len() as f64);
    }

    pub fn clear(&self) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.clear();
        crate::metrics::METRICS.cache_size.set(0.0);
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Generate cache key from request shape
pub fn cache_key(api: ApiSelector, endpoint: &str, params: &Params) -> String {
    use sha2::{Digest, Sha256};

    let mut hasher = Sha256::new();
    hasher.update(api.as_str().as_bytes());
    hasher.update([0u8]);
    hasher.update(endpoint.as_bytes());
    // BTreeMap iterates in key order
    for (key, value) in params {
        hasher.update([0u8]);
        hasher.update(key.as_bytes());
        hasher.update(b"=");
        hasher.update(value.as_bytes());
    }

    format!("{:x}", hasher.finalize())
}
