use crate::cache::{ResponseCache, cache_key};
use crate::clock::SharedClock;
use crate::config::Config;
use crate::error::{ChatError, ChatResult};
use crate::providers::{MovieApi, omdb, tmdb};
use crate::rate_limit::RateLimiter;
use crate::types::{ApiSelector, Params};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Single path for every upstream call: cache first, then quota, then network
pub struct Gateway {
    catalog: Arc<dyn MovieApi>,
    ratings: Arc<dyn MovieApi>,
    cache: ResponseCache,
    limiter: RateLimiter,
}

impl Gateway {
    pub fn new(
        catalog: Arc<dyn MovieApi>,
        ratings: Arc<dyn MovieApi>,
        cache: ResponseCache,
        limiter: RateLimiter,
    ) -> Self {
        Self {
            catalog,
            ratings,
            cache,
            limiter,
        }
    }

    /// Gateway over the real HTTP APIs described by `config`
    pub fn from_config(config: &Config, clock: SharedClock) -> ChatResult<Self> {
        let catalog = Arc::new(tmdb::from_config(&config.catalog)?);
        let ratings = Arc::new(omdb::from_config(&config.ratings)?);

        Ok(Self::new(
            catalog,
            ratings,
            ResponseCache::from_config(&config.cache, clock.clone()),
            RateLimiter::from_config(&config.rate_limiting, clock),
        ))
    }

    /// Raw JSON payload for `endpoint` on `api`
    pub async fn fetch(&self, api: ApiSelector, endpoint: &str, params: Params) -> ChatResult<Value> {
        let key = cache_key(api, endpoint, &params);

        if let Some(payload) = self.cache.get(&key) {
            debug!("Cache hit for {} {}", api.as_str(), endpoint);
            return Ok(payload);
        }

        self.limiter.admit()?;
        let requested_at = self.cache.now_millis();

        let backend = match api {
            ApiSelector::Catalog => &self.catalog,
            ApiSelector::Ratings => &self.ratings,
        };
        let payload = backend.get(endpoint, &params).await?;

        self.cache.set(key, payload.clone(), requested_at);
        Ok(payload)
    }

    /// Fetch and decode into `T`
    pub async fn fetch_as<T: DeserializeOwned>(
        &self,
        api: ApiSelector,
        endpoint: &str,
        params: Params,
    ) -> ChatResult<T> {
        let payload = self.fetch(api, endpoint, params).await?;
        serde_json::from_value(payload).map_err(|source| ChatError::Decode {
            context: api.as_str(),
            source,
        })
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }
}
