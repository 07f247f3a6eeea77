/// Sliding window rate limiter for upstream API calls
use crate::clock::SharedClock;
use crate::error::{ChatError, ChatResult};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Clone)]
pub struct RateLimiter {
    requests: Arc<Mutex<VecDeque<u64>>>,
    max_requests: u32,
    window_ms: u64,
    clock: SharedClock,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration, clock: SharedClock) -> Self {
        Self {
            requests: Arc::new(Mutex::new(VecDeque::new())),
            max_requests,
            window_ms: window.as_millis() as u64,
            clock,
        }
    }

    pub fn from_config(config: &crate::config::RateLimitingConfig, clock: SharedClock) -> Self {
        Self::new(
            config.max_requests,
            Duration::from_millis(config.window_ms),
            clock,
        )
    }

    /// Record one request, or fail with the number of seconds until a slot frees up
    pub fn admit(&self) -> ChatResult<()> {
        let now = self.clock.now_millis();
        let mut requests = self.requests.lock().unwrap_or_else(PoisonError::into_inner);

        // Timestamps are pushed in order, so expired ones sit at the front
        while let Some(&oldest) = requests.front() {
            if now.saturating_sub(oldest) < self.window_ms {
                break;
            }
            requests.pop_front();
        }

        if requests.len() >= self.max_requests as usize {
            let oldest = requests.front().copied().unwrap_or(now);
            let wait_ms = self.window_ms.saturating_sub(now.saturating_sub(oldest));
            let retry_after_secs = wait_ms.div_ceil(1000);

            crate::metrics::METRICS
                .rate_limit_exceeded_total
                .with_label_values(&["upstream"])
                .inc();
            warn!("Rate limit exceeded, retry in {}s", retry_after_secs);

            return Err(ChatError::RateLimited { retry_after_secs });
        }

        requests.push_back(now);
        debug!(
            "Request admitted ({}/{} in window)",
            requests.len(),
            self.max_requests
        );
        Ok(())
    }

    /// Slots left in the current window. Does not consume quota.
    pub fn remaining(&self) -> u32 {
        let now = self.clock.now_millis();
        let requests = self.requests.lock().unwrap_or_else(PoisonError::into_inner);
        let active = requests
            .iter()
            .filter(|&&ts| now.saturating_sub(ts) < self.window_ms)
            .count() as u32;

        self.max_requests.saturating_sub(active)
    }

    pub fn max_requests(&self) -> u32 {
        self.max_requests
    }
}
