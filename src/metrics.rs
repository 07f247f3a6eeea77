use prometheus::{Counter, CounterVec, Gauge, HistogramOpts, HistogramVec, Opts, Registry};
use std::sync::Arc;

/// Global metrics for reelchat
pub struct Metrics {
    pub registry: Registry,

    // Chat metrics
    pub chat_requests_total: CounterVec,
    pub intents_total: CounterVec,

    // Upstream metrics
    pub upstream_requests_total: CounterVec,
    pub upstream_duration_seconds: HistogramVec,

    // Cache metrics
    pub cache_hits_total: Counter,
    pub cache_misses_total: Counter,
    pub cache_size: Gauge,

    // Rate limiting metrics
    pub rate_limit_exceeded_total: CounterVec,
}

impl Metrics {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let chat_requests_total = CounterVec::new(
            Opts::new("reelchat_chat_requests_total", "Total number of chat submissions"),
            &["outcome"], // outcome: reply, rate_limited, error
        )?;

        let intents_total = CounterVec::new(
            Opts::new("reelchat_intents_total", "Resolved intents by kind"),
            &["intent"],
        )?;

        let upstream_requests_total = CounterVec::new(
            Opts::new(
                "reelchat_upstream_requests_total",
                "Total number of requests sent to each upstream API",
            ),
            &["api", "status"],
        )?;

        let upstream_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "reelchat_upstream_duration_seconds",
                "Upstream API call duration in seconds",
            )
            .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.0, 5.0, 10.0]),
            &["api"],
        )?;

        let cache_hits_total = Counter::new(
            "reelchat_cache_hits_total",
            "Total number of cache hits",
        )?;

        let cache_misses_total = Counter::new(
            "reelchat_cache_misses_total",
            "Total number of cache misses",
        )?;

        let cache_size = Gauge::new(
            "reelchat_cache_size",
            "Current number of items in cache",
        )?;

        let rate_limit_exceeded_total = CounterVec::new(
            Opts::new(
                "reelchat_rate_limit_exceeded_total",
                "Total number of requests rejected due to rate limiting",
            ),
            &["scope"],
        )?;

        registry.register(Box::new(chat_requests_total.clone()))?;
        registry.register(Box::new(intents_total.clone()))?;
        registry.register(Box::new(upstream_requests_total.clone()))?;
        registry.register(Box::new(upstream_duration_seconds.clone()))?;
        registry.register(Box::new(cache_hits_total.clone()))?;
        registry.register(Box::new(cache_misses_total.clone()))?;
        registry.register(Box::new(cache_size.clone()))?;
        registry.register(Box::new(rate_limit_exceeded_total.clone()))?;

        Ok(Self {
            registry,
            chat_requests_total,
            intents_total,
            upstream_requests_total,
            upstream_duration_seconds,
            cache_hits_total,
            cache_misses_total,
            cache_size,
            rate_limit_exceeded_total,
        })
    }

    /// Render all metrics in the Prometheus text format
    pub fn encode(&self) -> anyhow::Result<String> {
        use prometheus::Encoder;

        let encoder = prometheus::TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;

        Ok(String::from_utf8(buffer)?)
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new().expect("Failed to create metrics")
    }
}

/// Global metrics instance
pub static METRICS: once_cell::sync::Lazy<Arc<Metrics>> =
    once_cell::sync::Lazy::new(|| Arc::new(Metrics::default()));
