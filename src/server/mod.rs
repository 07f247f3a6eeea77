pub mod http;

use crate::clock::{SharedClock, SystemClock};
use crate::config::Config;
use crate::conversation::ChatSession;
use crate::gateway::Gateway;
use crate::router::Router as ChatRouter;
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

/// Wire config into a ready chat session backed by the real APIs
pub fn build_session(config: &Config) -> Result<Arc<ChatSession>> {
    let clock: SharedClock = Arc::new(SystemClock);
    let gateway = Gateway::from_config(config, clock).context("Failed to build API clients")?;

    info!(
        "  Quota: {} requests / {}ms, cache ttl {}s",
        config.rate_limiting.max_requests, config.rate_limiting.window_ms, config.cache.ttl
    );

    let router = Arc::new(ChatRouter::new(Arc::new(gateway)));
    Ok(Arc::new(ChatSession::new(router)))
}

/// Run the HTTP server until it fails or the process is interrupted
pub async fn run(config: Config) -> Result<()> {
    let session = build_session(&config)?;
    let state = http::AppState {
        config: Arc::new(config),
        session,
    };

    info!("🌐 HTTP server starting on {}", state.config.server.bind);

    tokio::select! {
        res = http::serve(state) => res?,
        _ = tokio::signal::ctrl_c() => {
            info!("Shutting down");
        }
    }

    Ok(())
}
