use crate::config::Config;
use crate::conversation::ChatSession;
use crate::intent::{GENRES, LANGUAGES};
use anyhow::Result;
use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

/// HTTP server state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub session: Arc<ChatSession>,
}

#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    pub text: String,
}

/// Start HTTP server
pub async fn serve(state: AppState) -> Result<()> {
    let bind = state.config.server.bind.clone();
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind).await?;
    info!("✓ HTTP server listening on {}", bind);

    axum::serve(listener, app).await?;

    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .route("/v1/status", get(status_handler))
        .route("/v1/messages", get(messages_handler).post(submit_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// GET /health
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "version": crate::VERSION,
    }))
}

/// GET /metrics (Prometheus format)
pub async fn metrics_handler() -> Result<String, (StatusCode, String)> {
    crate::metrics::METRICS.encode().map_err(|e| {
        error!("Failed to encode metrics: {}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })
}

/// GET /v1/status - quota and supported filters
pub async fn status_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "remaining_requests": state.session.remaining_requests(),
        "max_requests": state.session.max_requests(),
        "languages": LANGUAGES.iter().map(|(name, _)| *name).collect::<Vec<_>>(),
        "genres": GENRES,
    }))
}

/// GET /v1/messages - the thread so far
pub async fn messages_handler(State(state): State<AppState>) -> Json<Value> {
    let messages = state.session.messages();
    Json(json!({
        "object": "list",
        "count": messages.len(),
        "data": messages,
    }))
}

/// POST /v1/messages
pub async fn submit_handler(
    State(state): State<AppState>,
    Json(payload): Json<SubmitRequest>,
) -> axum::response::Response {
    match state.session.submit(&payload.text).await {
        Some(reply) => Json(json!({ "reply": reply })).into_response(),
        None => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "message text is empty" })),
        )
            .into_response(),
    }
}
