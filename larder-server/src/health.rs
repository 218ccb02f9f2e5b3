//! Health and metrics HTTP endpoints (Axum).

use axum::{extract::State, routing::get, Router};
use std::sync::Arc;

use crate::AppState;

pub fn health_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

async fn metrics(State(state): State<Arc<AppState>>) -> String {
    state.metrics.encode()
}
