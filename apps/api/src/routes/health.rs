use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /
pub async fn welcome_handler() -> Json<Value> {
    Json(json!({
        "message": "Welcome to the Mentor Mind learning path API",
        "docs": "POST /api/v1/learning-paths with {\"topic\": \"...\"}"
    }))
}

/// GET /health
/// Reports service version and which curation tiers are live.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let gate = state.curator.gate();
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "mentor-api",
        "llm_configured": state.curator.model().is_some(),
        "model": state.curator.model(),
        "ai_failures": gate.failures(),
        "ai_disabled": gate.is_tripped(),
        "ai_timeout_secs": state.config.llm_timeout.as_secs(),
        "search_fallback": state.curator.search_enabled(),
        "store": state.store.backend(),
    }))
}
