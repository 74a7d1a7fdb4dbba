//! Health check endpoint.

use axum::Json;
use axum::extract::State;
use serde_json::{Value, json};

use crate::inference::InferenceMode;
use crate::state::AppState;

/// GET /health: liveness check.
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let mode = match state.orchestrator.mode() {
        InferenceMode::Llm => "llm",
        InferenceMode::Fallback => "fallback",
    };
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "inference_mode": mode,
    }))
}
