//! Preference endpoints: prompt interpretation and per-user lookup.

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, State};
use gd_protocol::{PreferenceSet, validate_shape};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Request body for prompt interpretation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterpretRequest {
    /// Free-form description of the desired dashboard.
    #[serde(default)]
    pub prompt: Option<String>,
    /// Opaque caller identity used as the storage key.
    #[serde(default)]
    pub user_id: Option<String>,
}

/// POST /api/interpret-prompt: infer preferences from a prompt.
pub async fn interpret_prompt(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<Json<PreferenceSet>> {
    let fields = validate_shape(&body).map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let req: InterpretRequest = serde_json::from_value(Value::Object(fields))
        .map_err(|e| ApiError::BadRequest(format!("invalid request body: {e}")))?;

    let prompt = req.prompt.unwrap_or_default();
    tracing::info!(user_id = ?req.user_id, prompt_len = prompt.len(), "interpret prompt");

    let preferences = state
        .orchestrator
        .interpret(&prompt, req.user_id.as_deref())
        .await?;

    Ok(Json(preferences))
}

/// GET /api/preferences/{user_id}: latest stored preferences, or `{}`.
pub async fn get_preferences(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<Value>> {
    let record = state.store().get_latest(&user_id).await?;
    tracing::debug!(user_id = %user_id, found = record.is_some(), "preferences lookup");

    let body = match record {
        Some(record) => {
            serde_json::to_value(record).map_err(|e| ApiError::Internal(e.to_string()))?
        }
        None => json!({}),
    };
    Ok(Json(body))
}
