//! Model registry HTTP handlers.
//!
//! Endpoints:
//! - GET    /api/v1/models              - List registered models
//! - POST   /api/v1/models              - Register a model
//! - DELETE /api/v1/models/{id}         - Remove a model
//! - POST   /api/v1/models/{id}/default - Make a model the default

use std::time::Instant;

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::http::error::AppError;
use crate::http::extractors::auth::CurrentAccount;
use crate::http::extractors::json::ValidatedJson;
use crate::http::response::ApiResponse;
use crate::state::AppState;

fn parse_uuid(s: &str) -> Result<Uuid, AppError> {
    s.parse::<Uuid>()
        .map_err(|_| AppError::Validation(format!("Invalid UUID: {s}")))
}

#[derive(Debug, Deserialize)]
pub struct AddModelRequest {
    pub name: String,
    pub model_ref: String,
    #[serde(default)]
    pub is_default: bool,
}

/// GET /api/v1/models - List all registered models.
pub async fn list_models(
    State(state): State<AppState>,
    _auth: CurrentAccount,
) -> Result<Json<ApiResponse<Vec<serde_json::Value>>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let models = state.model_registry.list().await?;

    let elapsed = start.elapsed().as_millis() as u64;

    let models_json: Vec<serde_json::Value> = models
        .iter()
        .filter_map(|m| serde_json::to_value(m).ok())
        .collect();

    Ok(Json(ApiResponse::success(models_json, request_id, elapsed)))
}

/// POST /api/v1/models - Register a model.
pub async fn add_model(
    State(state): State<AppState>,
    _auth: CurrentAccount,
    ValidatedJson(payload): ValidatedJson<AddModelRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let entry = state
        .model_registry
        .add(&payload.name, &payload.model_ref, payload.is_default)
        .await?;

    let elapsed = start.elapsed().as_millis() as u64;

    let entry_json =
        serde_json::to_value(&entry).map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(ApiResponse::success(entry_json, request_id, elapsed)))
}

/// DELETE /api/v1/models/{id} - Remove a model.
///
/// Rejected with 409 for the sole remaining entry. Deleting the default
/// promotes a survivor.
pub async fn delete_model(
    State(state): State<AppState>,
    _auth: CurrentAccount,
    Path(model_id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let mid = parse_uuid(&model_id)?;
    state.model_registry.delete(&mid).await?;

    let elapsed = start.elapsed().as_millis() as u64;

    Ok(Json(ApiResponse::success(
        serde_json::json!({"deleted": true}),
        request_id,
        elapsed,
    )))
}

/// POST /api/v1/models/{id}/default - Make a model the sole default.
pub async fn set_default_model(
    State(state): State<AppState>,
    _auth: CurrentAccount,
    Path(model_id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let mid = parse_uuid(&model_id)?;
    let entry = state.model_registry.set_default(&mid).await?;

    let elapsed = start.elapsed().as_millis() as u64;

    let entry_json =
        serde_json::to_value(&entry).map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(ApiResponse::success(entry_json, request_id, elapsed)))
}
