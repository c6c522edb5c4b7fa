//! Session CRUD HTTP handlers.
//!
//! Endpoints:
//! - POST   /api/v1/sessions               - Create an empty session
//! - GET    /api/v1/sessions               - List the caller's sessions
//! - PUT    /api/v1/sessions/{id}          - Rename a session
//! - DELETE /api/v1/sessions/{id}          - Delete a session and its messages
//! - GET    /api/v1/sessions/{id}/messages - Get a session's messages
//!
//! Every operation is scoped to the authenticated account.

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

/// Parse a UUID from a path parameter, returning a 400 error on invalid format.
fn parse_uuid(s: &str) -> Result<Uuid, AppError> {
    s.parse::<Uuid>()
        .map_err(|_| AppError::Validation(format!("Invalid UUID: {s}")))
}

#[derive(Debug, Deserialize)]
pub struct RenameRequest {
    pub title: String,
}

/// POST /api/v1/sessions - Create an empty session for the caller.
pub async fn create_session(
    State(state): State<AppState>,
    auth: CurrentAccount,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let session = state.chat_service.create_session(auth.account.id).await?;

    let elapsed = start.elapsed().as_millis() as u64;

    let session_json =
        serde_json::to_value(&session).map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(ApiResponse::success(session_json, request_id, elapsed)))
}

/// GET /api/v1/sessions - List the caller's sessions, newest first.
pub async fn list_sessions(
    State(state): State<AppState>,
    auth: CurrentAccount,
) -> Result<Json<ApiResponse<Vec<serde_json::Value>>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let sessions = state.chat_service.list_sessions(&auth.account.id).await?;

    let elapsed = start.elapsed().as_millis() as u64;

    let sessions_json: Vec<serde_json::Value> = sessions
        .iter()
        .filter_map(|s| serde_json::to_value(s).ok())
        .collect();

    Ok(Json(ApiResponse::success(sessions_json, request_id, elapsed)))
}

/// PUT /api/v1/sessions/{id} - Rename a session. Owner-only.
pub async fn rename_session(
    State(state): State<AppState>,
    auth: CurrentAccount,
    Path(session_id): Path<String>,
    ValidatedJson(payload): ValidatedJson<RenameRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let sid = parse_uuid(&session_id)?;

    state
        .chat_service
        .rename_session(&auth.account.id, &sid, &payload.title)
        .await?;

    let elapsed = start.elapsed().as_millis() as u64;

    Ok(Json(ApiResponse::success(
        serde_json::json!({"id": sid, "title": payload.title}),
        request_id,
        elapsed,
    )))
}

/// DELETE /api/v1/sessions/{id} - Delete a session and its messages. Owner-only.
pub async fn delete_session(
    State(state): State<AppState>,
    auth: CurrentAccount,
    Path(session_id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let sid = parse_uuid(&session_id)?;

    state
        .chat_service
        .delete_session(&auth.account.id, &sid)
        .await?;

    let elapsed = start.elapsed().as_millis() as u64;

    Ok(Json(ApiResponse::success(
        serde_json::json!({"deleted": true}),
        request_id,
        elapsed,
    )))
}

/// GET /api/v1/sessions/{id}/messages - Get messages, oldest first. Owner-only.
pub async fn get_messages(
    State(state): State<AppState>,
    auth: CurrentAccount,
    Path(session_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<serde_json::Value>>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let sid = parse_uuid(&session_id)?;

    let messages = state
        .chat_service
        .get_messages(&auth.account.id, &sid)
        .await?;

    let elapsed = start.elapsed().as_millis() as u64;

    let messages_json: Vec<serde_json::Value> = messages
        .iter()
        .filter_map(|m| serde_json::to_value(m).ok())
        .collect();

    Ok(Json(ApiResponse::success(messages_json, request_id, elapsed)))
}
