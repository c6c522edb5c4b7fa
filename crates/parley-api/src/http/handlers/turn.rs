//! Chat turn HTTP handler.
//!
//! POST /api/v1/chat - Submit one user message and receive the model reply.
//!
//! The user message is persisted before invocation: a provider failure
//! returns an error but the message stays in the transcript.

use std::time::Instant;

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::http::error::AppError;
use crate::http::extractors::auth::CurrentAccount;
use crate::http::extractors::json::ValidatedJson;
use crate::http::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TurnRequest {
    pub session_id: Uuid,
    pub message: String,
    /// Optional explicit model selection. Unknown ids fall back to the
    /// registry default.
    #[serde(default)]
    pub model_id: Option<Uuid>,
}

/// POST /api/v1/chat - Submit a chat turn.
pub async fn submit_turn(
    State(state): State<AppState>,
    auth: CurrentAccount,
    ValidatedJson(payload): ValidatedJson<TurnRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let reply = state
        .chat_service
        .submit_turn(
            &auth.account.id,
            &payload.session_id,
            &payload.message,
            payload.model_id.as_ref(),
        )
        .await?;

    let elapsed = start.elapsed().as_millis() as u64;

    let data = serde_json::json!({
        "response": reply.response,
        "session_id": reply.session_id,
        "model_id": reply.model_id,
    });

    Ok(Json(ApiResponse::success(data, request_id, elapsed)))
}
