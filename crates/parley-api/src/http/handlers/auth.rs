//! Authentication HTTP handlers.
//!
//! Endpoints:
//! - POST /api/v1/auth/login  - Exchange credentials for a bearer token
//! - POST /api/v1/auth/logout - Revoke the presented token
//! - GET  /api/v1/auth/me     - Identify the authenticated account

use std::time::Instant;

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use parley_core::repository::account::AccountRepository;
use parley_infra::crypto::token::{generate_token, hash_token};
use parley_types::account::AuthToken;

use crate::http::error::AppError;
use crate::http::extractors::auth::CurrentAccount;
use crate::http::extractors::json::ValidatedJson;
use crate::http::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// POST /api/v1/auth/login - Verify credentials and issue a bearer token.
///
/// The plaintext token is returned once; only its hash is stored.
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let account = state
        .account_service
        .verify_credentials(&payload.username, &payload.password)
        .await?;

    let token = generate_token();
    let auth_token = AuthToken {
        id: Uuid::now_v7(),
        token_hash: hash_token(&token),
        account_id: account.id,
        created_at: Utc::now(),
        last_used_at: None,
    };
    state
        .account_service
        .repo()
        .insert_token(&auth_token)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let elapsed = start.elapsed().as_millis() as u64;

    let data = serde_json::json!({
        "token": token,
        "account": {
            "id": account.id,
            "username": account.username,
        },
    });

    Ok(Json(ApiResponse::success(data, request_id, elapsed)))
}

/// POST /api/v1/auth/logout - Revoke the token used for this request.
pub async fn logout(
    State(state): State<AppState>,
    auth: CurrentAccount,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    state
        .account_service
        .repo()
        .delete_token(&auth.token_hash)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let elapsed = start.elapsed().as_millis() as u64;

    Ok(Json(ApiResponse::success(
        serde_json::json!({"logged_out": true}),
        request_id,
        elapsed,
    )))
}

/// GET /api/v1/auth/me - Return the authenticated account.
pub async fn me(
    auth: CurrentAccount,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let data = serde_json::json!({
        "id": auth.account.id,
        "username": auth.account.username,
        "created_at": auth.account.created_at,
    });

    let elapsed = start.elapsed().as_millis() as u64;

    Ok(Json(ApiResponse::success(data, request_id, elapsed)))
}
