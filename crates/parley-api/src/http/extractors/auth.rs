//! Bearer token authentication extractor.
//!
//! Extracts and verifies tokens from:
//! - `Authorization: Bearer <token>` header
//! - `X-API-Key: <token>` header
//!
//! Tokens are SHA-256 hashed and resolved to an account through the
//! `auth_tokens` table. The resolved [`Account`] travels with the request
//! as a plain value; nothing about the caller is global state.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use parley_core::repository::account::AccountRepository;
use parley_infra::crypto::token::hash_token;
use parley_types::account::Account;

use crate::http::error::AppError;
use crate::state::AppState;

/// The authenticated caller. Extracting this validates the bearer token.
pub struct CurrentAccount {
    pub account: Account,
    /// Hash of the presented token, kept so logout can revoke exactly it.
    pub token_hash: String,
}

impl FromRequestParts<AppState> for CurrentAccount {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_token(parts)?;
        let token_hash = hash_token(&token);

        let account = state
            .account_service
            .repo()
            .find_account_by_token_hash(&token_hash)
            .await
            .map_err(|e| AppError::Internal(format!("Database error: {e}")))?;

        match account {
            Some(account) => {
                // Update last_used_at (best effort, don't fail the request)
                let _ = state
                    .account_service
                    .repo()
                    .touch_token(&token_hash)
                    .await;
                Ok(CurrentAccount {
                    account,
                    token_hash,
                })
            }
            None => Err(AppError::Unauthorized(
                "Invalid token. Provide a valid token via 'Authorization: Bearer <token>' or 'X-API-Key: <token>' header.".to_string(),
            )),
        }
    }
}

/// Extract the bearer token from request headers.
fn extract_token(parts: &Parts) -> Result<String, AppError> {
    // Try Authorization: Bearer <token>
    if let Some(auth) = parts.headers.get("authorization") {
        let auth_str = auth.to_str().map_err(|_| {
            AppError::Unauthorized("Invalid Authorization header encoding".to_string())
        })?;
        if let Some(token) = auth_str.strip_prefix("Bearer ") {
            return Ok(token.trim().to_string());
        }
    }

    // Try X-API-Key header
    if let Some(token) = parts.headers.get("x-api-key") {
        let token_str = token.to_str().map_err(|_| {
            AppError::Unauthorized("Invalid X-API-Key header encoding".to_string())
        })?;
        return Ok(token_str.trim().to_string());
    }

    Err(AppError::Unauthorized(
        "Missing token. Provide via 'Authorization: Bearer <token>' or 'X-API-Key: <token>' header.".to_string(),
    ))
}
