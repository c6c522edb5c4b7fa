//! Application error type mapping to HTTP status codes and envelope format.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use parley_types::error::{AccountError, ModelError, SessionError, TurnError};
use parley_types::llm::LlmError;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Account and credential errors.
    Account(AccountError),
    /// Session administration errors.
    Session(SessionError),
    /// Model registry errors.
    Model(ModelError),
    /// Chat turn errors.
    Turn(TurnError),
    /// Authentication failure.
    Unauthorized(String),
    /// Validation error.
    Validation(String),
    /// Generic internal error.
    Internal(String),
}

impl From<AccountError> for AppError {
    fn from(e: AccountError) -> Self {
        AppError::Account(e)
    }
}

impl From<SessionError> for AppError {
    fn from(e: SessionError) -> Self {
        AppError::Session(e)
    }
}

impl From<ModelError> for AppError {
    fn from(e: ModelError) -> Self {
        AppError::Model(e)
    }
}

impl From<TurnError> for AppError {
    fn from(e: TurnError) -> Self {
        AppError::Turn(e)
    }
}

impl AppError {
    /// Status code, machine-readable code, and message for the response.
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Account(AccountError::InvalidCredentials) => (
                StatusCode::UNAUTHORIZED,
                "INVALID_CREDENTIALS",
                "Invalid username or password".to_string(),
            ),
            AppError::Account(AccountError::UsernameConflict(name)) => (
                StatusCode::CONFLICT,
                "USERNAME_CONFLICT",
                format!("Username '{name}' already exists"),
            ),
            AppError::Account(AccountError::InvalidUsername(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Account(e) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "ACCOUNT_ERROR", e.to_string())
            }
            AppError::Session(SessionError::NotFound) => (
                StatusCode::NOT_FOUND,
                "SESSION_NOT_FOUND",
                "Session not found".to_string(),
            ),
            // Foreign sessions are reported exactly like missing ones so
            // other accounts' sessions are not enumerable.
            AppError::Session(SessionError::Forbidden) => (
                StatusCode::NOT_FOUND,
                "SESSION_NOT_FOUND",
                "Session not found".to_string(),
            ),
            AppError::Session(SessionError::EmptyTitle) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                "Session title must not be empty".to_string(),
            ),
            AppError::Session(e) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "SESSION_ERROR", e.to_string())
            }
            AppError::Model(ModelError::NotFound) => (
                StatusCode::NOT_FOUND,
                "MODEL_NOT_FOUND",
                "Model not found".to_string(),
            ),
            AppError::Model(ModelError::LastEntry) => (
                StatusCode::CONFLICT,
                "LAST_MODEL",
                "Cannot delete the last remaining model".to_string(),
            ),
            AppError::Model(ModelError::MissingFields) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                "Model name and model ref are required".to_string(),
            ),
            AppError::Model(e) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "MODEL_ERROR", e.to_string())
            }
            AppError::Turn(TurnError::SessionNotFound) => (
                StatusCode::NOT_FOUND,
                "SESSION_NOT_FOUND",
                "Session not found".to_string(),
            ),
            AppError::Turn(TurnError::EmptyMessage) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                "Message must not be empty".to_string(),
            ),
            AppError::Turn(TurnError::NoModelAvailable) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "NO_MODEL_AVAILABLE",
                "No model available; register one first".to_string(),
            ),
            // Provider failures surface as 500 with the provider's error
            // text; the persisted user message stays in the transcript.
            AppError::Turn(TurnError::Invocation(e)) => {
                let code = match e {
                    LlmError::RoutingProfileRequired { .. } => "ROUTING_PROFILE_REQUIRED",
                    _ => "UPSTREAM_ERROR",
                };
                (StatusCode::INTERNAL_SERVER_ERROR, code, e.to_string())
            }
            AppError::Turn(e) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "TURN_ERROR", e.to_string())
            }
            AppError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
            }
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg.clone())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        let body = json!({
            "data": null,
            "meta": {
                "request_id": "",
                "timestamp": chrono::Utc::now().to_rfc3339(),
                "response_time_ms": 0
            },
            "errors": [{
                "code": code,
                "message": message,
            }]
        });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_errors_map_to_expected_statuses() {
        assert_eq!(
            AppError::Session(SessionError::NotFound).parts().0,
            StatusCode::NOT_FOUND
        );
        // Foreign and missing sessions are indistinguishable to callers
        assert_eq!(
            AppError::Session(SessionError::Forbidden).parts().0,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Session(SessionError::EmptyTitle).parts().0,
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_model_errors_map_to_expected_statuses() {
        assert_eq!(
            AppError::Model(ModelError::LastEntry).parts().0,
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::Model(ModelError::NotFound).parts().0,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Model(ModelError::MissingFields).parts().0,
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_invocation_error_surfaces_provider_message() {
        let err = AppError::Turn(TurnError::Invocation(LlmError::Provider {
            message: "HTTP 500: boom".to_string(),
        }));
        let (status, code, message) = err.parts();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(code, "UPSTREAM_ERROR");
        assert!(message.contains("boom"));
    }

    #[test]
    fn test_routing_profile_error_has_friendly_code() {
        let err = AppError::Turn(TurnError::Invocation(LlmError::RoutingProfileRequired {
            model_ref: "anthropic.claude-opus-4-v1:0".to_string(),
        }));
        let (status, code, _) = err.parts();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(code, "ROUTING_PROFILE_REQUIRED");
    }

    #[test]
    fn test_credentials_collapse_to_401() {
        assert_eq!(
            AppError::Account(AccountError::InvalidCredentials).parts().0,
            StatusCode::UNAUTHORIZED
        );
    }
}
