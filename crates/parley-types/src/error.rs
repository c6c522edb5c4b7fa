use thiserror::Error;

use crate::llm::LlmError;

/// Errors from repository operations (used by trait definitions in parley-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Errors related to account operations.
#[derive(Debug, Error)]
pub enum AccountError {
    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("username '{0}' already exists")]
    UsernameConflict(String),

    #[error("invalid username: {0}")]
    InvalidUsername(String),

    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error("storage error: {0}")]
    Storage(String),
}

/// Errors related to session administration.
///
/// `NotFound` covers both unknown ids and sessions owned by another
/// account: callers cannot distinguish the two, so foreign sessions are
/// not enumerable.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session not found")]
    NotFound,

    #[error("session belongs to another account")]
    Forbidden,

    #[error("session title must not be empty")]
    EmptyTitle,

    #[error("storage error: {0}")]
    Storage(String),
}

/// Errors related to model registry administration.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model not found")]
    NotFound,

    #[error("cannot delete the last remaining model")]
    LastEntry,

    #[error("model name and model ref are required")]
    MissingFields,

    #[error("storage error: {0}")]
    Storage(String),
}

/// Errors from a single chat turn.
#[derive(Debug, Error)]
pub enum TurnError {
    #[error("session not found")]
    SessionNotFound,

    #[error("message must not be empty")]
    EmptyMessage,

    #[error("no model available")]
    NoModelAvailable,

    #[error(transparent)]
    Invocation(#[from] LlmError),

    #[error("storage error: {0}")]
    Storage(String),
}

impl From<RepositoryError> for TurnError {
    fn from(e: RepositoryError) -> Self {
        TurnError::Storage(e.to_string())
    }
}

impl From<RepositoryError> for SessionError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound => SessionError::NotFound,
            other => SessionError::Storage(other.to_string()),
        }
    }
}

impl From<RepositoryError> for ModelError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound => ModelError::NotFound,
            other => ModelError::Storage(other.to_string()),
        }
    }
}

impl From<RepositoryError> for AccountError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::Conflict(msg) => AccountError::UsernameConflict(msg),
            other => AccountError::Storage(other.to_string()),
        }
    }
}
