//! JSON body extractor that reports rejections in the error envelope.
//!
//! axum's `Json` rejects malformed or incomplete bodies with a plain-text
//! 422 outside the response envelope. Handlers take this wrapper instead,
//! so a missing field comes back as an enveloped 400 validation error.

use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;

use crate::http::error::AppError;

#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ValidatedJson<T>(pub T);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}
