use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::preview::normalize::UrlError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    /// Anything that escaped the pipeline. Reported as a soft failure (200)
    /// so callers always receive a JSON body they can degrade on.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<UrlError> for AppError {
    fn from(e: UrlError) -> Self {
        AppError::Validation(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message): (StatusCode, String) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::MethodNotAllowed => {
                (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed".into())
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error while resolving preview: {}", msg);
                (StatusCode::OK, msg)
            }
        };

        (status, Json(json!({ "ok": false, "error": message }))).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
