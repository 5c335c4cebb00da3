use std::any::Any;

use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use bytes::Bytes;
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::models::{Preview, PreviewRequest};
use crate::preview::normalize::Target;
use crate::state::AppState;

pub const CORS_ALLOW_HEADERS: &str = "authorization, x-client-info, apikey, content-type";

// ── Handlers ───────────────────────────────────────────────────────────────

/// POST /link-preview  `{ "url": "<url>" }`
///
/// Request problems are 400s. Everything after validation answers 200 with
/// a `Preview`, whose `ok` flag tells the caller whether a preview exists.
pub async fn resolve_preview(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> AppResult<Json<Preview>> {
    // Oversized or unreadable bodies get the same JSON 400 as malformed ones.
    let body = body.map_err(|e| {
        tracing::debug!(error = %e, "Failed to buffer link preview request body");
        AppError::Validation("Invalid JSON body".into())
    })?;

    let request: PreviewRequest = serde_json::from_slice(&body)
        .map_err(|_| AppError::Validation("Invalid JSON body".into()))?;

    let target = Target::parse(request.url.as_deref().unwrap_or_default())?;

    let preview = state.resolver.resolve(&target).await?;
    Ok(Json(preview))
}

/// OPTIONS /link-preview — CORS preflight. Headers are added by the router.
pub async fn preflight() -> &'static str {
    "ok"
}

pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

/// Outermost catch-all: a panic anywhere below becomes a 200 soft failure.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown error".to_string()
    };

    tracing::error!(panic = %message, "Link preview handler panicked");
    (StatusCode::OK, Json(json!({ "ok": false, "error": message }))).into_response()
}

// ── Unit tests ─────────────────────────────────────────────────────────────
