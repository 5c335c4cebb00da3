use axum::{
    http::{header, HeaderValue},
    routing::{get, post},
    Router,
};
use tower_http::{catch_panic::CatchPanicLayer, set_header::SetResponseHeaderLayer};

use crate::handlers::{self, link_preview};
use crate::state::AppState;

/// Build the application router. Every response, panics and 405s included,
/// carries the permissive CORS headers the mobile client expects.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route(
            "/link-preview",
            post(link_preview::resolve_preview)
                .options(link_preview::preflight)
                .fallback(link_preview::method_not_allowed),
        )
        .layer(CatchPanicLayer::custom(link_preview::panic_response))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(link_preview::CORS_ALLOW_HEADERS),
        ))
        .with_state(state)
}
