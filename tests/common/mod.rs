// Each integration test file is a separate binary; helpers not used in every
// binary would otherwise trigger dead_code warnings from clippy.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use preview_resolver::{
    config::Config, preview::PreviewResolver, routes::create_router, state::AppState,
};

/// An address nothing listens on; connecting fails immediately.
pub const UNREACHABLE: &str = "http://127.0.0.1:1";

/// Build the full application router with outbound fetches pointed at
/// `mirror_base` for the fallback path.
pub fn create_test_app(mirror_base: &str) -> Router {
    create_test_app_with_timeout(mirror_base, Duration::from_secs(5))
}

pub fn create_test_app_with_timeout(mirror_base: &str, fetch_timeout: Duration) -> Router {
    let config = Config {
        fetch_timeout,
        mirror_base_url: format!("{}/", mirror_base.trim_end_matches('/')),
        ..Config::default()
    };
    let resolver = PreviewResolver::from_config(&config).expect("Failed to build resolver");
    create_router(AppState {
        resolver: Arc::new(resolver),
    })
}

/// HTML long enough to clear the usable-content threshold.
pub fn article_html(title: &str) -> String {
    format!(
        r#"<!doctype html><html><head>
        <title>{title} | Daily Bread</title>
        <meta property="og:title" content="{title}">
        <meta property="og:description" content="A short reflection for today.">
        <meta property="og:image" content="/images/cover.jpg">
        <meta property="og:site_name" content="Daily Bread">
        </head><body><p>{}</p></body></html>"#,
        "Give us this day our daily bread. ".repeat(8)
    )
}

// ── Request helpers ──────────────────────────────────────────────────────────

pub async fn post_raw(app: Router, uri: &str, body: &str) -> (StatusCode, HeaderMap, Value) {
    let req = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, req).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let (status, _, json) = post_raw(app, uri, &body.to_string()).await;
    (status, json)
}

pub async fn request(app: Router, method: Method, uri: &str) -> (StatusCode, HeaderMap, Value) {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, req).await
}

/// Like `request` but returns the body as text, for non-JSON responses.
pub async fn request_text(app: Router, method: Method, uri: &str) -> (StatusCode, HeaderMap, String) {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, headers, String::from_utf8_lossy(&bytes).into_owned())
}

async fn send(app: Router, req: Request<Body>) -> (StatusCode, HeaderMap, Value) {
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, headers, json)
}
