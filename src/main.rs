use std::sync::Arc;

use axum::routing::get;
use axum_prometheus::PrometheusMetricLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use preview_resolver::config::Config;
use preview_resolver::preview::PreviewResolver;
use preview_resolver::routes::create_router;
use preview_resolver::state::AppState;

#[tokio::main]
async fn main() {
    // Initialize tracing — JSON in production, human-readable in dev.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "preview_resolver=info,tower_http=info".parse().unwrap());

    if std::env::var("APP_ENV").as_deref() == Ok("production") {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    info!("🚀 Preview resolver starting...");

    let config = Config::from_env().expect("Failed to load configuration");
    info!(
        fetch_timeout = ?config.fetch_timeout,
        min_html_len = config.min_html_len,
        mirror = %config.mirror_base_url,
        dev = config.is_dev,
        "📝 Configuration loaded"
    );

    let resolver = PreviewResolver::from_config(&config).expect("Failed to build HTTP clients");
    let app_state = AppState {
        resolver: Arc::new(resolver),
    };

    // Prometheus metrics layer
    let (prometheus_layer, metric_handle) = PrometheusMetricLayer::pair();

    let app = create_router(app_state)
        .route(
            "/metrics",
            get(move || async move { metric_handle.render() }),
        )
        .layer(prometheus_layer)
        .layer(TraceLayer::new_for_http());

    let addr = config.server_addr();
    info!("🎧 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .await
        .expect("Server failed to start");
}
