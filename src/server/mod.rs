pub mod handlers;
pub mod state;

use crate::config::Config;
use axum::http::{Method, header};
use axum::{
    Router,
    routing::{get, post},
};
use state::AppState;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

/// Build the full router. Separated from `start` so tests can drive it
/// without binding a listener.
pub fn build_router(config: Config) -> Router {
    let state = AppState::new(config);

    // A cast receiver on another origin must be able to read the range and
    // length headers, so they are exposed on every response.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::RANGE, header::CONTENT_TYPE])
        .expose_headers([
            header::CONTENT_RANGE,
            header::CONTENT_LENGTH,
            header::ACCEPT_RANGES,
            header::CONTENT_TYPE,
        ]);

    Router::new()
        .route("/", get(handlers::health::health_check))
        .route("/health", get(handlers::health::health_check))
        .route("/api/info", get(handlers::health::server_info))
        .route("/api/status", get(handlers::status::get_status))
        .route(
            "/api/channels",
            get(handlers::channels::list_channels).post(handlers::channels::replace_channels),
        )
        .route("/api/scan", post(handlers::channels::trigger_scan))
        .route("/api/browse", get(handlers::browse::browse))
        .route("/video", get(handlers::video::serve_video))
        .layer(cors)
        .with_state(state)
}

/// Start the Axum HTTP server
pub async fn start(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("0.0.0.0:{}", config.port);
    let port = config.port;

    let app = build_router(config);

    // Bind TCP listener — the one fatal startup error.
    let listener = match tokio::net::TcpListener::bind(addr.as_str()).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to address {}: {}", addr, e);
            return Err(e.into());
        }
    };

    info!("📺 Telecast is live!");
    info!("🚀 Local:   http://localhost:{}", port);
    info!("📡 Network: http://{}:{}", handlers::health::local_ip(), port);

    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
