//! API Routes
//!
//! Configures the Axum router with all admin endpoints.

use axum::{
    routing::{delete, get, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    clear_handler, clear_metrics_handler, get_content_handler, health_handler, invalidate_handler,
    metrics_handler, set_content_handler, snapshot_handler, stats_handler, update_config_handler,
    AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `PUT /content` - Cache JSON content under a key
/// - `GET /content/:key` - Read cached content
/// - `DELETE /cache` - Clear every entry and reset counters
/// - `DELETE /cache/:key` - Clear one entry
/// - `GET /stats` - Cache statistics
/// - `GET /metrics` - Windowed average of performance samples
/// - `DELETE /metrics` - Drop every recorded sample
/// - `GET /metrics/snapshot` - Recent samples and live configuration
/// - `PUT /config` - Partial configuration update
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/content", put(set_content_handler))
        .route("/content/:key", get(get_content_handler))
        .route("/cache", delete(clear_handler))
        .route("/cache/:key", delete(invalidate_handler))
        .route("/stats", get(stats_handler))
        .route("/metrics", get(metrics_handler).delete(clear_metrics_handler))
        .route("/metrics/snapshot", get(snapshot_handler))
        .route("/config", put(update_config_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
