//! HTTP API route definitions.

use std::path::Path;

use axum::routing::get;
use axum::{middleware, Router};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::handlers::{get_stats, health, render_metrics, update_stats, AppState};
use super::middleware::cors_and_cache_headers;

/// Create the service router.
///
/// Everything that is not the stats API or an operational endpoint falls
/// through to static file serving rooted at `static_dir`.
pub fn create_router(state: AppState, static_dir: &Path) -> Router {
    Router::new()
        // Stats endpoint
        .route("/api/stats", get(get_stats).post(update_stats))
        // Operational endpoints
        .route("/health", get(health))
        .route("/metrics", get(render_metrics))
        // Static fallback
        .fallback_service(ServeDir::new(static_dir))
        .layer(middleware::from_fn(cors_and_cache_headers))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
