//! HTTP API handlers.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use metrics::counter;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use tracing::error;

use crate::metrics::{METRIC_STATS_READS, METRIC_STATS_UPDATES, METRIC_STATS_UPDATE_FAILURES};
use crate::store::{StatsRecord, StatsStore, StatsUpdate};

/// Application state shared with handlers.
#[derive(Clone)]
pub struct AppState {
    /// The file-backed stats store.
    pub store: Arc<StatsStore>,
    /// Handle for rendering Prometheus exposition text.
    pub prometheus: PrometheusHandle,
}

impl AppState {
    /// Create new app state.
    pub fn new(store: StatsStore, prometheus: PrometheusHandle) -> Self {
        Self {
            store: Arc::new(store),
            prometheus,
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status: "ok".
    pub status: &'static str,
}

/// Successful update response: echoes the new record.
#[derive(Debug, Serialize)]
pub struct UpdateResponse {
    /// Always true on the success path.
    pub success: bool,
    /// The record after the update.
    pub stats: StatsRecord,
}

/// Health check handler - always returns 200.
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}

/// GET /api/stats - returns the current record. Never fails: the store is
/// always seeded with some valid record by the time the router exists.
pub async fn get_stats(State(state): State<AppState>) -> Json<StatsRecord> {
    counter!(METRIC_STATS_READS).increment(1);
    Json(state.store.get().await)
}

/// POST /api/stats - merge the payload into the record and persist.
///
/// The body is parsed manually rather than through the `Json` extractor so
/// that malformed payloads surface as a 500 with the parse error as a plain
/// body, and so no particular Content-Type is demanded of clients.
pub async fn update_stats(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<UpdateResponse>, (StatusCode, String)> {
    let update: StatsUpdate = serde_json::from_slice(&body).map_err(|e| {
        counter!(METRIC_STATS_UPDATE_FAILURES).increment(1);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("invalid stats payload: {e}"),
        )
    })?;

    match state.store.update(update).await {
        Ok(stats) => {
            counter!(METRIC_STATS_UPDATES).increment(1);
            Ok(Json(UpdateResponse {
                success: true,
                stats,
            }))
        }
        Err(e) => {
            counter!(METRIC_STATS_UPDATE_FAILURES).increment(1);
            error!("failed to persist stats update: {e}");
            Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}

/// GET /metrics - Prometheus exposition text.
pub async fn render_metrics(State(state): State<AppState>) -> String {
    state.prometheus.render()
}
