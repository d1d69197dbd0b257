//! Prometheus metrics for the stats service.

use metrics::describe_counter;
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

// === Metric Name Constants ===

/// Stats reads counter metric name.
pub const METRIC_STATS_READS: &str = "stats_reads_total";
/// Stats updates counter metric name.
pub const METRIC_STATS_UPDATES: &str = "stats_updates_total";
/// Failed stats updates counter metric name.
pub const METRIC_STATS_UPDATE_FAILURES: &str = "stats_update_failures_total";

/// Install the Prometheus recorder and register metric descriptions.
/// Call this once at startup; the returned handle renders the exposition
/// text for the `/metrics` endpoint.
pub fn install() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;

    describe_counter!(METRIC_STATS_READS, "Stats record reads served");
    describe_counter!(METRIC_STATS_UPDATES, "Stats record updates persisted");
    describe_counter!(
        METRIC_STATS_UPDATE_FAILURES,
        "Stats updates rejected or failed to persist"
    );

    Ok(handle)
}
