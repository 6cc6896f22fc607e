use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

/// One-time metrics registration (so series carry descriptions on /metrics).
pub fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(describe_all);
}

fn describe_all() {
    describe_counter!("ranking_batches_total", "Ranking calls completed.");
    describe_counter!(
        "ranking_articles_total",
        "Articles scored across all batches."
    );
    describe_counter!(
        "ranking_penalized_total",
        "Results that received a diversity penalty."
    );
    describe_histogram!(
        "ranking_duration_ms",
        "Wall-clock time per ranking call in milliseconds."
    );
}

/// Install a global Prometheus recorder and return the handle used to render it.
/// Descriptions are re-sent to the new recorder.
pub fn install_prometheus() -> anyhow::Result<PrometheusHandle> {
    // Use default buckets to avoid API differences across crate versions.
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("prometheus: install recorder: {e}"))?;
    describe_all();
    Ok(handle)
}
