use axum::{routing::get, Router};
use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

pub struct Metrics {
    pub handle: PrometheusHandle,
}

/// One-time metrics registration (so series show up on /metrics).
pub fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "marketplace_fetch_total",
            "Adapter invocations per marketplace."
        );
        describe_counter!(
            "marketplace_fetch_errors_total",
            "Failed adapter invocations, labelled by cause kind."
        );
        describe_counter!(
            "marketplace_prices_extracted_total",
            "Prices kept after extraction and the per-source cap."
        );
        describe_histogram!(
            "marketplace_fetch_ms",
            "Gateway fetch plus extraction time in milliseconds."
        );
    });
}

impl Metrics {
    /// Install the Prometheus recorder. Fails if another recorder is already set.
    pub fn init() -> Result<Self, BuildError> {
        // Use default buckets to avoid API differences across crate versions.
        let handle = PrometheusBuilder::new().install_recorder()?;
        ensure_metrics_described();
        Ok(Self { handle })
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}
