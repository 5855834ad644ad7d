//! Marketplace Pricer — Binary Entrypoint
//! Boots the Axum HTTP server: loads gateway config, builds the aggregator,
//! and wires the price/export routes plus `/metrics`.

use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use marketplace_pricer::config::PricerConfig;
use marketplace_pricer::metrics::Metrics;
use marketplace_pricer::{create_router, Aggregator, AppState};

/// Enable compact tracing logs in development only.
/// Activation requires BOTH:
///   - dev environment (debug build OR SHUTTLE_ENV in {local, development, dev})
///   - PRICER_DEV_LOG=1
fn enable_dev_tracing() {
    let dev_flag = std::env::var("PRICER_DEV_LOG")
        .ok()
        .is_some_and(|v| v == "1");

    let is_dev_env = cfg!(debug_assertions)
        || matches!(
            std::env::var("SHUTTLE_ENV")
                .unwrap_or_default()
                .to_ascii_lowercase()
                .as_str(),
            "local" | "development" | "dev"
        );

    if !(dev_flag && is_dev_env) {
        return;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("marketplace_pricer=debug,warn"));

    // The hosting runtime may already have installed a subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .try_init();
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    enable_dev_tracing();

    let cfg = PricerConfig::load_default()
        .map_err(|e| anyhow::anyhow!("loading pricer config: {e}"))?;
    tracing::info!(gateway = ?cfg.gateway, "pricer config loaded");

    let aggregator = Aggregator::from_config(&cfg)
        .map_err(|e| anyhow::anyhow!("building gateway client: {e}"))?;
    let mut router = create_router(AppState::new(aggregator));

    match Metrics::init() {
        Ok(metrics) => router = router.merge(metrics.router()),
        Err(e) => tracing::warn!(error = %e, "prometheus recorder not installed"),
    }

    Ok(router.into())
}
