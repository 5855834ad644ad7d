// src/adapter.rs
//! Marketplace adapter: one instance per source. Builds the search URL,
//! fetches it through the gateway under a timeout, and extracts prices.
//! Failures are returned, never handled here.

use metrics::{counter, histogram};
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::{FetchCause, FetchError};
use crate::gateway::FetchGateway;
use crate::marketplace::{Marketplace, MarketplaceQuery};
use crate::metrics::ensure_metrics_described;
use crate::price::Money;

/// Prices observed on one marketplace, in document order (at most 5).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceObservation {
    pub marketplace: Marketplace,
    pub prices: Vec<Money>,
}

#[derive(Clone)]
pub struct MarketplaceAdapter {
    marketplace: Marketplace,
    gateway: Arc<dyn FetchGateway>,
    timeout: Duration,
}

impl MarketplaceAdapter {
    pub fn new(marketplace: Marketplace, gateway: Arc<dyn FetchGateway>, timeout: Duration) -> Self {
        Self {
            marketplace,
            gateway,
            timeout,
        }
    }

    pub fn marketplace(&self) -> Marketplace {
        self.marketplace
    }

    pub async fn fetch(&self, query: &MarketplaceQuery) -> Result<PriceObservation, FetchError> {
        ensure_metrics_described();
        let t0 = Instant::now();
        let name = self.marketplace.name();
        counter!("marketplace_fetch_total", "marketplace" => name).increment(1);

        let result = self.fetch_inner(query).await;

        let ms = t0.elapsed().as_secs_f64() * 1_000.0;
        histogram!("marketplace_fetch_ms", "marketplace" => name).record(ms);
        match &result {
            Ok(obs) => {
                counter!("marketplace_prices_extracted_total", "marketplace" => name)
                    .increment(obs.prices.len() as u64);
                tracing::info!(
                    marketplace = name,
                    prices = obs.prices.len(),
                    elapsed_ms = ms as u64,
                    "marketplace fetched"
                );
            }
            Err(e) => {
                counter!(
                    "marketplace_fetch_errors_total",
                    "marketplace" => name,
                    "kind" => e.cause.kind()
                )
                .increment(1);
                tracing::warn!(
                    marketplace = name,
                    error = %e.cause,
                    elapsed_ms = ms as u64,
                    "marketplace fetch failed"
                );
            }
        }
        result
    }

    async fn fetch_inner(&self, query: &MarketplaceQuery) -> Result<PriceObservation, FetchError> {
        let url = self.marketplace.search_url(query);
        let body = match tokio::time::timeout(self.timeout, self.gateway.fetch_page(&url)).await {
            Ok(Ok(body)) => body,
            Ok(Err(cause)) => return Err(FetchError::new(self.marketplace, cause)),
            Err(_elapsed) => {
                return Err(FetchError::new(
                    self.marketplace,
                    FetchCause::Timeout(self.timeout),
                ))
            }
        };

        let prices = self
            .marketplace
            .extract_prices(&body)
            .map_err(|cause| FetchError::new(self.marketplace, cause))?;
        Ok(PriceObservation {
            marketplace: self.marketplace,
            prices,
        })
    }
}
