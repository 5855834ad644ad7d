// src/aggregator.rs
//! Runs every marketplace adapter concurrently and collects one outcome
//! per configured source, in configuration order. A failing source
//! becomes an error outcome; it never aborts or delays the others beyond
//! its own timeout.

use futures::future::join_all;
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;

use crate::adapter::{MarketplaceAdapter, PriceObservation};
use crate::config::PricerConfig;
use crate::error::{FetchError, QueryError};
use crate::gateway::{FetchGateway, ScraperApiGateway};
use crate::marketplace::{Marketplace, MarketplaceQuery};
use crate::pricing::{price_records, MarketplaceRecord};

/// Result of one adapter invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceOutcome {
    pub marketplace: Marketplace,
    pub result: Result<PriceObservation, FetchError>,
}

impl SourceOutcome {
    /// Priced records on success (possibly none), a single error record on failure.
    pub fn into_records(self, base_price: Decimal, margin: Decimal) -> Vec<MarketplaceRecord> {
        match self.result {
            Ok(obs) => price_records(self.marketplace, &obs.prices, base_price, margin),
            Err(e) => vec![MarketplaceRecord::Failed {
                marketplace: self.marketplace,
                error: e.cause.to_string(),
            }],
        }
    }
}

#[derive(Clone)]
pub struct Aggregator {
    adapters: Vec<MarketplaceAdapter>,
}

impl Aggregator {
    /// One adapter per entry of [`Marketplace::ALL`], all sharing `gateway`.
    pub fn new(gateway: Arc<dyn FetchGateway>, timeout: Duration) -> Self {
        tracing::debug!(
            gateway = gateway.name(),
            timeout_ms = timeout.as_millis() as u64,
            "building marketplace adapters"
        );
        let adapters = Marketplace::ALL
            .into_iter()
            .map(|m| MarketplaceAdapter::new(m, gateway.clone(), timeout))
            .collect();
        Self { adapters }
    }

    pub fn from_config(cfg: &PricerConfig) -> Result<Self, reqwest::Error> {
        let gateway = ScraperApiGateway::new(&cfg.gateway)?;
        Ok(Self::new(Arc::new(gateway), cfg.gateway.timeout()))
    }

    pub fn marketplaces(&self) -> Vec<Marketplace> {
        self.adapters.iter().map(|a| a.marketplace()).collect()
    }

    /// Fetch every source concurrently. Output length and order always
    /// match the configured sources, whatever finishes first. The fetches
    /// run inside the caller's future, so dropping it cancels them.
    pub async fn fetch_all(&self, query: &MarketplaceQuery) -> Vec<SourceOutcome> {
        let fetches = self.adapters.iter().map(|adapter| async move {
            SourceOutcome {
                marketplace: adapter.marketplace(),
                result: adapter.fetch(query).await,
            }
        });
        join_all(fetches).await
    }

    /// Caller-facing entry point: fetch all sources and price every observation.
    pub async fn fetch_all_marketplace_data(
        &self,
        product_name: &str,
        base_price: Decimal,
        margin: Decimal,
    ) -> Result<Vec<MarketplaceRecord>, QueryError> {
        let query = MarketplaceQuery::new(product_name)?;
        let outcomes = self.fetch_all(&query).await;

        let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
        tracing::info!(
            product = query.product_name(),
            sources = outcomes.len(),
            failed,
            "aggregation finished"
        );

        Ok(outcomes
            .into_iter()
            .flat_map(|o| o.into_records(base_price, margin))
            .collect())
    }
}
