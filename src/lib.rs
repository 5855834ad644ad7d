// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod adapter;
pub mod aggregator;
pub mod api;
pub mod config;
pub mod error;
pub mod export;
pub mod gateway;
pub mod marketplace;
pub mod metrics;
pub mod price;
pub mod pricing;

// ---- Re-exports for stable public API ----
pub use crate::aggregator::{Aggregator, SourceOutcome};
pub use crate::api::{create_router, AppState};
pub use crate::error::{FetchCause, FetchError};
pub use crate::marketplace::{Marketplace, MarketplaceQuery};
pub use crate::price::{extract_price, Money};
pub use crate::pricing::{MarketSummary, MarketplaceRecord};
