//! # Pricing Engine
//!
//! Turns observed marketplace prices into caller-facing records:
//!
//! - `profit = price - base_price` (negative values are kept as-is)
//! - `recommended_price = base_price * (1 + margin)`, independent of the
//!   observed price
//!
//! No rounding is applied to records. [`MarketSummary`] adds an aggregate
//! view across all successful observations of one call, and
//! [`profit_breakdown`] checks a single listing after fees and shipping.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::marketplace::Marketplace;
use crate::price::Money;

/// One result row. Success and failure shapes are mutually exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum MarketplaceRecord {
    Priced {
        marketplace: Marketplace,
        price: Decimal,
        profit: Decimal,
        recommended_price: Decimal,
    },
    Failed {
        marketplace: Marketplace,
        error: String,
    },
}

impl MarketplaceRecord {
    pub fn marketplace(&self) -> Marketplace {
        match self {
            MarketplaceRecord::Priced { marketplace, .. }
            | MarketplaceRecord::Failed { marketplace, .. } => *marketplace,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, MarketplaceRecord::Failed { .. })
    }
}

pub fn recommended_price(base_price: Decimal, margin: Decimal) -> Decimal {
    base_price * (Decimal::ONE + margin)
}

/// One record per observed price. Empty input yields no records.
pub fn price_records(
    marketplace: Marketplace,
    prices: &[Money],
    base_price: Decimal,
    margin: Decimal,
) -> Vec<MarketplaceRecord> {
    let recommended = recommended_price(base_price, margin);
    prices
        .iter()
        .map(|p| MarketplaceRecord::Priced {
            marketplace,
            price: p.amount,
            profit: p.amount - base_price,
            recommended_price: recommended,
        })
        .collect()
}

/// Spread of the prices seen in one aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarketSummary {
    pub count: usize,
    pub lowest: Decimal,
    pub highest: Decimal,
    pub average: Decimal,
    /// Competitive price a quarter of the way into the observed range.
    pub market_price: Decimal,
}

impl MarketSummary {
    pub fn from_records(records: &[MarketplaceRecord]) -> Option<Self> {
        let prices: Vec<Decimal> = records
            .iter()
            .filter_map(|r| match r {
                MarketplaceRecord::Priced { price, .. } => Some(*price),
                MarketplaceRecord::Failed { .. } => None,
            })
            .collect();

        let lowest = prices.iter().copied().min()?;
        let highest = prices.iter().copied().max()?;
        let count = prices.len();
        let sum: Decimal = prices.iter().copied().sum();
        let average = round2(sum / Decimal::from(count));
        let market_price = round2(lowest + (highest - lowest) * Decimal::new(25, 2));

        Some(Self {
            count,
            lowest,
            highest,
            average,
            market_price,
        })
    }
}

fn default_platform_fee_pct() -> Decimal {
    Decimal::TEN
}

/// What it costs to sell one unit at a given price.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ListingCosts {
    pub selling_price: Decimal,
    pub cost: Decimal,
    #[serde(default)]
    pub shipping: Decimal,
    /// Marketplace fee as a percentage of the selling price.
    #[serde(default = "default_platform_fee_pct")]
    pub platform_fee_pct: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfitBreakdown {
    pub platform_fees: Decimal,
    pub total_cost: Decimal,
    pub profit: Decimal,
    /// Profit as a percentage of the selling price; 0 when the price is 0.
    pub margin_pct: Decimal,
    /// Profit as a percentage of total cost; 0 when nothing was spent.
    pub roi_pct: Decimal,
}

pub fn profit_breakdown(c: &ListingCosts) -> ProfitBreakdown {
    let platform_fees = c.selling_price * c.platform_fee_pct / Decimal::ONE_HUNDRED;
    let total_cost = c.cost + c.shipping + platform_fees;
    let profit = c.selling_price - total_cost;
    let margin_pct = if c.selling_price.is_zero() {
        Decimal::ZERO
    } else {
        profit / c.selling_price * Decimal::ONE_HUNDRED
    };
    let roi_pct = if total_cost > Decimal::ZERO {
        profit / total_cost * Decimal::ONE_HUNDRED
    } else {
        Decimal::ZERO
    };

    ProfitBreakdown {
        platform_fees,
        total_cost,
        profit,
        margin_pct,
        roi_pct,
    }
}

fn round2(d: Decimal) -> Decimal {
    d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
