// src/export.rs
//! Spreadsheet export. One row per priced record; failed sources are left out.

use anyhow::{anyhow, Context, Result};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::pricing::MarketplaceRecord;

pub const HEADERS: [&str; 4] = ["Marketplace", "Price", "Profit", "Recommended Selling Price"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRow {
    pub marketplace: String,
    pub price: Decimal,
    pub profit: Decimal,
    pub recommended_price: Decimal,
}

pub fn rows(records: &[MarketplaceRecord]) -> Vec<ExportRow> {
    records
        .iter()
        .filter_map(|r| match r {
            MarketplaceRecord::Priced {
                marketplace,
                price,
                profit,
                recommended_price,
            } => Some(ExportRow {
                marketplace: marketplace.name().to_string(),
                price: *price,
                profit: *profit,
                recommended_price: *recommended_price,
            }),
            MarketplaceRecord::Failed { .. } => None,
        })
        .collect()
}

pub fn to_csv(records: &[MarketplaceRecord]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(HEADERS).context("writing csv header")?;
    for row in rows(records) {
        wtr.write_record([
            row.marketplace,
            row.price.to_string(),
            row.profit.to_string(),
            row.recommended_price.to_string(),
        ])
        .context("writing csv row")?;
    }
    let bytes = wtr
        .into_inner()
        .map_err(|e| anyhow!("flushing csv writer: {}", e.error()))?;
    String::from_utf8(bytes).context("csv output is not utf-8")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marketplace::Marketplace;
    use rust_decimal_macros::dec;

    #[test]
    fn failed_sources_are_not_exported() {
        let records = vec![
            MarketplaceRecord::Priced {
                marketplace: Marketplace::Ebay,
                price: dec!(15.50),
                profit: dec!(5.50),
                recommended_price: dec!(12.0),
            },
            MarketplaceRecord::Failed {
                marketplace: Marketplace::Amazon,
                error: "gateway returned HTTP 403".into(),
            },
        ];
        let csv = to_csv(&records).unwrap();
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Marketplace,Price,Profit,Recommended Selling Price",
                "eBay,15.50,5.50,12.0",
            ]
        );
    }
}
