//! # Marketplaces
//!
//! Fixed table of supported sources. Each row carries the search URL
//! prefix, the CSS selector of price-bearing nodes, and whether the
//! source renders bare numbers that need a sign before extraction.
//!
//! Extraction is pure (`&str` body in, prices out) so every source can be
//! tested against a saved page without network I/O.

use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{FetchCause, QueryError};
use crate::price::{extract_price, extract_unsigned_price, Money};

/// Prices kept per source, in document order.
pub const MAX_PRICES_PER_SOURCE: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Marketplace {
    Amazon,
    #[serde(rename = "eBay")]
    Ebay,
    Walmart,
    Etsy,
}

struct SourceRule {
    name: &'static str,
    search_prefix: &'static str,
    price_selector: &'static str,
    unsigned: bool,
}

const RULES: [SourceRule; 4] = [
    SourceRule {
        name: "Amazon",
        search_prefix: "https://www.amazon.com/s?k=",
        price_selector: "span.a-price > span.a-offscreen",
        unsigned: false,
    },
    SourceRule {
        name: "eBay",
        search_prefix: "https://www.ebay.com/sch/i.html?_nkw=",
        price_selector: "span.s-item__price",
        unsigned: false,
    },
    SourceRule {
        name: "Walmart",
        search_prefix: "https://www.walmart.com/search?q=",
        price_selector: "div[class*=price] span[aria-hidden='true']",
        unsigned: false,
    },
    SourceRule {
        name: "Etsy",
        search_prefix: "https://www.etsy.com/search?q=",
        price_selector: "span.currency-value",
        unsigned: true,
    },
];

impl Marketplace {
    /// Configuration order; aggregated output follows it.
    pub const ALL: [Marketplace; 4] = [
        Marketplace::Amazon,
        Marketplace::Ebay,
        Marketplace::Walmart,
        Marketplace::Etsy,
    ];

    fn rule(self) -> &'static SourceRule {
        match self {
            Marketplace::Amazon => &RULES[0],
            Marketplace::Ebay => &RULES[1],
            Marketplace::Walmart => &RULES[2],
            Marketplace::Etsy => &RULES[3],
        }
    }

    pub fn name(self) -> &'static str {
        self.rule().name
    }

    pub fn price_selector(self) -> &'static str {
        self.rule().price_selector
    }

    /// Search page URL for `query` on this marketplace.
    pub fn search_url(self, query: &MarketplaceQuery) -> String {
        format!("{}{}", self.rule().search_prefix, query.encoded())
    }

    /// Select price nodes in `body` and keep the first
    /// [`MAX_PRICES_PER_SOURCE`] amounts that parse.
    pub fn extract_prices(self, body: &str) -> Result<Vec<Money>, FetchCause> {
        let rule = self.rule();
        let selector = Selector::parse(rule.price_selector)
            .map_err(|e| FetchCause::Parse(format!("selector {:?}: {e}", rule.price_selector)))?;
        let doc = Html::parse_document(body);

        let prices = doc
            .select(&selector)
            .filter_map(|node| {
                let text = node.text().collect::<String>();
                if rule.unsigned {
                    extract_unsigned_price(&text)
                } else {
                    extract_price(&text)
                }
            })
            .take(MAX_PRICES_PER_SOURCE)
            .collect();
        Ok(prices)
    }
}

impl fmt::Display for Marketplace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Marketplace {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Marketplace::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown marketplace: {s}"))
    }
}

/// A validated, immutable product search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketplaceQuery {
    product_name: String,
}

impl MarketplaceQuery {
    pub fn new(product_name: &str) -> Result<Self, QueryError> {
        let trimmed = product_name.trim();
        if trimmed.is_empty() {
            return Err(QueryError::Empty);
        }
        Ok(Self {
            product_name: trimmed.to_string(),
        })
    }

    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    /// Percent-encoded name with spaces as `+`.
    pub fn encoded(&self) -> String {
        encode_query(&self.product_name)
    }
}

pub fn encode_query(s: &str) -> String {
    urlencoding::encode(s).replace("%20", "+")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn every_selector_compiles() {
        for m in Marketplace::ALL {
            assert!(
                Selector::parse(m.price_selector()).is_ok(),
                "selector for {m} must parse"
            );
        }
    }

    #[test]
    fn query_encoding_uses_plus_for_spaces() {
        let q = MarketplaceQuery::new("  usb c cable & hub ").unwrap();
        assert_eq!(q.product_name(), "usb c cable & hub");
        assert_eq!(q.encoded(), "usb+c+cable+%26+hub");
        assert_eq!(
            Marketplace::Ebay.search_url(&q),
            "https://www.ebay.com/sch/i.html?_nkw=usb+c+cable+%26+hub"
        );
    }

    #[test]
    fn empty_query_is_rejected() {
        assert_eq!(MarketplaceQuery::new("   "), Err(QueryError::Empty));
    }

    #[test]
    fn names_round_trip_case_insensitively() {
        assert_eq!("EBAY".parse::<Marketplace>(), Ok(Marketplace::Ebay));
        assert_eq!(" etsy ".parse::<Marketplace>(), Ok(Marketplace::Etsy));
        assert!("argos".parse::<Marketplace>().is_err());
    }

    #[test]
    fn etsy_gets_sign_prepended() {
        let body = r#"<p><span class="currency-value">18.00</span>
            <span class="currency-value">n/a</span>
            <span class="currency-value">4,5</span></p>"#;
        let prices = Marketplace::Etsy.extract_prices(body).unwrap();
        let got: Vec<_> = prices.iter().map(|p| p.as_str()).collect();
        assert_eq!(got, vec!["$18.00", "$4,5"]);
        assert_eq!(prices[1].amount, dec!(4.5));
    }

    #[test]
    fn amazon_only_reads_offscreen_inside_price() {
        let body = r#"
            <span class="a-price"><span class="a-offscreen">$19.99</span></span>
            <span class="a-offscreen">$1.00</span>
            <div class="a-price"><span class="a-offscreen">$2.00</span></div>"#;
        let prices = Marketplace::Amazon.extract_prices(body).unwrap();
        assert_eq!(prices.len(), 1);
        assert_eq!(prices[0].amount, dec!(19.99));
    }

    #[test]
    fn serde_name_matches_display() {
        let s = serde_json::to_string(&Marketplace::Ebay).unwrap();
        assert_eq!(s, "\"eBay\"");
    }
}
