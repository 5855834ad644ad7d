//! # Price Extractor
//!
//! Finds the first currency-sign-prefixed amount in an arbitrary text
//! fragment (`"Now $12.50 was $20"` → `$12.50`).
//!
//! - A sign (`$`, `£`, `€`), at most one whitespace, ASCII digits, and optionally
//!   one separator (`.` or `,`) followed by more digits.
//! - Leftmost match wins; later amounts in the same text are ignored.
//! - No match is `None`, not an error.
//!
//! Text without a sign never matches. Sources whose markup omits the sign
//! prepend [`DEFAULT_SIGN`] before calling [`extract_price`].

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Sign assumed for sources that render bare numbers.
pub const DEFAULT_SIGN: char = '$';

static RE_PRICE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([$£€])\s?([0-9]+(?:[.,][0-9]+)?)").expect("price regex"));

/// A monetary amount as seen on a marketplace page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Money {
    /// Currency sign the amount was tagged with.
    pub sign: char,
    pub amount: Decimal,
    /// Literal matched text, e.g. `"$1,299"`.
    #[serde(skip)]
    text: String,
}

impl Money {
    pub fn new(sign: char, amount: Decimal) -> Self {
        Self {
            sign,
            amount,
            text: format!("{sign}{amount}"),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Return the leftmost monetary amount in `text`, if any.
///
/// Matches whose digits overflow `Decimal` are skipped in favour of the
/// next one.
pub fn extract_price(text: &str) -> Option<Money> {
    RE_PRICE.captures_iter(text).find_map(|caps| {
        let whole = caps.get(0)?.as_str();
        let sign = caps.get(1)?.as_str().chars().next()?;
        let amount = parse_amount(caps.get(2)?.as_str())?;
        Some(Money {
            sign,
            amount,
            text: whole.to_string(),
        })
    })
}

/// Like [`extract_price`], but prefixes a bare number with [`DEFAULT_SIGN`].
pub fn extract_unsigned_price(text: &str) -> Option<Money> {
    extract_price(&format!("{DEFAULT_SIGN}{}", text.trim_start()))
}

/// Convert the numeric part of a match to a decimal.
///
/// The pattern admits one separator and does not say which role it plays.
/// `.` is a decimal point; `,` followed by exactly three digits groups
/// thousands (`1,299` → 1299), otherwise it is a decimal comma (`4,5` → 4.5).
/// Values that overflow `Decimal` are treated as non-monetary.
fn parse_amount(digits: &str) -> Option<Decimal> {
    let normalized = match digits.split_once(',') {
        Some((int, frac)) if frac.len() == 3 => format!("{int}{frac}"),
        Some((int, frac)) => format!("{int}.{frac}"),
        None => digits.to_string(),
    };
    Decimal::from_str(&normalized).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn leftmost_match_wins() {
        let m = extract_price("Now $12.50 was $20").unwrap();
        assert_eq!(m.as_str(), "$12.50");
        assert_eq!(m.amount, dec!(12.50));
        assert_eq!(m.sign, '$');
    }

    #[test]
    fn separator_roles() {
        assert_eq!(parse_amount("1,299"), Some(dec!(1299)));
        assert_eq!(parse_amount("4,5"), Some(dec!(4.5)));
        assert_eq!(parse_amount("19.99"), Some(dec!(19.99)));
        assert_eq!(parse_amount("7"), Some(dec!(7)));
    }

    #[test]
    fn single_separator_group_only() {
        // second group is not part of the match
        let m = extract_price("$1,299.99").unwrap();
        assert_eq!(m.as_str(), "$1,299");
        assert_eq!(m.amount, dec!(1299));
    }

    #[test]
    fn one_space_after_sign_is_allowed() {
        assert_eq!(extract_price("$ 8.25").unwrap().amount, dec!(8.25));
        assert!(extract_price("$  8.25").is_none());
    }

    #[test]
    fn bare_number_is_absent_until_signed() {
        assert!(extract_price("24.00").is_none());
        let m = extract_unsigned_price("24.00").unwrap();
        assert_eq!(m.as_str(), "$24.00");
    }

    #[test]
    fn money_new_renders_text() {
        assert_eq!(Money::new('€', dec!(3.10)).to_string(), "€3.10");
    }
}
