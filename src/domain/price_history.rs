// src/domain/price_history.rs

use chrono::NaiveDate;
use std::str::FromStr;
use thiserror::Error;

const DATE_FORMAT: &str = "%d/%m/%Y";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PriceHistoryError {
    #[error("price entry has no '|' separator: {0:?}")]
    MissingSeparator(String),
    #[error("price entry has an unparseable date: {0:?}")]
    InvalidDate(String),
    #[error("price entry has a non-numeric price: {0:?}")]
    InvalidPrice(String),
    #[error("listing has no price history")]
    Empty,
}

/// One dated price from a listing's history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceHistoryEntry {
    pub date: NaiveDate,
    /// The date exactly as the source wrote it, for display.
    pub display: String,
    pub price: i64,
}

impl FromStr for PriceHistoryEntry {
    type Err = PriceHistoryError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let (date_part, price_part) = raw
            .split_once('|')
            .ok_or_else(|| PriceHistoryError::MissingSeparator(raw.to_string()))?;

        let display = date_part.trim();
        let date = NaiveDate::parse_from_str(display, DATE_FORMAT)
            .map_err(|_| PriceHistoryError::InvalidDate(raw.to_string()))?;

        let price = parse_price(price_part.trim())
            .ok_or_else(|| PriceHistoryError::InvalidPrice(raw.to_string()))?;

        Ok(Self {
            date,
            display: display.to_string(),
            price,
        })
    }
}

/// Whole-number prices; a fractional value is truncated toward zero.
/// Values outside the `i64` range are rejected rather than saturated.
fn parse_price(s: &str) -> Option<i64> {
    if let Ok(p) = s.parse::<i64>() {
        return Some(p);
    }
    s.parse::<f64>()
        .ok()
        .map(f64::trunc)
        .filter(|p| p.is_finite() && *p >= i64::MIN as f64 && *p < i64::MAX as f64)
        .map(|p| p as i64)
}

/// Chronologically ordered price history with its headline numbers.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceTrend {
    pub entries: Vec<PriceHistoryEntry>,
    /// Price of the chronologically last entry.
    pub current_price: i64,
    /// `(last - first) / first * 100`, or 0 when the first price is 0.
    pub percent_change: f64,
}

/// Parses and sorts a raw price history.
///
/// Entries sharing a date keep their insertion order.
pub fn derive_trend<S: AsRef<str>>(raw: &[S]) -> Result<PriceTrend, PriceHistoryError> {
    let mut entries = raw
        .iter()
        .map(|s| s.as_ref().parse::<PriceHistoryEntry>())
        .collect::<Result<Vec<_>, _>>()?;

    // sort_by_key is stable
    entries.sort_by_key(|e| e.date);

    let (first, last) = match (entries.first(), entries.last()) {
        (Some(first), Some(last)) => (first.price, last.price),
        _ => return Err(PriceHistoryError::Empty),
    };

    let percent_change = if first == 0 {
        0.0
    } else {
        // f64 so extreme histories cannot overflow
        (last as f64 - first as f64) / first as f64 * 100.0
    };

    Ok(PriceTrend {
        entries,
        current_price: last,
        percent_change,
    })
}
