//! Ranking and display formatting.
//!
//! Sorting happens on the numeric [`MetricRecord`] values; strings are
//! produced only afterwards and never sorted.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::{MetricRecord, RankedRow};

/// Column headers, in the positional order of [`RankedRow::cells`].
pub const COLUMNS: [&str; 10] = [
    "Rank",
    "Ticker",
    "Owner",
    "Company",
    "Price",
    "YTD",
    "6-Month",
    "1-Year",
    "3-Year CAGR",
    "5-Year CAGR",
];

/// Field the table is ordered by.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Ytd,
    SixMonth,
    OneYear,
    ThreeYear,
    FiveYear,
    Price,
    Ticker,
}

impl SortKey {
    pub const ALL: [SortKey; 7] = [
        SortKey::Ytd,
        SortKey::SixMonth,
        SortKey::OneYear,
        SortKey::ThreeYear,
        SortKey::FiveYear,
        SortKey::Price,
        SortKey::Ticker,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            SortKey::Ytd => "ytd",
            SortKey::SixMonth => "six_month",
            SortKey::OneYear => "one_year",
            SortKey::ThreeYear => "three_year",
            SortKey::FiveYear => "five_year",
            SortKey::Price => "price",
            SortKey::Ticker => "ticker",
        }
    }

    /// Numeric value of this key, `None` for text keys.
    fn value(self, record: &MetricRecord) -> Option<f64> {
        match self {
            SortKey::Ytd => Some(record.ytd_return),
            SortKey::SixMonth => Some(record.six_month_return),
            SortKey::OneYear => Some(record.one_year_return),
            SortKey::ThreeYear => Some(record.three_year_cagr),
            SortKey::FiveYear => Some(record.five_year_cagr),
            SortKey::Price => Some(record.latest_price),
            SortKey::Ticker => None,
        }
    }

    /// Numeric keys sort descending; tickers sort ascending.
    fn compare(self, a: &MetricRecord, b: &MetricRecord) -> Ordering {
        match (self.value(a), self.value(b)) {
            (Some(va), Some(vb)) => vb.partial_cmp(&va).unwrap_or(Ordering::Equal),
            _ => a.ticker.cmp(&b.ticker),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('-', "_");
        SortKey::ALL
            .into_iter()
            .find(|key| key.as_str() == wanted)
            .ok_or_else(|| {
                let available: Vec<_> = SortKey::ALL.iter().map(|k| k.as_str()).collect();
                format!("Unknown sort key: {}. Available: {:?}", s, available)
            })
    }
}

/// Format a price with a leading currency symbol and two decimals.
///
/// ```rust
/// use perftrack_core::format_currency;
///
/// assert_eq!(format_currency(110.0, "$"), "$110.00");
/// assert_eq!(format_currency(-1.5, "$"), "-$1.50");
/// ```
pub fn format_currency(value: f64, symbol: &str) -> String {
    let value = normalize_zero(value);
    if value < 0.0 {
        format!("-{}{:.2}", symbol, -value)
    } else {
        format!("{}{:.2}", symbol, value)
    }
}

/// Format a percentage with two decimals and a trailing `%`.
///
/// ```rust
/// use perftrack_core::format_percent;
///
/// assert_eq!(format_percent(20.0), "20.00%");
/// assert_eq!(format_percent(-3.0), "-3.00%");
/// ```
pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", normalize_zero(value))
}

/// Collapse values that would print as `-0.00` to plain zero.
fn normalize_zero(value: f64) -> f64 {
    if value.abs() < 0.005 {
        0.0
    } else {
        value
    }
}

fn to_row(rank: usize, record: MetricRecord, currency_symbol: &str) -> RankedRow {
    RankedRow {
        rank,
        price: format_currency(record.latest_price, currency_symbol),
        ytd: format_percent(record.ytd_return),
        six_month: format_percent(record.six_month_return),
        one_year: format_percent(record.one_year_return),
        three_year: format_percent(record.three_year_cagr),
        five_year: format_percent(record.five_year_cagr),
        record,
    }
}

/// Sort records by `key`, assign dense ranks and format every field.
///
/// The sort is stable: records with equal keys keep their input order and
/// still receive distinct consecutive ranks.
pub fn rank(mut records: Vec<MetricRecord>, key: SortKey, currency_symbol: &str) -> Vec<RankedRow> {
    records.sort_by(|a, b| key.compare(a, b));

    records
        .into_iter()
        .enumerate()
        .map(|(i, record)| to_row(i + 1, record, currency_symbol))
        .collect()
}
