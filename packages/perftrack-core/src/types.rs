//! Core data types for the perftrack engine.

use serde::{Deserialize, Serialize};

/// A trackable instrument in the roster.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Instrument {
    /// Ticker symbol (uppercase, unique within a roster)
    pub ticker: String,
    /// Who holds or follows this instrument
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    /// Display name of the issuer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
}

impl Instrument {
    /// Create an instrument with only a ticker.
    pub fn new(ticker: &str) -> Self {
        Self {
            ticker: ticker.trim().to_uppercase(),
            owner: None,
            company_name: None,
        }
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    pub fn with_company_name(mut self, company_name: impl Into<String>) -> Self {
        self.company_name = Some(company_name.into());
        self
    }
}

/// Computed metrics for one instrument in one evaluation pass.
///
/// All return fields are percentages and always finite.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricRecord {
    /// Ticker symbol
    pub ticker: String,
    /// Owner, copied from the instrument
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    /// Company name, copied from the instrument
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    /// Most recent closing price
    pub latest_price: f64,
    /// Year-to-date return percentage
    pub ytd_return: f64,
    /// Six-month total return percentage
    pub six_month_return: f64,
    /// One-year total return percentage
    pub one_year_return: f64,
    /// Three-year compound annual growth rate
    pub three_year_cagr: f64,
    /// Five-year compound annual growth rate
    pub five_year_cagr: f64,
}

/// A ranked, display-ready row.
///
/// Produced once from a [`MetricRecord`]; the string fields are final.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RankedRow {
    /// 1-based dense rank
    pub rank: usize,
    /// Numeric source of this row
    pub record: MetricRecord,
    /// Currency-formatted latest price (e.g. `$110.00`)
    pub price: String,
    /// Formatted YTD return (e.g. `5.00%`)
    pub ytd: String,
    /// Formatted six-month return
    pub six_month: String,
    /// Formatted one-year return
    pub one_year: String,
    /// Formatted three-year CAGR
    pub three_year: String,
    /// Formatted five-year CAGR
    pub five_year: String,
}

impl RankedRow {
    pub fn ticker(&self) -> &str {
        &self.record.ticker
    }

    /// Display cells in [`crate::COLUMNS`] order.
    pub fn cells(&self) -> Vec<String> {
        vec![
            self.rank.to_string(),
            self.record.ticker.clone(),
            self.record.owner.clone().unwrap_or_default(),
            self.record.company_name.clone().unwrap_or_default(),
            self.price.clone(),
            self.ytd.clone(),
            self.six_month.clone(),
            self.one_year.clone(),
            self.three_year.clone(),
            self.five_year.clone(),
        ]
    }
}

/// API response wrapper for CLI and bridge output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Create a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    /// Create an error response.
    pub fn err(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(error.into()),
        }
    }
}
