//! Lookback windows, in trading days.

use serde::{Deserialize, Serialize};

/// Assumed trading days per calendar year.
pub const TRADING_DAYS_PER_YEAR: usize = 252;

/// Window sizes used for every roster evaluation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MetricWindows {
    /// Six-month total return window
    pub six_month: usize,
    /// One-year total return window
    pub one_year: usize,
    /// Three-year CAGR window
    pub three_year: usize,
    /// Five-year CAGR window
    pub five_year: usize,
    /// Annualization divisor for CAGR
    pub trading_days_per_year: usize,
}

impl Default for MetricWindows {
    fn default() -> Self {
        Self {
            six_month: TRADING_DAYS_PER_YEAR / 2,
            one_year: TRADING_DAYS_PER_YEAR,
            three_year: TRADING_DAYS_PER_YEAR * 3,
            five_year: TRADING_DAYS_PER_YEAR * 5,
            trading_days_per_year: TRADING_DAYS_PER_YEAR,
        }
    }
}

impl MetricWindows {
    /// Longest window, i.e. the history a full evaluation needs.
    pub fn longest(&self) -> usize {
        self.six_month
            .max(self.one_year)
            .max(self.three_year)
            .max(self.five_year)
    }

    /// Whether every window and the annualization divisor are non-zero.
    pub fn is_valid(&self) -> bool {
        self.six_month > 0
            && self.one_year > 0
            && self.three_year > 0
            && self.five_year > 0
            && self.trading_days_per_year > 0
    }
}
