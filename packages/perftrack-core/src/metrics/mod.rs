//! Performance metrics module.
//!
//! Pure, side-effect-free conversions from a price series into percentage metrics.

mod returns;
mod windows;

pub use returns::{cagr, total_return, ytd_return};
pub use windows::{MetricWindows, TRADING_DAYS_PER_YEAR};
