//! Perftrack Core - Performance metrics engine for a roster of instruments.
//!
//! This crate turns per-instrument price histories into comparable
//! percentage metrics and a ranked, display-ready table:
//!
//! - **Price series**: ordered (date, close) observations per instrument
//! - **Metrics**: total return, CAGR and year-to-date return
//! - **Evaluation**: roster-wide pass with per-instrument failure isolation
//! - **Ranking**: stable sort, dense ranks and display formatting
//!
//! # Example
//!
//! ```rust
//! use perftrack_core::{Config, Dashboard, PriceSeries, StaticProvider};
//!
//! let config = Config::with_tickers(&["AAPL"]);
//! let provider = StaticProvider::new().with_series("AAPL", PriceSeries::empty());
//!
//! let mut dashboard = Dashboard::new(config);
//! assert!(!dashboard.is_evaluated());
//!
//! dashboard.refresh(&provider, 2024);
//! assert!(dashboard.is_evaluated());
//! assert!(dashboard.rows().is_empty());
//! ```

pub mod config;
pub mod dashboard;
pub mod evaluator;
pub mod metrics;
pub mod provider;
pub mod ranking;
pub mod series;
pub mod types;

use std::time::Duration;

// Re-export commonly used types
pub use types::{ApiResponse, Instrument, MetricRecord, RankedRow};

// Re-export main functionality
pub use config::Config;
pub use dashboard::{run_pass, Dashboard, DisplayState};
pub use evaluator::{evaluate, evaluate_each, evaluate_instrument, SkipReason};
pub use metrics::{cagr, total_return, ytd_return, MetricWindows};
pub use provider::{JsonFileProvider, Lookback, PriceProvider, StaticProvider, TimeoutProvider};
pub use ranking::{format_currency, format_percent, rank, SortKey, COLUMNS};
pub use series::{PricePoint, PriceSeries};

/// Error types for perftrack-core operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Malformed price series: {0}")]
    MalformedSeries(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Provider failure: {0}")]
    Provider(String),

    #[error("Provider timed out after {0:?}")]
    ProviderTimeout(Duration),
}

impl Error {
    /// Whether this error came from the market-data provider side of a pass.
    pub fn is_provider_failure(&self) -> bool {
        matches!(
            self,
            Error::Provider(_) | Error::ProviderTimeout(_) | Error::Io(_) | Error::Json(_)
        )
    }
}

/// Result type for perftrack-core operations.
pub type Result<T> = std::result::Result<T, Error>;
