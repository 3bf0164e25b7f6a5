//! Roster and engine configuration, loaded from TOML.

use std::collections::HashSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::metrics::MetricWindows;
use crate::provider::Lookback;
use crate::ranking::SortKey;
use crate::types::Instrument;
use crate::{Error, Result};

/// Tickers tracked when no roster is configured.
pub const DEFAULT_TICKERS: [&str; 7] = ["AAPL", "MSFT", "GOOGL", "NVDA", "AMZN", "XLK", "RSP"];

/// Engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Ordered roster of instruments to evaluate
    pub instruments: Vec<Instrument>,
    /// Lookback windows and annualization divisor
    pub windows: MetricWindows,
    /// Field the table is ordered by
    pub sort_key: SortKey,
    /// Symbol prefixed to formatted prices
    pub currency_symbol: String,
    /// Years of history requested from the provider
    pub lookback_years: u32,
    /// Provider fetch deadline in seconds
    pub fetch_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            instruments: DEFAULT_TICKERS.iter().map(|t| Instrument::new(t)).collect(),
            windows: MetricWindows::default(),
            sort_key: SortKey::default(),
            currency_symbol: "$".to_string(),
            lookback_years: 5,
            fetch_timeout_secs: 30,
        }
    }
}

impl Config {
    /// Default configuration with a roster of bare tickers.
    pub fn with_tickers(tickers: &[&str]) -> Self {
        Self {
            instruments: tickers.iter().map(|t| Instrument::new(t)).collect(),
            ..Default::default()
        }
    }

    /// Get the default config file path.
    ///
    /// Default path: `~/.perftrack/config.toml`
    /// Can be overridden with `PERFTRACK_CONFIG` environment variable.
    pub fn default_path() -> PathBuf {
        if let Ok(path) = env::var("PERFTRACK_CONFIG") {
            return PathBuf::from(path);
        }

        directories::BaseDirs::new()
            .map(|dirs| dirs.home_dir().join(".perftrack/config.toml"))
            .unwrap_or_else(|| PathBuf::from("perftrack.toml"))
    }

    /// Load from the default path.
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::default_path())
    }

    /// Load from a specific path; a missing file yields the defaults.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "config not found, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse, normalize and validate a TOML document.
    pub fn from_toml(content: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(content)?;
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    /// Uppercase tickers and drop blank optional fields.
    fn normalize(&mut self) {
        for instrument in &mut self.instruments {
            instrument.ticker = instrument.ticker.trim().to_uppercase();
            instrument.owner = instrument.owner.take().filter(|s| !s.trim().is_empty());
            instrument.company_name = instrument
                .company_name
                .take()
                .filter(|s| !s.trim().is_empty());
        }
    }

    /// Check the roster and windows are usable.
    pub fn validate(&self) -> Result<()> {
        if self.instruments.is_empty() {
            return Err(Error::InvalidConfig("roster is empty".to_string()));
        }

        let mut seen = HashSet::new();
        for instrument in &self.instruments {
            if instrument.ticker.is_empty() {
                return Err(Error::InvalidConfig("blank ticker in roster".to_string()));
            }
            if !seen.insert(instrument.ticker.to_uppercase()) {
                return Err(Error::InvalidConfig(format!(
                    "duplicate ticker: {}",
                    instrument.ticker
                )));
            }
        }

        if !self.windows.is_valid() {
            return Err(Error::InvalidConfig(
                "windows and trading_days_per_year must be positive".to_string(),
            ));
        }

        if self.currency_symbol.is_empty() {
            return Err(Error::InvalidConfig("currency_symbol is empty".to_string()));
        }

        if self.lookback_years == 0 {
            return Err(Error::InvalidConfig("lookback_years must be positive".to_string()));
        }

        if self.fetch_timeout_secs == 0 {
            return Err(Error::InvalidConfig("fetch_timeout_secs must be positive".to_string()));
        }

        Ok(())
    }

    /// Tickers in roster order.
    pub fn tickers(&self) -> Vec<String> {
        self.instruments.iter().map(|i| i.ticker.clone()).collect()
    }

    pub fn lookback(&self) -> Lookback {
        Lookback::years(self.lookback_years)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.tickers(), DEFAULT_TICKERS.to_vec());
        assert_eq!(config.sort_key, SortKey::Ytd);
        assert_eq!(config.currency_symbol, "$");
        assert_eq!(config.lookback(), Lookback::years(5));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_toml() {
        let toml = r#"
            currency_symbol = "£"
            sort_key = "one_year"
            fetch_timeout_secs = 10

            [windows]
            six_month = 120

            [[instruments]]
            ticker = "aapl"
            owner = "Alice"
            company_name = "Apple Inc."

            [[instruments]]
            ticker = "XLK"
            owner = ""
        "#;

        let config = Config::from_toml(toml).unwrap();

        assert_eq!(config.currency_symbol, "£");
        assert_eq!(config.sort_key, SortKey::OneYear);
        assert_eq!(config.fetch_timeout(), Duration::from_secs(10));
        assert_eq!(config.windows.six_month, 120);
        assert_eq!(config.windows.one_year, 252);
        assert_eq!(config.tickers(), vec!["AAPL", "XLK"]);
        assert_eq!(config.instruments[0].owner.as_deref(), Some("Alice"));
        assert!(config.instruments[1].owner.is_none());
    }

    #[test]
    fn test_duplicate_tickers_rejected() {
        let toml = r#"
            [[instruments]]
            ticker = "AAPL"

            [[instruments]]
            ticker = "aapl"
        "#;

        let result = Config::from_toml(toml);
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_empty_roster_rejected() {
        let result = Config::from_toml("instruments = []");
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_zero_window_rejected() {
        let result = Config::from_toml("[windows]\ntrading_days_per_year = 0");
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_zero_lookback_rejected() {
        let result = Config::from_toml("lookback_years = 0");
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_zero_fetch_timeout_rejected() {
        let result = Config::from_toml("fetch_timeout_secs = 0");
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_unknown_sort_key_rejected() {
        let result = Config::from_toml(r#"sort_key = "volatility""#);
        assert!(matches!(result, Err(Error::Toml(_))));
    }

    #[test]
    fn test_load_from_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");

        // Missing file falls back to defaults
        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config, Config::default());

        fs::write(&path, "[[instruments]]\nticker = \"NVDA\"\n").unwrap();
        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config.tickers(), vec!["NVDA"]);
    }
}
