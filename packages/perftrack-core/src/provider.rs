//! Market-data provider boundary.
//!
//! A pass fetches every roster ticker in one batched call. Providers may omit
//! tickers they cannot resolve, or fail the whole batch.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use chrono::Months;
use serde::{Deserialize, Serialize};

use crate::series::{PricePoint, PriceSeries};
use crate::{Error, Result};

/// How much history to request, in calendar years.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Lookback {
    pub years: u32,
}

impl Lookback {
    pub fn years(years: u32) -> Self {
        Self { years }
    }
}

impl Default for Lookback {
    fn default() -> Self {
        Self { years: 5 }
    }
}

/// Source of historical closing prices.
pub trait PriceProvider: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    /// Fetch price histories for `tickers` in a single batch.
    ///
    /// Tickers the provider cannot resolve are left out of the map.
    fn fetch_history(
        &self,
        tickers: &[String],
        lookback: Lookback,
    ) -> Result<HashMap<String, PriceSeries>>;
}

/// In-memory provider backed by a fixed map of series.
#[derive(Debug, Clone, Default)]
pub struct StaticProvider {
    series: HashMap<String, PriceSeries>,
}

impl StaticProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the series for `ticker`.
    pub fn with_series(mut self, ticker: &str, series: PriceSeries) -> Self {
        self.series.insert(ticker.to_uppercase(), series);
        self
    }
}

impl PriceProvider for StaticProvider {
    fn name(&self) -> &str {
        "static"
    }

    fn fetch_history(
        &self,
        tickers: &[String],
        _lookback: Lookback,
    ) -> Result<HashMap<String, PriceSeries>> {
        Ok(tickers
            .iter()
            .filter_map(|ticker| {
                let key = ticker.to_uppercase();
                self.series.get(&key).map(|s| (key, s.clone()))
            })
            .collect())
    }
}

/// Provider reading a JSON snapshot of price histories.
///
/// Expected layout: `{ "AAPL": [{"date": "2024-01-02", "close": 185.64}, ...] }`.
/// Tickers with malformed histories are dropped with a warning.
#[derive(Debug, Clone)]
pub struct JsonFileProvider {
    path: PathBuf,
}

impl JsonFileProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<HashMap<String, Vec<PricePoint>>> {
        let content = fs::read_to_string(&self.path)?;
        let raw: HashMap<String, Vec<PricePoint>> = serde_json::from_str(&content)?;
        Ok(raw
            .into_iter()
            .map(|(ticker, points)| (ticker.trim().to_uppercase(), points))
            .collect())
    }
}

/// Keep only the last `lookback` of a series, measured from its final date.
///
/// A lookback reaching past the representable calendar keeps the whole series.
fn trim_to_lookback(series: PriceSeries, lookback: Lookback) -> PriceSeries {
    let cutoff = lookback.years.checked_mul(12).and_then(|months| {
        series
            .last()
            .and_then(|p| p.date.checked_sub_months(Months::new(months)))
    });

    match cutoff {
        Some(cutoff) => series.since(cutoff),
        None => series,
    }
}

impl PriceProvider for JsonFileProvider {
    fn name(&self) -> &str {
        "json-file"
    }

    fn fetch_history(
        &self,
        tickers: &[String],
        lookback: Lookback,
    ) -> Result<HashMap<String, PriceSeries>> {
        let mut raw = self.load()?;
        let mut histories = HashMap::with_capacity(tickers.len());

        for ticker in tickers {
            let key = ticker.to_uppercase();
            let Some(points) = raw.remove(&key) else {
                continue;
            };

            match PriceSeries::from_unsorted(points) {
                Ok(series) => {
                    histories.insert(key, trim_to_lookback(series, lookback));
                }
                Err(e) => {
                    tracing::warn!(ticker = %key, error = %e, "dropping malformed history");
                }
            }
        }

        Ok(histories)
    }
}

/// Applies a deadline to a blocking provider.
///
/// The inner fetch runs on a worker thread; if it has not answered within
/// `timeout` the call fails with [`Error::ProviderTimeout`] and the worker is
/// left to finish on its own.
#[derive(Debug)]
pub struct TimeoutProvider<P> {
    inner: Arc<P>,
    timeout: Duration,
}

impl<P> TimeoutProvider<P> {
    pub fn new(inner: P, timeout: Duration) -> Self {
        Self {
            inner: Arc::new(inner),
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl<P: PriceProvider + 'static> PriceProvider for TimeoutProvider<P> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn fetch_history(
        &self,
        tickers: &[String],
        lookback: Lookback,
    ) -> Result<HashMap<String, PriceSeries>> {
        let (tx, rx) = mpsc::channel();
        let inner = Arc::clone(&self.inner);
        let tickers = tickers.to_vec();

        thread::spawn(move || {
            // Receiver may already be gone after a timeout
            let _ = tx.send(inner.fetch_history(&tickers, lookback));
        });

        match rx.recv_timeout(self.timeout) {
            Ok(result) => result,
            Err(mpsc::RecvTimeoutError::Timeout) => Err(Error::ProviderTimeout(self.timeout)),
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(Error::Provider(format!(
                "{} worker exited without a result",
                self.inner.name()
            ))),
        }
    }
}
