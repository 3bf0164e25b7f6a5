//! Roster-wide evaluation with per-instrument failure isolation.
//!
//! Each instrument resolves to either a [`MetricRecord`] or a [`SkipReason`].
//! Skipped instruments are logged and dropped; they never abort the pass.

use std::collections::HashMap;
use std::fmt;

use crate::metrics::{cagr, total_return, ytd_return, MetricWindows};
use crate::series::PriceSeries;
use crate::types::{Instrument, MetricRecord};

/// Why an instrument produced no record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The provider returned nothing for this ticker
    Missing,
    /// The provider returned an empty series
    Empty,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Missing => f.write_str("no price history returned"),
            SkipReason::Empty => f.write_str("price history is empty"),
        }
    }
}

/// Compute every metric for one instrument.
pub fn evaluate_instrument(
    instrument: &Instrument,
    series: Option<&PriceSeries>,
    as_of_year: i32,
    windows: &MetricWindows,
) -> Result<MetricRecord, SkipReason> {
    let series = series.ok_or(SkipReason::Missing)?;
    let latest_price = series.latest_price().ok_or(SkipReason::Empty)?;

    Ok(MetricRecord {
        ticker: instrument.ticker.clone(),
        owner: instrument.owner.clone(),
        company_name: instrument.company_name.clone(),
        latest_price,
        ytd_return: ytd_return(series, as_of_year),
        six_month_return: total_return(series, windows.six_month),
        one_year_return: total_return(series, windows.one_year),
        three_year_cagr: cagr(series, windows.three_year, windows.trading_days_per_year),
        five_year_cagr: cagr(series, windows.five_year, windows.trading_days_per_year),
    })
}

/// Evaluate every instrument in roster order, keeping the per-item outcome.
///
/// Tickers are matched case-insensitively against the fetched histories.
pub fn evaluate_each<'a>(
    roster: &'a [Instrument],
    histories: &HashMap<String, PriceSeries>,
    as_of_year: i32,
    windows: &MetricWindows,
) -> Vec<(&'a Instrument, Result<MetricRecord, SkipReason>)> {
    roster
        .iter()
        .map(|instrument| {
            let series = histories.get(&instrument.ticker).or_else(|| {
                histories
                    .iter()
                    .find(|(ticker, _)| ticker.eq_ignore_ascii_case(&instrument.ticker))
                    .map(|(_, series)| series)
            });
            let outcome = evaluate_instrument(instrument, series, as_of_year, windows);
            (instrument, outcome)
        })
        .collect()
}

/// Evaluate the roster and keep only the instruments that produced records.
///
/// Output preserves roster order and is not yet sorted.
pub fn evaluate(
    roster: &[Instrument],
    histories: &HashMap<String, PriceSeries>,
    as_of_year: i32,
    windows: &MetricWindows,
) -> Vec<MetricRecord> {
    evaluate_each(roster, histories, as_of_year, windows)
        .into_iter()
        .filter_map(|(instrument, outcome)| match outcome {
            Ok(record) => {
                tracing::debug!(
                    ticker = %record.ticker,
                    ytd = record.ytd_return,
                    "computed metrics"
                );
                Some(record)
            }
            Err(reason) => {
                tracing::warn!(ticker = %instrument.ticker, %reason, "skipping instrument");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::tests::daily_series;
    use approx::assert_relative_eq;

    fn roster(tickers: &[&str]) -> Vec<Instrument> {
        tickers.iter().map(|t| Instrument::new(t)).collect()
    }

    #[test]
    fn test_missing_ticker_is_skipped() {
        let roster = roster(&["AAA", "BBB", "CCC"]);
        let mut histories = HashMap::new();
        histories.insert("CCC".to_string(), daily_series(&[10.0, 11.0]));
        histories.insert("AAA".to_string(), daily_series(&[20.0, 22.0]));

        let records = evaluate(&roster, &histories, 2020, &MetricWindows::default());

        assert_eq!(records.len(), 2);
        // Roster order, not map order
        assert_eq!(records[0].ticker, "AAA");
        assert_eq!(records[1].ticker, "CCC");
    }

    #[test]
    fn test_outcomes_carry_skip_reasons() {
        let roster = roster(&["AAA", "BBB", "CCC"]);
        let mut histories = HashMap::new();
        histories.insert("AAA".to_string(), daily_series(&[20.0, 22.0]));
        histories.insert("BBB".to_string(), PriceSeries::empty());

        let outcomes = evaluate_each(&roster, &histories, 2020, &MetricWindows::default());

        assert_eq!(outcomes.len(), 3);
        assert!(outcomes[0].1.is_ok());
        assert_eq!(outcomes[1].1, Err(SkipReason::Empty));
        assert_eq!(outcomes[2].1, Err(SkipReason::Missing));
    }

    #[test]
    fn test_lowercase_history_keys_match() {
        let roster = roster(&["AAA", "BBB"]);
        let mut histories = HashMap::new();
        histories.insert("aaa".to_string(), daily_series(&[10.0, 11.0]));
        histories.insert("Bbb".to_string(), daily_series(&[20.0, 22.0]));

        let outcomes = evaluate_each(&roster, &histories, 2020, &MetricWindows::default());

        assert!(outcomes[0].1.is_ok());
        assert!(outcomes[1].1.is_ok());
        assert_relative_eq!(outcomes[0].1.as_ref().unwrap().latest_price, 11.0);
    }

    #[test]
    fn test_no_histories_yields_no_records() {
        let roster = roster(&["AAA", "BBB"]);
        let records = evaluate(&roster, &HashMap::new(), 2020, &MetricWindows::default());
        assert!(records.is_empty());
    }

    #[test]
    fn test_record_fields() {
        let instrument = Instrument::new("AAA")
            .with_owner("Bob")
            .with_company_name("Triple A Corp");
        // Two years of daily closes rising by one
        let closes: Vec<f64> = (0..=504).map(|i| 100.0 + i as f64).collect();
        let series = daily_series(&closes);
        let windows = MetricWindows::default();

        let record = evaluate_instrument(&instrument, Some(&series), 2020, &windows).unwrap();

        assert_eq!(record.owner.as_deref(), Some("Bob"));
        assert_eq!(record.company_name.as_deref(), Some("Triple A Corp"));
        assert_relative_eq!(record.latest_price, 604.0);
        // 2020-01-01 close 100, 2020-12-31 (day 365) close 465
        assert_relative_eq!(record.ytd_return, 365.0, epsilon = 1e-9);
        // 604 vs 604 - 126
        assert_relative_eq!(record.six_month_return, (126.0 / 478.0) * 100.0, epsilon = 1e-9);
        assert_relative_eq!(record.one_year_return, (252.0 / 352.0) * 100.0, epsilon = 1e-9);
        // Not enough history for CAGR windows
        assert_eq!(record.three_year_cagr, 0.0);
        assert_eq!(record.five_year_cagr, 0.0);
    }

    #[test]
    fn test_custom_windows_apply() {
        let instrument = Instrument::new("AAA");
        let series = daily_series(&[50.0, 75.0, 100.0]);
        let windows = MetricWindows {
            six_month: 1,
            one_year: 2,
            three_year: 2,
            five_year: 2,
            trading_days_per_year: 2,
        };

        let record = evaluate_instrument(&instrument, Some(&series), 2020, &windows).unwrap();

        assert_relative_eq!(record.six_month_return, (25.0 / 75.0) * 100.0, epsilon = 1e-9);
        assert_relative_eq!(record.one_year_return, 100.0, epsilon = 1e-9);
        assert_relative_eq!(record.three_year_cagr, 100.0, epsilon = 1e-9);
    }
}
