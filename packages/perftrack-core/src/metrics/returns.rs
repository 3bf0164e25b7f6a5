//! Total return, CAGR and year-to-date return.
//!
//! Every function returns a finite percentage. Short histories, empty
//! subsets and degenerate start prices all report `0.0`.

use crate::series::PriceSeries;

/// Start and end closes for a window ending at the latest observation.
///
/// The start is `window` observations before the last one, so the series
/// needs at least `window + 1` points.
fn window_bounds(series: &PriceSeries, window: usize) -> Option<(f64, f64)> {
    let last_index = series.len().checked_sub(1)?;
    let start_index = last_index.checked_sub(window)?;
    Some((series.close_at(start_index)?, series.close_at(last_index)?))
}

fn percent_change(start: f64, end: f64) -> f64 {
    if start <= 0.0 {
        return 0.0;
    }
    finite_or_zero(((end - start) / start) * 100.0)
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Percentage change over the last `window` trading days.
///
/// # Arguments
///
/// * `series` - Price history, oldest first
/// * `window` - Number of trading days to look back
///
/// # Returns
///
/// `((end - start) / start) * 100`, or `0.0` when the series is too short.
///
/// # Example
///
/// ```rust
/// use chrono::NaiveDate;
/// use perftrack_core::{total_return, PricePoint, PriceSeries};
///
/// let day = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
/// let series = PriceSeries::new(vec![
///     PricePoint::new(day(2), 100.0),
///     PricePoint::new(day(3), 105.0),
///     PricePoint::new(day(4), 110.0),
/// ])
/// .unwrap();
///
/// assert!((total_return(&series, 2) - 10.0).abs() < 1e-9);
/// assert_eq!(total_return(&series, 5), 0.0);
/// ```
pub fn total_return(series: &PriceSeries, window: usize) -> f64 {
    match window_bounds(series, window) {
        Some((start, end)) => percent_change(start, end),
        None => 0.0,
    }
}

/// Compound annual growth rate over the last `window` trading days.
///
/// The elapsed time is `window / trading_days_per_year` years.
/// A zero or negative start price yields `0.0` rather than a non-finite value.
pub fn cagr(series: &PriceSeries, window: usize, trading_days_per_year: usize) -> f64 {
    if window == 0 || trading_days_per_year == 0 {
        return 0.0;
    }

    let Some((start, end)) = window_bounds(series, window) else {
        return 0.0;
    };

    if start <= 0.0 {
        return 0.0;
    }

    let years = window as f64 / trading_days_per_year as f64;
    finite_or_zero(((end / start).powf(1.0 / years) - 1.0) * 100.0)
}

/// Return from the first to the last traded close within `year`.
///
/// Uses actual traded days, not calendar boundaries. Returns `0.0` when
/// the series has no observation in that year.
pub fn ytd_return(series: &PriceSeries, year: i32) -> f64 {
    let mut in_year = series.in_year(year);

    let Some(first) = in_year.next() else {
        return 0.0;
    };
    let last = in_year.last().unwrap_or(first);

    percent_change(first.close, last.close)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::tests::daily_series;
    use crate::series::PricePoint;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    /// `window + 1` observations growing linearly from `start` to `end`.
    fn linear(start: f64, end: f64, window: usize) -> PriceSeries {
        let step = (end - start) / window as f64;
        let closes: Vec<f64> = (0..=window).map(|i| start + step * i as f64).collect();
        daily_series(&closes)
    }

    #[test]
    fn test_short_series_returns_zero() {
        let series = daily_series(&[100.0, 101.0, 102.0]);

        assert_eq!(total_return(&series, 5), 0.0);
        assert_eq!(cagr(&series, 5, 252), 0.0);
        // Exactly `window` observations still lacks a start point
        assert_eq!(total_return(&series, 3), 0.0);
        assert_eq!(cagr(&series, 3, 252), 0.0);
    }

    #[test]
    fn test_empty_series_returns_zero() {
        let series = PriceSeries::empty();
        assert_eq!(total_return(&series, 1), 0.0);
        assert_eq!(cagr(&series, 1, 252), 0.0);
        assert_eq!(ytd_return(&series, 2024), 0.0);
    }

    #[test]
    fn test_doubling_over_one_year() {
        let series = linear(50.0, 100.0, 252);

        assert_relative_eq!(total_return(&series, 252), 100.0, epsilon = 1e-9);
        assert_relative_eq!(cagr(&series, 252, 252), 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_total_return_uses_last_window() {
        // Leading history is ignored
        let mut closes = vec![1.0; 10];
        closes.extend([100.0, 90.0, 80.0]);
        let series = daily_series(&closes);

        assert_relative_eq!(total_return(&series, 2), -20.0, epsilon = 1e-9);
    }

    #[test]
    fn test_cagr_annualizes_multi_year_window() {
        // 4x over three years of trading days
        let series = linear(25.0, 100.0, 756);
        let expected = (4.0_f64.powf(1.0 / 3.0) - 1.0) * 100.0;

        assert_relative_eq!(cagr(&series, 756, 252), expected, epsilon = 1e-9);
    }

    #[test]
    fn test_zero_start_price_is_guarded() {
        let series = daily_series(&[0.0, 5.0, 10.0]);

        let growth = cagr(&series, 2, 252);
        assert_eq!(growth, 0.0);
        assert!(growth.is_finite());
        assert_eq!(total_return(&series, 2), 0.0);
    }

    #[test]
    fn test_zero_end_price_is_total_loss() {
        let series = daily_series(&[10.0, 5.0, 0.0]);

        assert_relative_eq!(total_return(&series, 2), -100.0, epsilon = 1e-9);
        assert_relative_eq!(cagr(&series, 2, 252), -100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_ytd_uses_first_and_last_traded_day() {
        let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();
        let series = PriceSeries::new(vec![
            PricePoint::new(date(2023, 12, 29), 50.0),
            PricePoint::new(date(2024, 1, 2), 100.0),
            PricePoint::new(date(2024, 3, 15), 130.0),
            PricePoint::new(date(2024, 6, 28), 120.0),
        ])
        .unwrap();

        assert_relative_eq!(ytd_return(&series, 2024), 20.0, epsilon = 1e-9);
    }

    #[test]
    fn test_ytd_single_observation_is_flat() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let series = PriceSeries::new(vec![PricePoint::new(date, 100.0)]).unwrap();

        assert_eq!(ytd_return(&series, 2024), 0.0);
    }

    #[test]
    fn test_ytd_without_current_year_data() {
        // daily_series starts in 2020
        let series = daily_series(&[100.0, 110.0]);
        assert_eq!(ytd_return(&series, 2024), 0.0);
    }
}
