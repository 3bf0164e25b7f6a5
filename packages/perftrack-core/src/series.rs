//! Price history for a single instrument.

use crate::{Error, Result};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// A single closing-price observation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PricePoint {
    /// Trading day
    pub date: NaiveDate,
    /// Closing price on that day
    pub close: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }
}

/// Ordered closing prices for one instrument.
///
/// Observations are strictly ascending by date with finite, non-negative
/// closes. An empty series is valid.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(transparent)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Build a series from points already ordered by date.
    ///
    /// Returns `Error::MalformedSeries` if dates are not strictly ascending
    /// or a close is negative or non-finite.
    pub fn new(points: Vec<PricePoint>) -> Result<Self> {
        for point in &points {
            if !point.close.is_finite() || point.close < 0.0 {
                return Err(Error::MalformedSeries(format!(
                    "invalid close {} on {}",
                    point.close, point.date
                )));
            }
        }

        if let Some(pair) = points.windows(2).find(|w| w[0].date >= w[1].date) {
            return Err(Error::MalformedSeries(format!(
                "dates out of order or duplicated: {} then {}",
                pair[0].date, pair[1].date
            )));
        }

        Ok(Self { points })
    }

    /// Build a series from points in any order; duplicates are still rejected.
    pub fn from_unsorted(mut points: Vec<PricePoint>) -> Result<Self> {
        points.sort_by_key(|p| p.date);
        Self::new(points)
    }

    /// An empty series.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    /// Closing price at `index`, oldest first.
    pub fn close_at(&self, index: usize) -> Option<f64> {
        self.points.get(index).map(|p| p.close)
    }

    /// Most recent observation.
    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// Most recent closing price.
    pub fn latest_price(&self) -> Option<f64> {
        self.last().map(|p| p.close)
    }

    /// Observations that fall within the calendar year `year`.
    pub fn in_year(&self, year: i32) -> impl Iterator<Item = &PricePoint> {
        self.points.iter().filter(move |p| p.date.year() == year)
    }

    /// Observations on or after `start`.
    pub fn since(&self, start: NaiveDate) -> Self {
        let first = self.points.partition_point(|p| p.date < start);
        Self {
            points: self.points[first..].to_vec(),
        }
    }
}

impl<'de> Deserialize<'de> for PriceSeries {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let points = Vec::<PricePoint>::deserialize(deserializer)?;
        PriceSeries::from_unsorted(points).map_err(serde::de::Error::custom)
    }
}
