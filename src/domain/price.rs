//! Closing-price series for a single asset.

use crate::domain::error::CrossfolioError;
use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

/// Date-ascending closing prices for one symbol.
///
/// Gaps (non-trading days) are simply absent. The constructor rejects empty
/// input, out-of-order or duplicate dates, and non-positive prices, so every
/// `PriceSeries` in the system is usable by the return engine.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    symbol: String,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(symbol: impl Into<String>, points: Vec<PricePoint>) -> Result<Self, CrossfolioError> {
        let symbol = symbol.into();
        let invalid = |reason: String| CrossfolioError::InvalidPrice {
            symbol: symbol.clone(),
            reason,
        };

        if points.is_empty() {
            return Err(invalid("series is empty".into()));
        }

        for (i, point) in points.iter().enumerate() {
            if !point.close.is_finite() || point.close <= 0.0 {
                return Err(invalid(format!(
                    "close on {} must be a positive number, got {}",
                    point.date, point.close
                )));
            }
            if i > 0 && point.date <= points[i - 1].date {
                let reason = if point.date == points[i - 1].date {
                    format!("duplicate date {}", point.date)
                } else {
                    format!("date {} is out of order", point.date)
                };
                return Err(invalid(reason));
            }
        }

        Ok(Self { symbol, points })
    }

    /// Builds a series from unordered `(date, close)` pairs, sorting by date first.
    pub fn from_unsorted(
        symbol: impl Into<String>,
        mut points: Vec<PricePoint>,
    ) -> Result<Self, CrossfolioError> {
        points.sort_by_key(|p| p.date);
        Self::new(symbol, points)
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first_date(&self) -> NaiveDate {
        self.points[0].date
    }

    pub fn last_date(&self) -> NaiveDate {
        self.points[self.points.len() - 1].date
    }

    pub fn closes(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.close)
    }
}
