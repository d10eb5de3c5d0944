//! Base-100 indexed series.

use crate::domain::error::CrossfolioError;
use chrono::NaiveDate;

pub const INDEX_BASE: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexedPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// A named series re-scaled so that its first value is exactly [`INDEX_BASE`].
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedSeries {
    pub name: String,
    pub points: Vec<IndexedPoint>,
}

impl IndexedSeries {
    /// Divides every value by the first one and multiplies by 100.
    pub fn rebase(
        name: impl Into<String>,
        dates: &[NaiveDate],
        raw: &[f64],
    ) -> Result<Self, CrossfolioError> {
        let name = name.into();
        debug_assert_eq!(dates.len(), raw.len());

        let Some(&base) = raw.first() else {
            return Err(CrossfolioError::InsufficientData {
                symbol: name,
                observations: 0,
                minimum: 1,
            });
        };
        if !base.is_finite() || base <= 0.0 {
            return Err(CrossfolioError::InvalidPrice {
                symbol: name,
                reason: format!("cannot re-base on first value {}", base),
            });
        }

        let points = dates
            .iter()
            .zip(raw)
            .map(|(&date, &v)| IndexedPoint {
                date,
                value: v / base * INDEX_BASE,
            })
            .collect();

        Ok(Self { name, points })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }

    pub fn last_value(&self) -> Option<f64> {
        self.points.last().map(|p| p.value)
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }
}
