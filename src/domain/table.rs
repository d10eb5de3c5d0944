//! Date-keyed table of named numeric columns.
//!
//! Columns are only ever joined by date key, never by position, so the order
//! in which per-asset series arrive has no effect on the aligned result.

use crate::domain::error::CrossfolioError;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// How series with differing date axes are joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlignmentPolicy {
    /// Every series must cover exactly the same dates.
    #[default]
    Strict,
    /// Keep only dates present in every series; other rows are dropped.
    Intersect,
}

impl FromStr for AlignmentPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "strict" => Ok(AlignmentPolicy::Strict),
            "intersect" => Ok(AlignmentPolicy::Intersect),
            other => Err(format!(
                "unknown alignment policy '{}', expected strict or intersect",
                other
            )),
        }
    }
}

impl fmt::Display for AlignmentPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlignmentPolicy::Strict => write!(f, "strict"),
            AlignmentPolicy::Intersect => write!(f, "intersect"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NamedSeries {
    pub name: String,
    pub points: Vec<(NaiveDate, f64)>,
}

impl NamedSeries {
    pub fn new(name: impl Into<String>, points: Vec<(NaiveDate, f64)>) -> Self {
        Self {
            name: name.into(),
            points,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DateTable {
    dates: Vec<NaiveDate>,
    names: Vec<String>,
    columns: Vec<Vec<f64>>,
}

impl DateTable {
    pub fn align(series: &[NamedSeries], policy: AlignmentPolicy) -> Result<Self, CrossfolioError> {
        let Some(first) = series.first() else {
            return Ok(Self::default());
        };

        let keyed: Vec<BTreeMap<NaiveDate, f64>> = series
            .iter()
            .map(|s| s.points.iter().copied().collect())
            .collect();
        let reference = &keyed[0];

        let dates: Vec<NaiveDate> = match policy {
            AlignmentPolicy::Strict => {
                for (s, map) in series.iter().zip(&keyed).skip(1) {
                    if let Some(date) = first_difference(reference, map) {
                        return Err(CrossfolioError::MisalignedAssets {
                            symbol: s.name.clone(),
                            reason: format!(
                                "date axis differs from {} at {}",
                                first.name, date
                            ),
                        });
                    }
                }
                reference.keys().copied().collect()
            }
            AlignmentPolicy::Intersect => {
                let common: Vec<NaiveDate> = reference
                    .keys()
                    .filter(|d| keyed.iter().all(|m| m.contains_key(*d)))
                    .copied()
                    .collect();
                if common.is_empty() {
                    return Err(CrossfolioError::MisalignedAssets {
                        symbol: series
                            .iter()
                            .map(|s| s.name.as_str())
                            .collect::<Vec<_>>()
                            .join(","),
                        reason: "no dates common to all assets".into(),
                    });
                }
                common
            }
        };

        let columns = keyed
            .iter()
            .map(|map| dates.iter().map(|d| map[d]).collect())
            .collect();

        Ok(Self {
            dates,
            names: series.iter().map(|s| s.name.clone()).collect(),
            columns,
        })
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| self.columns[i].as_slice())
    }

    /// Sum across all columns for each date.
    pub fn row_sums(&self) -> Vec<f64> {
        (0..self.len())
            .map(|row| self.columns.iter().map(|col| col[row]).sum())
            .collect()
    }

    /// Drops the first `n` rows.
    pub fn skip_rows(&self, n: usize) -> Self {
        let n = n.min(self.len());
        Self {
            dates: self.dates[n..].to_vec(),
            names: self.names.clone(),
            columns: self.columns.iter().map(|c| c[n..].to_vec()).collect(),
        }
    }
}

fn first_difference(
    reference: &BTreeMap<NaiveDate, f64>,
    other: &BTreeMap<NaiveDate, f64>,
) -> Option<NaiveDate> {
    let mut left = reference.keys();
    let mut right = other.keys();
    loop {
        match (left.next(), right.next()) {
            (Some(a), Some(b)) if a == b => continue,
            (Some(a), Some(b)) => return Some(*a.min(b)),
            (Some(a), None) => return Some(*a),
            (None, Some(b)) => return Some(*b),
            (None, None) => return None,
        }
    }
}
