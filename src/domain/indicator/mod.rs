//! Moving-average indicators over closing prices.
//!
//! This module provides types for representing indicator values and series:
//! - `Value`: a numeric value that is either defined or still warming up
//! - `IndicatorPoint`: a single dated point in an indicator series
//! - `IndicatorType`: indicator identity + parameters
//! - `IndicatorSeries`: a time series of indicator values

pub mod sma;

use chrono::NaiveDate;
use std::fmt;

/// A numeric value that may be undefined (e.g. before an indicator's warm-up
/// window is filled).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Value {
    Defined(f64),
    #[default]
    Undefined,
}

impl Value {
    pub fn is_defined(&self) -> bool {
        matches!(self, Value::Defined(_))
    }

    pub fn get(&self) -> Option<f64> {
        match self {
            Value::Defined(v) => Some(*v),
            Value::Undefined => None,
        }
    }

    pub fn unwrap_or(&self, default: f64) -> f64 {
        self.get().unwrap_or(default)
    }
}

impl From<Option<f64>> for Value {
    fn from(value: Option<f64>) -> Self {
        match value {
            Some(v) => Value::Defined(v),
            None => Value::Undefined,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Defined(v) => write!(f, "{}", v),
            Value::Undefined => write!(f, "undefined"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorPoint {
    pub date: NaiveDate,
    pub value: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Sma(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<IndicatorPoint>,
}

impl IndicatorSeries {
    pub fn value_at(&self, index: usize) -> Value {
        self.values
            .get(index)
            .map(|p| p.value)
            .unwrap_or(Value::Undefined)
    }

    pub fn defined_count(&self) -> usize {
        self.values.iter().filter(|p| p.value.is_defined()).count()
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(period) => write!(f, "SMA({})", period),
        }
    }
}
