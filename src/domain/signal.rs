//! Crossover signal derived from a short and a long moving average.
//!
//! A signal is `Long` when the short average sits above the long average,
//! `Flat` when it does not, and `Undefined` while either average is still
//! warming up. Averages within a relative tolerance of each other count as
//! equal; the tolerance absorbs summation rounding, so a constant-price
//! series never signals `Long`.

use crate::domain::indicator::{IndicatorSeries, Value};
use chrono::NaiveDate;

const RELATIVE_EPSILON: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Signal {
    #[default]
    Undefined,
    Flat,
    Long,
}

impl Signal {
    /// Position implied by this signal: 1 for `Long`, 0 otherwise.
    pub fn position(&self) -> u8 {
        match self {
            Signal::Long => 1,
            Signal::Flat | Signal::Undefined => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalPoint {
    pub date: NaiveDate,
    pub signal: Signal,
}

pub fn compare_averages(short: Value, long: Value) -> Signal {
    match (short, long) {
        (Value::Defined(s), Value::Defined(l)) => {
            let tolerance = RELATIVE_EPSILON * s.abs().max(l.abs());
            if s - l > tolerance {
                Signal::Long
            } else {
                Signal::Flat
            }
        }
        _ => Signal::Undefined,
    }
}

/// Pairs two moving-average series point by point.
///
/// Both series must come from the same price series, so they share length
/// and dates.
pub fn generate_signals(short: &IndicatorSeries, long: &IndicatorSeries) -> Vec<SignalPoint> {
    short
        .values
        .iter()
        .zip(long.values.iter())
        .map(|(s, l)| {
            debug_assert_eq!(s.date, l.date);
            SignalPoint {
                date: s.date,
                signal: compare_averages(s.value, l.value),
            }
        })
        .collect()
}
