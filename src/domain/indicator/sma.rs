//! Simple Moving Average indicator.
//!
//! SMA(n)[i] = (C[i-n+1] + ... + C[i]) / n
//! Warmup: first (n-1) points are undefined.
//! Each window is summed afresh; there is no running sum.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, Value};
use crate::domain::price::PriceSeries;

pub fn calculate_sma(series: &PriceSeries, period: usize) -> IndicatorSeries {
    let points = series.points();
    let mut values = Vec::with_capacity(points.len());

    for (i, point) in points.iter().enumerate() {
        let value = if period > 0 && i + 1 >= period {
            let window = &points[i + 1 - period..=i];
            let sum: f64 = window.iter().map(|p| p.close).sum();
            Value::Defined(sum / period as f64)
        } else {
            Value::Undefined
        };

        values.push(IndicatorPoint {
            date: point.date,
            value,
        });
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Sma(period),
        values,
    }
}
