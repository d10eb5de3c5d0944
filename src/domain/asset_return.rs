//! Per-asset signal and return engine.
//!
//! Turns one asset's closing prices into a compounded strategy return:
//!
//! 1. SMA over the short and long windows
//! 2. `Long` signal while the short average is above the long one
//! 3. Position at date t is the signal at t-1 (next-bar execution)
//! 4. Period return is close(t) / close(t-1) - 1
//! 5. Strategy return is the period return while in position, 0 otherwise
//! 6. Cumulative return compounds `1 + strategy return` from 1.0
//! 7. Weighted return scales the cumulative return by the asset weight
//!
//! A series shorter than the long window is valid here: no signal is ever
//! defined, so the cumulative return stays flat at 1.0.

use crate::domain::error::CrossfolioError;
use crate::domain::indicator::Value;
use crate::domain::indicator::sma::calculate_sma;
use crate::domain::price::PriceSeries;
use crate::domain::signal::{Signal, generate_signals};
use crate::domain::strategy::CrossoverParams;
use chrono::NaiveDate;
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct AssetReturnRow {
    pub date: NaiveDate,
    pub close: f64,
    pub short_sma: Value,
    pub long_sma: Value,
    pub signal: Signal,
    /// Lagged signal: 1 when the previous date's signal was `Long`.
    pub position: u8,
    pub period_return: Value,
    pub strategy_return: f64,
    pub cumulative_return: f64,
    pub weighted_return: f64,
    pub weighted_price: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssetReturns {
    pub symbol: String,
    pub weight: f64,
    pub params: CrossoverParams,
    pub rows: Vec<AssetReturnRow>,
}

impl AssetReturns {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.rows.iter().map(|r| r.date)
    }

    pub fn final_cumulative_return(&self) -> f64 {
        self.rows.last().map(|r| r.cumulative_return).unwrap_or(1.0)
    }

    /// Fraction of post-warm-up rows spent in position.
    pub fn exposure(&self) -> f64 {
        let active = self.rows.get(self.params.long_window..).unwrap_or(&[]);
        if active.is_empty() {
            return 0.0;
        }
        let invested = active.iter().filter(|r| r.position == 1).count();
        invested as f64 / active.len() as f64
    }
}

pub fn validate_weight(symbol: &str, weight: f64) -> Result<(), CrossfolioError> {
    if !weight.is_finite() || weight <= 0.0 || weight > 1.0 {
        return Err(CrossfolioError::InvalidWeight {
            symbol: symbol.to_string(),
            reason: format!("weight must be in (0, 1], got {}", weight),
        });
    }
    Ok(())
}

pub fn compute_asset_returns(
    series: &PriceSeries,
    weight: f64,
    params: &CrossoverParams,
) -> Result<AssetReturns, CrossfolioError> {
    params.validate()?;
    validate_weight(series.symbol(), weight)?;

    let short = calculate_sma(series, params.short_window);
    let long = calculate_sma(series, params.long_window);
    let signals = generate_signals(&short, &long);

    let points = series.points();
    let mut rows = Vec::with_capacity(points.len());
    let mut cumulative = 1.0_f64;

    for (i, point) in points.iter().enumerate() {
        let (position, period_return) = if i == 0 {
            (0, Value::Undefined)
        } else {
            let prev = &points[i - 1];
            (
                signals[i - 1].signal.position(),
                Value::Defined(point.close / prev.close - 1.0),
            )
        };

        let strategy_return = if position == 1 {
            period_return.unwrap_or(0.0)
        } else {
            0.0
        };
        cumulative *= 1.0 + strategy_return;

        rows.push(AssetReturnRow {
            date: point.date,
            close: point.close,
            short_sma: short.value_at(i),
            long_sma: long.value_at(i),
            signal: signals[i].signal,
            position,
            period_return,
            strategy_return,
            cumulative_return: cumulative,
            weighted_return: cumulative * weight,
            weighted_price: point.close * weight,
        });
    }

    let result = AssetReturns {
        symbol: series.symbol().to_string(),
        weight,
        params: *params,
        rows,
    };

    debug!(
        symbol = %result.symbol,
        rows = result.len(),
        cumulative = result.final_cumulative_return(),
        exposure = result.exposure(),
        "computed asset returns"
    );

    Ok(result)
}
