//! Summary statistics over indexed return series.

use crate::domain::indexed::{IndexedPoint, IndexedSeries};

const TRADING_DAYS_PER_YEAR: f64 = 252.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    pub total_return: f64,
    pub annualized_return: f64,
    pub volatility: f64,
    pub sharpe_ratio: f64,
    pub sortino_ratio: f64,
    pub max_drawdown: f64,
    pub max_drawdown_duration: i64,
}

impl Metrics {
    pub fn compute(series: &IndexedSeries, risk_free_rate: f64) -> Self {
        let points = &series.points;

        let total_return = match (points.first(), points.last()) {
            (Some(first), Some(last)) if first.value > 0.0 => last.value / first.value - 1.0,
            _ => 0.0,
        };

        let years = points.len() as f64 / TRADING_DAYS_PER_YEAR;
        let annualized_return = if years > 0.0 && total_return.is_finite() {
            (1.0 + total_return).powf(1.0 / years) - 1.0
        } else {
            0.0
        };

        let (max_drawdown, max_drawdown_duration) = compute_drawdown(points);

        let daily_rf = risk_free_rate / TRADING_DAYS_PER_YEAR;
        let (volatility, sharpe_ratio, sortino_ratio) = compute_risk_adjusted(points, daily_rf);

        Metrics {
            total_return,
            annualized_return,
            volatility,
            sharpe_ratio,
            sortino_ratio,
            max_drawdown,
            max_drawdown_duration,
        }
    }
}

/// Strategy metrics side by side with the buy-and-hold baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub strategy: Metrics,
    pub baseline: Metrics,
}

impl Comparison {
    pub fn compute(strategy: &IndexedSeries, baseline: &IndexedSeries, risk_free_rate: f64) -> Self {
        Self {
            strategy: Metrics::compute(strategy, risk_free_rate),
            baseline: Metrics::compute(baseline, risk_free_rate),
        }
    }

    pub fn excess_return(&self) -> f64 {
        self.strategy.total_return - self.baseline.total_return
    }
}

fn compute_drawdown(points: &[IndexedPoint]) -> (f64, i64) {
    let Some(first) = points.first() else {
        return (0.0, 0);
    };

    let mut peak = first.value;
    let mut max_dd = 0.0_f64;
    let mut max_dd_duration = 0i64;
    let mut current_dd_duration = 0i64;

    for point in points {
        if point.value >= peak {
            peak = point.value;
            current_dd_duration = 0;
        } else if peak > 0.0 && point.value < peak {
            let dd = (peak - point.value) / peak;
            max_dd = max_dd.max(dd);
            current_dd_duration += 1;
            max_dd_duration = max_dd_duration.max(current_dd_duration);
        }
    }

    (max_dd, max_dd_duration)
}

fn compute_risk_adjusted(points: &[IndexedPoint], daily_rf: f64) -> (f64, f64, f64) {
    if points.len() < 2 {
        return (0.0, 0.0, 0.0);
    }

    let returns: Vec<f64> = points
        .windows(2)
        .map(|w| {
            if w[0].value > 0.0 {
                w[1].value / w[0].value - 1.0
            } else {
                0.0
            }
        })
        .collect();

    let n = returns.len() as f64;
    let mean: f64 = returns.iter().sum::<f64>() / n;
    let variance: f64 = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
    let stddev = variance.sqrt();
    let excess_return = mean - daily_rf;
    let annualizer = TRADING_DAYS_PER_YEAR.sqrt();

    let sharpe = if stddev > 0.0 {
        excess_return / stddev * annualizer
    } else {
        0.0
    };

    let downside_variance: f64 = returns
        .iter()
        .filter(|&&r| r < daily_rf)
        .map(|&r| (r - daily_rf).powi(2))
        .sum::<f64>()
        / n;
    let downside_stddev = downside_variance.sqrt();

    let sortino = if downside_stddev > 0.0 {
        excess_return / downside_stddev * annualizer
    } else {
        0.0
    };

    (stddev * annualizer, sharpe, sortino)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_series(values: &[f64]) -> IndexedSeries {
        IndexedSeries {
            name: "PortfolioReturn".into(),
            points: values
                .iter()
                .enumerate()
                .map(|(i, &v)| IndexedPoint {
                    date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
                        + chrono::Duration::days(i as i64),
                    value: v,
                })
                .collect(),
        }
    }

    #[test]
    fn metrics_empty_series() {
        let metrics = Metrics::compute(&make_series(&[]), 0.0);
        assert_eq!(metrics.total_return, 0.0);
        assert_eq!(metrics.annualized_return, 0.0);
        assert_eq!(metrics.max_drawdown, 0.0);
        assert_eq!(metrics.sharpe_ratio, 0.0);
    }

    #[test]
    fn metrics_total_return() {
        let up = Metrics::compute(&make_series(&[100.0, 110.0]), 0.0);
        assert!((up.total_return - 0.10).abs() < 1e-9);

        let down = Metrics::compute(&make_series(&[100.0, 90.0]), 0.0);
        assert!((down.total_return + 0.10).abs() < 1e-9);
    }

    #[test]
    fn metrics_flat_year_has_zero_annualized_return() {
        let metrics = Metrics::compute(&make_series(&[100.0; 252]), 0.0);
        assert!(metrics.annualized_return.abs() < 1e-9);
        assert_eq!(metrics.volatility, 0.0);
        assert_eq!(metrics.sharpe_ratio, 0.0);
        assert_eq!(metrics.max_drawdown_duration, 0);
    }

    #[test]
    fn metrics_max_drawdown() {
        let (dd, _) = compute_drawdown(&make_series(&[100.0, 110.0, 90.0, 95.0, 80.0, 100.0]).points);
        assert!((dd - (110.0 - 80.0) / 110.0).abs() < 1e-9);
    }

    #[test]
    fn metrics_max_drawdown_duration() {
        let (_, duration) =
            compute_drawdown(&make_series(&[100.0, 110.0, 100.0, 90.0, 85.0, 95.0]).points);
        assert_eq!(duration, 4);
    }

    #[test]
    fn drawdown_duration_resets_on_recovery_to_peak() {
        let (dd, duration) =
            compute_drawdown(&make_series(&[100.0, 90.0, 100.0, 95.0]).points);
        assert_eq!(duration, 1);
        assert!((dd - 0.1).abs() < 1e-12);
    }

    #[test]
    fn metrics_sharpe_positive_for_steady_gains() {
        let values: Vec<f64> = (0..253).map(|i| 100.0 * (1.0 + 0.001 * i as f64)).collect();
        let metrics = Metrics::compute(&make_series(&values), 0.0);
        assert!(metrics.sharpe_ratio > 0.0);
        assert!(metrics.volatility > 0.0);
    }

    #[test]
    fn metrics_sortino_finite() {
        let (_, sharpe, sortino) = compute_risk_adjusted(
            &make_series(&[100.0, 101.0, 100.5, 101.5, 100.0, 102.0]).points,
            0.0,
        );
        assert!(sharpe.is_finite());
        assert!(sortino.is_finite());
    }

    #[test]
    fn comparison_excess_return() {
        let strategy = make_series(&[100.0, 120.0]);
        let baseline = make_series(&[100.0, 105.0]);
        let cmp = Comparison::compute(&strategy, &baseline, 0.0);
        assert!((cmp.excess_return() - 0.15).abs() < 1e-9);
    }
}
