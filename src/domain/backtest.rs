//! Backtest pipeline: fetch prices, aggregate, summarize.
//!
//! BacktestConfig carries every parameter of a run explicitly; nothing is
//! read from process-wide state.

use crate::domain::error::CrossfolioError;
use crate::domain::metrics::Comparison;
use crate::domain::portfolio::{
    AggregationOptions, AssetAllocation, PortfolioReturns, aggregate_portfolio,
};
use crate::domain::strategy::CrossoverParams;
use crate::domain::table::AlignmentPolicy;
use crate::domain::universe::Universe;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub params: CrossoverParams,
    pub alignment: AlignmentPolicy,
    pub parallel: bool,
    pub risk_free_rate: f64,
}

impl BacktestConfig {
    pub fn aggregation_options(&self) -> AggregationOptions {
        AggregationOptions {
            alignment: self.alignment,
            parallel: self.parallel,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestResult {
    pub config: BacktestConfig,
    pub returns: PortfolioReturns,
    pub comparison: Comparison,
}

/// Fetches every symbol of the universe, in universe order.
///
/// The first symbol the data port cannot serve aborts the run.
pub fn fetch_allocations(
    data_port: &dyn DataPort,
    universe: &Universe,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<Vec<AssetAllocation>, CrossfolioError> {
    universe
        .iter()
        .map(|(symbol, weight)| {
            let series = data_port.fetch_prices(symbol, start_date, end_date)?;
            debug!(
                symbol,
                observations = series.len(),
                first = %series.first_date(),
                last = %series.last_date(),
                "fetched prices"
            );
            Ok(AssetAllocation::new(series, weight))
        })
        .collect()
}

pub fn run_backtest(
    data_port: &dyn DataPort,
    universe: &Universe,
    config: &BacktestConfig,
) -> Result<BacktestResult, CrossfolioError> {
    let allocations = fetch_allocations(data_port, universe, config.start_date, config.end_date)?;
    let returns = aggregate_portfolio(
        &allocations,
        &config.params,
        config.aggregation_options(),
    )?;
    let comparison = Comparison::compute(
        &returns.portfolio,
        &returns.invested,
        config.risk_free_rate,
    );

    Ok(BacktestResult {
        config: config.clone(),
        returns,
        comparison,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> BacktestConfig {
        BacktestConfig {
            start_date: NaiveDate::from_ymd_opt(2007, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 12, 12).unwrap(),
            params: CrossoverParams::default(),
            alignment: AlignmentPolicy::Strict,
            parallel: false,
            risk_free_rate: 0.0,
        }
    }

    #[test]
    fn config_fields() {
        let c = sample_config();
        assert_eq!(c.start_date, NaiveDate::from_ymd_opt(2007, 1, 1).unwrap());
        assert_eq!(c.end_date, NaiveDate::from_ymd_opt(2024, 12, 12).unwrap());
        assert_eq!(c.params.short_window, 5);
        assert_eq!(c.params.long_window, 200);
    }

    #[test]
    fn aggregation_options_follow_config() {
        let c = BacktestConfig {
            alignment: AlignmentPolicy::Intersect,
            parallel: true,
            ..sample_config()
        };
        let options = c.aggregation_options();
        assert_eq!(options.alignment, AlignmentPolicy::Intersect);
        assert!(options.parallel);
    }
}
