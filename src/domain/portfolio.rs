//! Portfolio aggregation and re-indexing.
//!
//! Runs the per-asset return engine for every allocation, aligns the results
//! by date, sums them into a strategy series (`PortfolioReturn`) and a
//! buy-and-hold baseline (`InvestedReturn`), drops the common warm-up and
//! re-bases both series to 100.

use crate::domain::asset_return::{AssetReturns, compute_asset_returns};
use crate::domain::error::CrossfolioError;
use crate::domain::indexed::IndexedSeries;
use crate::domain::price::PriceSeries;
use crate::domain::strategy::CrossoverParams;
use crate::domain::table::{AlignmentPolicy, DateTable, NamedSeries};
use rayon::prelude::*;
use std::collections::HashSet;
use tracing::{debug, warn};

pub const PORTFOLIO_COLUMN: &str = "PortfolioReturn";
pub const INVESTED_COLUMN: &str = "InvestedReturn";

#[derive(Debug, Clone, PartialEq)]
pub struct AssetAllocation {
    pub series: PriceSeries,
    pub weight: f64,
}

impl AssetAllocation {
    pub fn new(series: PriceSeries, weight: f64) -> Self {
        Self { series, weight }
    }

    pub fn symbol(&self) -> &str {
        self.series.symbol()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AggregationOptions {
    pub alignment: AlignmentPolicy,
    /// Run the per-asset engine on the rayon thread pool.
    pub parallel: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioReturns {
    pub params: CrossoverParams,
    /// Per-asset engine output with normalized weights, in allocation order.
    pub assets: Vec<AssetReturns>,
    /// Weighted cumulative returns per asset, aligned and past warm-up.
    pub weighted_returns: DateTable,
    /// Weighted closing prices per asset, aligned and past warm-up.
    pub weighted_prices: DateTable,
    pub portfolio: IndexedSeries,
    pub invested: IndexedSeries,
    /// Rows of the longest asset not kept by alignment (non-zero only under
    /// `Intersect`).
    pub dropped_rows: usize,
}

/// Validates weights and scales them to sum to 1.0.
pub fn normalize_weights(allocations: &[AssetAllocation]) -> Result<Vec<f64>, CrossfolioError> {
    if allocations.is_empty() {
        return Err(CrossfolioError::InvalidWeight {
            symbol: "portfolio".into(),
            reason: "no assets to allocate".into(),
        });
    }

    for a in allocations {
        if !a.weight.is_finite() || a.weight <= 0.0 {
            return Err(CrossfolioError::InvalidWeight {
                symbol: a.symbol().to_string(),
                reason: format!("weight must be positive, got {}", a.weight),
            });
        }
    }

    let total: f64 = allocations.iter().map(|a| a.weight).sum();
    if !total.is_finite() || total <= 0.0 {
        return Err(CrossfolioError::InvalidWeight {
            symbol: "portfolio".into(),
            reason: format!("weights must sum to a positive total, got {}", total),
        });
    }

    Ok(allocations.iter().map(|a| a.weight / total).collect())
}

pub fn aggregate_portfolio(
    allocations: &[AssetAllocation],
    params: &CrossoverParams,
    options: AggregationOptions,
) -> Result<PortfolioReturns, CrossfolioError> {
    params.validate()?;
    let weights = normalize_weights(allocations)?;

    let mut seen = HashSet::new();
    for a in allocations {
        if !seen.insert(a.symbol()) {
            return Err(CrossfolioError::MisalignedAssets {
                symbol: a.symbol().to_string(),
                reason: "symbol appears more than once".into(),
            });
        }
        if a.series.len() < params.long_window {
            return Err(CrossfolioError::InsufficientData {
                symbol: a.symbol().to_string(),
                observations: a.series.len(),
                minimum: params.long_window,
            });
        }
    }

    let assets: Vec<AssetReturns> = if options.parallel {
        allocations
            .par_iter()
            .zip(&weights)
            .map(|(a, &w)| compute_asset_returns(&a.series, w, params))
            .collect::<Result<_, _>>()?
    } else {
        allocations
            .iter()
            .zip(&weights)
            .map(|(a, &w)| compute_asset_returns(&a.series, w, params))
            .collect::<Result<_, _>>()?
    };

    let (return_columns, price_columns): (Vec<NamedSeries>, Vec<NamedSeries>) = assets
        .iter()
        .map(|asset| {
            let returns = asset.rows.iter().map(|r| (r.date, r.weighted_return));
            let prices = asset.rows.iter().map(|r| (r.date, r.weighted_price));
            (
                NamedSeries::new(asset.symbol.clone(), returns.collect()),
                NamedSeries::new(asset.symbol.clone(), prices.collect()),
            )
        })
        .unzip();

    let aligned_returns = DateTable::align(&return_columns, options.alignment)?;
    let aligned_prices = DateTable::align(&price_columns, options.alignment)?;

    let longest = assets.iter().map(AssetReturns::len).max().unwrap_or(0);
    let dropped_rows = longest - aligned_returns.len();
    if dropped_rows > 0 {
        warn!(
            dropped_rows,
            aligned_rows = aligned_returns.len(),
            "dropped dates not shared by every asset"
        );
    }

    let weighted_returns = aligned_returns.skip_rows(params.long_window);
    let weighted_prices = aligned_prices.skip_rows(params.long_window);
    if weighted_returns.is_empty() {
        return Err(CrossfolioError::InsufficientData {
            symbol: "portfolio".into(),
            observations: aligned_returns.len(),
            minimum: params.long_window + 1,
        });
    }

    let portfolio = IndexedSeries::rebase(
        PORTFOLIO_COLUMN,
        weighted_returns.dates(),
        &weighted_returns.row_sums(),
    )?;
    let invested = IndexedSeries::rebase(
        INVESTED_COLUMN,
        weighted_prices.dates(),
        &weighted_prices.row_sums(),
    )?;

    debug!(
        assets = assets.len(),
        rows = portfolio.len(),
        warmup = params.long_window,
        "aggregated portfolio"
    );

    Ok(PortfolioReturns {
        params: *params,
        assets,
        weighted_returns,
        weighted_prices,
        portfolio,
        invested,
        dropped_rows,
    })
}
