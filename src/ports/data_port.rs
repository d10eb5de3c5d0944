//! Market data port trait.

use crate::domain::error::CrossfolioError;
use crate::domain::price::PriceSeries;
use chrono::NaiveDate;

/// Source of closing prices.
///
/// `fetch_prices` fails with `DataUnavailable` when the symbol has no rows in
/// the requested range. Retrying, if any, is the implementation's business.
pub trait DataPort {
    fn fetch_prices(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, CrossfolioError>;

    fn list_symbols(&self) -> Result<Vec<String>, CrossfolioError>;

    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, CrossfolioError>;
}
