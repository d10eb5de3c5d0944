//! Report output port trait.

use crate::domain::backtest::BacktestResult;
use crate::domain::error::CrossfolioError;

/// Port for handing the indexed strategy and baseline series to an output
/// collaborator (file writer, plotter, ...).
pub trait ReportPort {
    fn write(&self, result: &BacktestResult, output_path: &str) -> Result<(), CrossfolioError>;
}
