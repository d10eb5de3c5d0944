//! CSV report adapter.
//!
//! Writes one row per retained date: the two base-100 series followed by each
//! asset's weighted cumulative return column.

use crate::domain::backtest::BacktestResult;
use crate::domain::error::CrossfolioError;
use crate::domain::portfolio::{INVESTED_COLUMN, PORTFOLIO_COLUMN};
use crate::ports::report_port::ReportPort;
use std::io;

#[derive(Debug, Default)]
pub struct CsvReportAdapter;

impl CsvReportAdapter {
    pub fn new() -> Self {
        Self
    }

    /// Writes the report to any sink; `write` is this bound to a file.
    pub fn write_to<W: io::Write>(
        &self,
        result: &BacktestResult,
        sink: W,
    ) -> Result<(), CrossfolioError> {
        let returns = &result.returns;
        let table = &returns.weighted_returns;
        let mut wtr = csv::Writer::from_writer(sink);

        let mut header = vec!["date", PORTFOLIO_COLUMN, INVESTED_COLUMN];
        header.extend(table.names().iter().map(String::as_str));
        wtr.write_record(&header).map_err(io::Error::from)?;

        let columns: Vec<&[f64]> = table
            .names()
            .iter()
            .filter_map(|name| table.column(name))
            .collect();

        for (row, (p, i)) in returns
            .portfolio
            .points
            .iter()
            .zip(&returns.invested.points)
            .enumerate()
        {
            let mut record = vec![p.date.to_string(), p.value.to_string(), i.value.to_string()];
            record.extend(columns.iter().map(|col| col[row].to_string()));
            wtr.write_record(&record).map_err(io::Error::from)?;
        }

        wtr.flush()?;
        Ok(())
    }
}

impl ReportPort for CsvReportAdapter {
    fn write(&self, result: &BacktestResult, output_path: &str) -> Result<(), CrossfolioError> {
        let file = std::fs::File::create(output_path)?;
        self.write_to(result, file)
    }
}
