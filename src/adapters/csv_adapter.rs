//! CSV file data adapter.
//!
//! One file per symbol, `<base_path>/<SYMBOL>.csv`, with a header row. The
//! `date` column (YYYY-MM-DD) and a `close` column are required; when there is
//! no `close` column, `adj_close` or `adj close` is used instead. Other columns
//! are ignored.

use crate::domain::error::CrossfolioError;
use crate::domain::price::{PricePoint, PriceSeries};
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

const CLOSE_COLUMNS: [&str; 3] = ["close", "adj_close", "adj close"];

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> Option<PathBuf> {
        [symbol.to_string(), symbol.to_lowercase()]
            .into_iter()
            .map(|name| self.base_path.join(format!("{}.csv", name)))
            .find(|path| path.is_file())
    }

    /// All rows of the symbol's file, unfiltered; `None` when there is no file.
    fn read_points(&self, symbol: &str) -> Result<Option<Vec<PricePoint>>, CrossfolioError> {
        let Some(path) = self.csv_path(symbol) else {
            return Ok(None);
        };
        let source_error = |reason: String| CrossfolioError::DataSource {
            reason: format!("{}: {}", path.display(), reason),
        };

        let mut rdr = csv::Reader::from_path(&path).map_err(|e| source_error(e.to_string()))?;
        let headers = rdr
            .headers()
            .map_err(|e| source_error(e.to_string()))?
            .clone();
        let column = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };

        let date_idx = column("date").ok_or_else(|| source_error("missing date column".into()))?;
        let close_idx = CLOSE_COLUMNS
            .iter()
            .find_map(|&name| column(name))
            .ok_or_else(|| source_error("missing close column".into()))?;

        let mut points = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| source_error(format!("CSV parse error: {}", e)))?;

            let date_str = record.get(date_idx).unwrap_or_default().trim();
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
                .map_err(|e| source_error(format!("invalid date '{}': {}", date_str, e)))?;

            let close_str = record.get(close_idx).unwrap_or_default().trim();
            let close: f64 = close_str
                .parse()
                .map_err(|e| source_error(format!("invalid close '{}' on {}: {}", close_str, date, e)))?;

            points.push(PricePoint { date, close });
        }

        Ok(Some(points))
    }
}

impl DataPort for CsvAdapter {
    fn fetch_prices(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, CrossfolioError> {
        let points: Vec<PricePoint> = self
            .read_points(symbol)?
            .unwrap_or_default()
            .into_iter()
            .filter(|p| p.date >= start_date && p.date <= end_date)
            .collect();

        if points.is_empty() {
            return Err(CrossfolioError::DataUnavailable {
                symbol: symbol.to_string(),
                start: start_date,
                end: end_date,
            });
        }

        PriceSeries::from_unsorted(symbol, points)
    }

    fn list_symbols(&self) -> Result<Vec<String>, CrossfolioError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| CrossfolioError::DataSource {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut symbols = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| CrossfolioError::DataSource {
                reason: format!("directory entry error: {}", e),
            })?;

            let path = entry.path();
            let is_csv = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
            if let (true, Some(stem)) = (is_csv, path.file_stem()) {
                symbols.push(stem.to_string_lossy().to_uppercase());
            }
        }

        symbols.sort();
        Ok(symbols)
    }

    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, CrossfolioError> {
        let points = self.read_points(symbol)?.unwrap_or_default();
        let first = points.iter().map(|p| p.date).min();
        let last = points.iter().map(|p| p.date).max();
        Ok(first.zip(last).map(|(first, last)| (first, last, points.len())))
    }
}
