#![allow(dead_code)]

use chrono::NaiveDate;
use crossfolio::domain::backtest::{BacktestConfig, BacktestResult};
use crossfolio::domain::error::CrossfolioError;
use crossfolio::domain::price::{PricePoint, PriceSeries};
use crossfolio::domain::strategy::CrossoverParams;
use crossfolio::domain::table::AlignmentPolicy;
use crossfolio::ports::data_port::DataPort;
use crossfolio::ports::report_port::ReportPort;
use std::cell::RefCell;
use std::collections::HashMap;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<PricePoint>>,
    pub errors: HashMap<String, String>,
    pub fetches: RefCell<Vec<String>>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
            fetches: RefCell::new(Vec::new()),
        }
    }

    pub fn with_series(mut self, series: &PriceSeries) -> Self {
        self.data
            .insert(series.symbol().to_string(), series.points().to_vec());
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_prices(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, CrossfolioError> {
        self.fetches.borrow_mut().push(symbol.to_string());
        if let Some(reason) = self.errors.get(symbol) {
            return Err(CrossfolioError::DataSource {
                reason: reason.clone(),
            });
        }
        let points: Vec<PricePoint> = self
            .data
            .get(symbol)
            .map(|points| {
                points
                    .iter()
                    .filter(|p| p.date >= start_date && p.date <= end_date)
                    .copied()
                    .collect()
            })
            .unwrap_or_default();
        if points.is_empty() {
            return Err(CrossfolioError::DataUnavailable {
                symbol: symbol.to_string(),
                start: start_date,
                end: end_date,
            });
        }
        PriceSeries::new(symbol, points)
    }

    fn list_symbols(&self) -> Result<Vec<String>, CrossfolioError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }

    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, CrossfolioError> {
        match self.data.get(symbol) {
            Some(points) if !points.is_empty() => Ok(Some((
                points[0].date,
                points[points.len() - 1].date,
                points.len(),
            ))),
            _ => Ok(None),
        }
    }
}

pub struct MockReportPort {
    pub calls: RefCell<Vec<(BacktestResult, String)>>,
}

impl MockReportPort {
    pub fn new() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
        }
    }
}

impl ReportPort for MockReportPort {
    fn write(&self, result: &BacktestResult, output_path: &str) -> Result<(), CrossfolioError> {
        self.calls
            .borrow_mut()
            .push((result.clone(), output_path.to_string()));
        Ok(())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// One point per calendar day starting at `start`.
pub fn make_points(start: NaiveDate, closes: &[f64]) -> Vec<PricePoint> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| PricePoint {
            date: start + chrono::Duration::days(i as i64),
            close,
        })
        .collect()
}

pub fn make_series(symbol: &str, closes: &[f64]) -> PriceSeries {
    PriceSeries::new(symbol, make_points(date(2020, 1, 1), closes)).unwrap()
}

/// `flat` rows at `base`, then `rising` rows each one unit higher.
pub fn flat_then_rising(base: f64, flat: usize, rising: usize) -> Vec<f64> {
    let mut closes = vec![base; flat];
    closes.extend((1..=rising).map(|i| base + i as f64));
    closes
}

/// Gently oscillating prices that cross their own averages repeatedly.
pub fn wavy_prices(count: usize, base: f64) -> Vec<f64> {
    (0..count)
        .map(|i| {
            let t = i as f64;
            base + 0.05 * t + 3.0 * (t / 7.0).sin() + 1.5 * (t / 23.0).cos()
        })
        .collect()
}

pub fn sample_config(params: CrossoverParams) -> BacktestConfig {
    BacktestConfig {
        start_date: date(2020, 1, 1),
        end_date: date(2030, 12, 31),
        params,
        alignment: AlignmentPolicy::Strict,
        parallel: false,
        risk_free_rate: 0.0,
    }
}
