//! Portfolio universe: which symbols to hold and at what weight.
//!
//! Parses symbol and weight lists from configuration. When no weights are
//! given every symbol receives an equal share.

use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq)]
pub struct Universe {
    pub symbols: Vec<String>,
    pub weights: Vec<f64>,
}

impl Universe {
    pub fn new(symbols: Vec<String>, weights: Option<Vec<f64>>) -> Result<Self, UniverseError> {
        if symbols.is_empty() {
            return Err(UniverseError::Empty);
        }
        let weights = match weights {
            Some(w) if w.len() != symbols.len() => {
                return Err(UniverseError::WeightCountMismatch {
                    symbols: symbols.len(),
                    weights: w.len(),
                });
            }
            Some(w) => w,
            None => equal_weights(symbols.len()),
        };
        Ok(Self { symbols, weights })
    }

    pub fn count(&self) -> usize {
        self.symbols.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.symbols
            .iter()
            .map(String::as_str)
            .zip(self.weights.iter().copied())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UniverseError {
    #[error("empty token in list")]
    EmptyToken,

    #[error("no symbols given")]
    Empty,

    #[error("duplicate symbol: {0}")]
    DuplicateSymbol(String),

    #[error("invalid weight: {0}")]
    InvalidWeight(String),

    #[error("{weights} weights given for {symbols} symbols")]
    WeightCountMismatch { symbols: usize, weights: usize },
}

pub fn equal_weights(n: usize) -> Vec<f64> {
    vec![1.0 / n as f64; n]
}

pub fn parse_symbols(input: &str) -> Result<Vec<String>, UniverseError> {
    let mut symbols = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(UniverseError::EmptyToken);
        }
        let symbol = trimmed.to_uppercase();
        if !seen.insert(symbol.clone()) {
            return Err(UniverseError::DuplicateSymbol(symbol));
        }
        symbols.push(symbol);
    }

    Ok(symbols)
}

pub fn parse_weights(input: &str) -> Result<Vec<f64>, UniverseError> {
    input
        .split(',')
        .map(|token| {
            let trimmed = token.trim();
            if trimmed.is_empty() {
                return Err(UniverseError::EmptyToken);
            }
            match trimmed.parse::<f64>() {
                Ok(w) if w.is_finite() && w > 0.0 => Ok(w),
                _ => Err(UniverseError::InvalidWeight(trimmed.to_string())),
            }
        })
        .collect()
}
