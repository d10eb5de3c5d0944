//! Crossover strategy parameters.

use crate::domain::error::CrossfolioError;
use std::fmt;

pub const DEFAULT_SHORT_WINDOW: usize = 5;
pub const DEFAULT_LONG_WINDOW: usize = 200;

/// Window lengths of the two simple moving averages.
///
/// The long window doubles as the portfolio warm-up length: the aggregator
/// drops that many leading rows before re-indexing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrossoverParams {
    pub short_window: usize,
    pub long_window: usize,
}

impl Default for CrossoverParams {
    fn default() -> Self {
        Self {
            short_window: DEFAULT_SHORT_WINDOW,
            long_window: DEFAULT_LONG_WINDOW,
        }
    }
}

impl CrossoverParams {
    pub fn new(short_window: usize, long_window: usize) -> Result<Self, CrossfolioError> {
        let params = Self {
            short_window,
            long_window,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), CrossfolioError> {
        if self.short_window == 0 {
            return Err(CrossfolioError::InvalidWindow {
                reason: "short_window must be at least 1".into(),
            });
        }
        if self.short_window >= self.long_window {
            return Err(CrossfolioError::InvalidWindow {
                reason: format!(
                    "short_window ({}) must be less than long_window ({})",
                    self.short_window, self.long_window
                ),
            });
        }
        Ok(())
    }
}

impl fmt::Display for CrossoverParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SMA({}) > SMA({})", self.short_window, self.long_window)
    }
}
