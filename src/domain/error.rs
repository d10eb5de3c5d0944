//! Domain error types.

use chrono::NaiveDate;

/// Top-level error type for crossfolio.
#[derive(Debug, thiserror::Error)]
pub enum CrossfolioError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data source error: {reason}")]
    DataSource { reason: String },

    #[error("no data for {symbol} between {start} and {end}")]
    DataUnavailable {
        symbol: String,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("insufficient data for {symbol}: have {observations} rows, need {minimum}")]
    InsufficientData {
        symbol: String,
        observations: usize,
        minimum: usize,
    },

    #[error("misaligned assets at {symbol}: {reason}")]
    MisalignedAssets { symbol: String, reason: String },

    #[error("invalid weight for {symbol}: {reason}")]
    InvalidWeight { symbol: String, reason: String },

    #[error("invalid price series for {symbol}: {reason}")]
    InvalidPrice { symbol: String, reason: String },

    #[error("invalid moving-average windows: {reason}")]
    InvalidWindow { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&CrossfolioError> for std::process::ExitCode {
    fn from(err: &CrossfolioError) -> Self {
        let code: u8 = match err {
            CrossfolioError::Io(_) => 1,
            CrossfolioError::ConfigParse { .. }
            | CrossfolioError::ConfigMissing { .. }
            | CrossfolioError::ConfigInvalid { .. } => 2,
            CrossfolioError::DataSource { .. } => 3,
            CrossfolioError::MisalignedAssets { .. }
            | CrossfolioError::InvalidWeight { .. }
            | CrossfolioError::InvalidPrice { .. }
            | CrossfolioError::InvalidWindow { .. } => 4,
            CrossfolioError::DataUnavailable { .. } | CrossfolioError::InsufficientData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
