//! Configuration validation.
//!
//! Validates all config fields before any data is fetched.

use crate::domain::error::CrossfolioError;
use crate::domain::strategy::{DEFAULT_LONG_WINDOW, DEFAULT_SHORT_WINDOW};
use crate::domain::table::AlignmentPolicy;
use crate::domain::universe::{Universe, parse_symbols, parse_weights};
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), CrossfolioError> {
    validate_dates(config)?;
    validate_alignment(config)?;
    validate_risk_free_rate(config)?;
    parse_parallel(config)?;
    Ok(())
}

pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<(), CrossfolioError> {
    validate_windows(config)
}

pub fn validate_portfolio_config(config: &dyn ConfigPort) -> Result<(), CrossfolioError> {
    parse_universe(config).map(|_| ())
}

/// Reads `[portfolio] symbols` and the optional `[portfolio] weights`.
pub fn parse_universe(config: &dyn ConfigPort) -> Result<Universe, CrossfolioError> {
    let symbols_str =
        config
            .get_non_empty("portfolio", "symbols")
            .ok_or_else(|| CrossfolioError::ConfigMissing {
                section: "portfolio".to_string(),
                key: "symbols".to_string(),
            })?;
    let symbols = parse_symbols(&symbols_str).map_err(|e| invalid("portfolio", "symbols", e))?;

    let weights = match config.get_non_empty("portfolio", "weights") {
        Some(w) => Some(parse_weights(&w).map_err(|e| invalid("portfolio", "weights", e))?),
        None => None,
    };

    Universe::new(symbols, weights).map_err(|e| invalid("portfolio", "weights", e))
}

pub fn parse_date(
    config: &dyn ConfigPort,
    section: &str,
    field: &str,
) -> Result<NaiveDate, CrossfolioError> {
    match config.get_string(section, field) {
        None => Err(CrossfolioError::ConfigMissing {
            section: section.to_string(),
            key: field.to_string(),
        }),
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
            CrossfolioError::ConfigInvalid {
                section: section.to_string(),
                key: field.to_string(),
                reason: format!("invalid {} format, expected YYYY-MM-DD", field),
            }
        }),
    }
}

pub fn parse_alignment(config: &dyn ConfigPort) -> Result<AlignmentPolicy, CrossfolioError> {
    match config.get_non_empty("backtest", "alignment") {
        None => Ok(AlignmentPolicy::default()),
        Some(s) => s
            .parse::<AlignmentPolicy>()
            .map_err(|reason| invalid("backtest", "alignment", reason)),
    }
}

/// Reads a `[strategy]` window. Absent or blank means `default`; anything
/// that is not a whole non-negative number is rejected.
pub fn parse_window(
    config: &dyn ConfigPort,
    key: &str,
    default: usize,
) -> Result<usize, CrossfolioError> {
    match config.get_non_empty("strategy", key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse::<usize>().map_err(|_| {
            invalid(
                "strategy",
                key,
                format!("{} must be a non-negative integer, got '{}'", key, raw.trim()),
            )
        }),
    }
}

pub fn parse_risk_free_rate(config: &dyn ConfigPort) -> Result<f64, CrossfolioError> {
    let Some(raw) = config.get_non_empty("backtest", "risk_free_rate") else {
        return Ok(0.0);
    };
    let value = raw.trim().parse::<f64>().map_err(|_| {
        invalid(
            "backtest",
            "risk_free_rate",
            format!("risk_free_rate must be a number, got '{}'", raw.trim()),
        )
    })?;
    if !(0.0..1.0).contains(&value) {
        return Err(invalid(
            "backtest",
            "risk_free_rate",
            "risk_free_rate must be between 0 and 1",
        ));
    }
    Ok(value)
}

pub fn parse_parallel(config: &dyn ConfigPort) -> Result<bool, CrossfolioError> {
    let Some(raw) = config.get_non_empty("backtest", "parallel") else {
        return Ok(false);
    };
    match raw.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        other => Err(invalid(
            "backtest",
            "parallel",
            format!("parallel must be true or false, got '{}'", other),
        )),
    }
}

fn invalid(section: &str, key: &str, reason: impl ToString) -> CrossfolioError {
    CrossfolioError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), CrossfolioError> {
    let start_date = parse_date(config, "backtest", "start_date")?;
    let end_date = parse_date(config, "backtest", "end_date")?;

    if start_date >= end_date {
        return Err(invalid(
            "backtest",
            "start_date",
            "start_date must be before end_date",
        ));
    }
    Ok(())
}

fn validate_alignment(config: &dyn ConfigPort) -> Result<(), CrossfolioError> {
    parse_alignment(config).map(|_| ())
}

fn validate_risk_free_rate(config: &dyn ConfigPort) -> Result<(), CrossfolioError> {
    parse_risk_free_rate(config).map(|_| ())
}

fn validate_windows(config: &dyn ConfigPort) -> Result<(), CrossfolioError> {
    let short = parse_window(config, "short_window", DEFAULT_SHORT_WINDOW)?;
    let long = parse_window(config, "long_window", DEFAULT_LONG_WINDOW)?;

    if short < 1 {
        return Err(invalid(
            "strategy",
            "short_window",
            "short_window must be at least 1",
        ));
    }
    if long <= short {
        return Err(invalid(
            "strategy",
            "long_window",
            "long_window must be greater than short_window",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct MockConfig {
        values: HashMap<(String, String), String>,
    }

    impl MockConfig {
        fn new() -> Self {
            Self {
                values: HashMap::new(),
            }
        }

        fn set(mut self, section: &str, key: &str, value: &str) -> Self {
            self.values
                .insert((section.to_string(), key.to_string()), value.to_string());
            self
        }
    }

    impl ConfigPort for MockConfig {
        fn get_string(&self, section: &str, key: &str) -> Option<String> {
            self.values
                .get(&(section.to_string(), key.to_string()))
                .cloned()
        }

        fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
            self.get_string(section, key)
                .and_then(|v| v.parse().ok())
                .unwrap_or(default)
        }

        fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
            self.get_string(section, key)
                .and_then(|v| v.parse().ok())
                .unwrap_or(default)
        }

        fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
            self.get_string(section, key)
                .and_then(|v| v.parse().ok())
                .unwrap_or(default)
        }
    }

    fn valid_backtest() -> MockConfig {
        MockConfig::new()
            .set("backtest", "start_date", "2007-01-01")
            .set("backtest", "end_date", "2024-12-12")
    }

    #[test]
    fn backtest_config_valid() {
        assert!(validate_backtest_config(&valid_backtest()).is_ok());
    }

    #[test]
    fn backtest_config_missing_start_date() {
        let config = MockConfig::new().set("backtest", "end_date", "2024-12-12");
        let err = validate_backtest_config(&config).unwrap_err();
        assert!(matches!(err, CrossfolioError::ConfigMissing { key, .. } if key == "start_date"));
    }

    #[test]
    fn backtest_config_bad_date_format() {
        let config = valid_backtest().set("backtest", "end_date", "12/12/2024");
        let err = validate_backtest_config(&config).unwrap_err();
        assert!(matches!(err, CrossfolioError::ConfigInvalid { key, .. } if key == "end_date"));
    }

    #[test]
    fn backtest_config_start_after_end() {
        let config = valid_backtest().set("backtest", "start_date", "2025-01-01");
        let err = validate_backtest_config(&config).unwrap_err();
        assert!(matches!(err, CrossfolioError::ConfigInvalid { key, .. } if key == "start_date"));
    }

    #[test]
    fn backtest_config_unknown_alignment() {
        let config = valid_backtest().set("backtest", "alignment", "outer");
        let err = validate_backtest_config(&config).unwrap_err();
        assert!(matches!(err, CrossfolioError::ConfigInvalid { key, .. } if key == "alignment"));
    }

    #[test]
    fn backtest_config_risk_free_rate_range() {
        let config = valid_backtest().set("backtest", "risk_free_rate", "1.5");
        assert!(validate_backtest_config(&config).is_err());
        let config = valid_backtest().set("backtest", "risk_free_rate", "0.04");
        assert!(validate_backtest_config(&config).is_ok());
    }

    #[test]
    fn parse_alignment_defaults_to_strict() {
        assert_eq!(
            parse_alignment(&MockConfig::new()).unwrap(),
            AlignmentPolicy::Strict
        );
        let config = MockConfig::new().set("backtest", "alignment", "intersect");
        assert_eq!(
            parse_alignment(&config).unwrap(),
            AlignmentPolicy::Intersect
        );
    }

    #[test]
    fn strategy_config_defaults_are_valid() {
        assert!(validate_strategy_config(&MockConfig::new()).is_ok());
    }

    #[test]
    fn strategy_config_rejects_zero_short_window() {
        let config = MockConfig::new().set("strategy", "short_window", "0");
        let err = validate_strategy_config(&config).unwrap_err();
        assert!(matches!(err, CrossfolioError::ConfigInvalid { key, .. } if key == "short_window"));
    }

    #[test]
    fn strategy_config_rejects_long_not_above_short() {
        let config = MockConfig::new()
            .set("strategy", "short_window", "50")
            .set("strategy", "long_window", "20");
        let err = validate_strategy_config(&config).unwrap_err();
        assert!(matches!(err, CrossfolioError::ConfigInvalid { key, .. } if key == "long_window"));
    }

    #[test]
    fn strategy_config_rejects_malformed_windows() {
        for raw in ["abc", "2OO", "12.5", "-3"] {
            let config = MockConfig::new().set("strategy", "long_window", raw);
            let err = validate_strategy_config(&config).unwrap_err();
            assert!(
                matches!(&err, CrossfolioError::ConfigInvalid { key, .. } if key == "long_window"),
                "{raw}: {err:?}"
            );
        }
    }

    #[test]
    fn parse_window_defaults_when_blank() {
        assert_eq!(parse_window(&MockConfig::new(), "short_window", 5).unwrap(), 5);
        let config = MockConfig::new().set("strategy", "short_window", "  ");
        assert_eq!(parse_window(&config, "short_window", 5).unwrap(), 5);
        let config = MockConfig::new().set("strategy", "short_window", " 8 ");
        assert_eq!(parse_window(&config, "short_window", 5).unwrap(), 8);
    }

    #[test]
    fn backtest_config_rejects_malformed_risk_free_rate() {
        let config = valid_backtest().set("backtest", "risk_free_rate", "lots");
        let err = validate_backtest_config(&config).unwrap_err();
        assert!(matches!(err, CrossfolioError::ConfigInvalid { key, .. } if key == "risk_free_rate"));
        assert_eq!(parse_risk_free_rate(&valid_backtest()).unwrap(), 0.0);
    }

    #[test]
    fn backtest_config_rejects_malformed_parallel() {
        let config = valid_backtest().set("backtest", "parallel", "maybe");
        let err = validate_backtest_config(&config).unwrap_err();
        assert!(matches!(err, CrossfolioError::ConfigInvalid { key, .. } if key == "parallel"));

        let config = valid_backtest().set("backtest", "parallel", "Yes");
        assert!(parse_parallel(&config).unwrap());
        assert!(!parse_parallel(&valid_backtest()).unwrap());
    }

    #[test]
    fn portfolio_config_missing_symbols() {
        let err = validate_portfolio_config(&MockConfig::new()).unwrap_err();
        assert!(matches!(err, CrossfolioError::ConfigMissing { key, .. } if key == "symbols"));

        let blank = MockConfig::new().set("portfolio", "symbols", "   ");
        assert!(validate_portfolio_config(&blank).is_err());
    }

    #[test]
    fn portfolio_config_equal_weights() {
        let config = MockConfig::new().set("portfolio", "symbols", "qqq,soxx");
        let universe = parse_universe(&config).unwrap();
        assert_eq!(universe.symbols, vec!["QQQ", "SOXX"]);
        assert_eq!(universe.weights, vec![0.5, 0.5]);
    }

    #[test]
    fn portfolio_config_explicit_weights() {
        let config = MockConfig::new()
            .set("portfolio", "symbols", "QQQ,SOXX")
            .set("portfolio", "weights", "0.7,0.3");
        let universe = parse_universe(&config).unwrap();
        assert_eq!(universe.weights, vec![0.7, 0.3]);
    }

    #[test]
    fn portfolio_config_weight_mismatch() {
        let config = MockConfig::new()
            .set("portfolio", "symbols", "QQQ,SOXX")
            .set("portfolio", "weights", "1.0");
        let err = validate_portfolio_config(&config).unwrap_err();
        assert!(matches!(err, CrossfolioError::ConfigInvalid { key, .. } if key == "weights"));
    }

    #[test]
    fn portfolio_config_duplicate_symbol() {
        let config = MockConfig::new().set("portfolio", "symbols", "QQQ,qqq");
        let err = validate_portfolio_config(&config).unwrap_err();
        assert!(matches!(err, CrossfolioError::ConfigInvalid { key, .. } if key == "symbols"));
    }
}
