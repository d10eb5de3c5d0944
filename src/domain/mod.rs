//! Core domain types and logic.

pub mod asset_return;
pub mod backtest;
pub mod config_validation;
pub mod error;
pub mod indexed;
pub mod indicator;
pub mod metrics;
pub mod portfolio;
pub mod price;
pub mod signal;
pub mod strategy;
pub mod table;
pub mod universe;
