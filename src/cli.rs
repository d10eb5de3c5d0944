//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info, warn};

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::backtest::{self as backtest_engine, BacktestConfig, BacktestResult};
use crate::domain::config_validation::{
    parse_alignment, parse_date, parse_parallel, parse_risk_free_rate, parse_universe,
    parse_window, validate_backtest_config, validate_portfolio_config, validate_strategy_config,
};
use crate::domain::error::CrossfolioError;
use crate::domain::portfolio::{INVESTED_COLUMN, PORTFOLIO_COLUMN};
use crate::domain::strategy::{CrossoverParams, DEFAULT_LONG_WINDOW, DEFAULT_SHORT_WINDOW};
use crate::domain::universe::{Universe, parse_symbols};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_REPORT_PATH: &str = "report.csv";

#[derive(Parser, Debug)]
#[command(name = "crossfolio", about = "SMA crossover portfolio backtester")]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Comma-separated symbols, equally weighted; replaces [portfolio]
        #[arg(long)]
        symbols: Option<String>,
        #[arg(long)]
        data_dir: Option<PathBuf>,
        #[arg(long)]
        dry_run: bool,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List symbols that have a CSV file in the data directory
    ListSymbols {
        #[arg(long)]
        data_dir: PathBuf,
    },
    /// Show the data range for a symbol
    Info {
        #[arg(long)]
        symbol: String,
        #[arg(long)]
        data_dir: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest {
            config,
            output,
            symbols,
            data_dir,
            dry_run,
        } => {
            if dry_run {
                run_dry_run(&config, symbols.as_deref(), data_dir.as_deref())
            } else {
                run_backtest(
                    &config,
                    output.as_deref(),
                    symbols.as_deref(),
                    data_dir.as_deref(),
                )
            }
        }
        Command::Validate { config } => run_validate(&config),
        Command::ListSymbols { data_dir } => run_list_symbols(&data_dir),
        Command::Info { symbol, data_dir } => run_info(&symbol, &data_dir),
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    info!(path = %path.display(), "loading config");
    FileConfigAdapter::from_file(path).map_err(|e| fail(&e))
}

fn fail(err: &CrossfolioError) -> ExitCode {
    error!("{err}");
    err.into()
}

/// Checks every config section. The `[portfolio]` section is skipped when
/// symbols come from the command line.
pub fn validate_config(
    config: &dyn ConfigPort,
    symbols_override: Option<&str>,
) -> Result<(), CrossfolioError> {
    validate_backtest_config(config)?;
    validate_strategy_config(config)?;
    if symbols_override.is_none() {
        validate_portfolio_config(config)?;
    }
    Ok(())
}

pub fn build_backtest_config(config: &dyn ConfigPort) -> Result<BacktestConfig, CrossfolioError> {
    let start_date = parse_date(config, "backtest", "start_date")?;
    let end_date = parse_date(config, "backtest", "end_date")?;
    let short_window = parse_window(config, "short_window", DEFAULT_SHORT_WINDOW)?;
    let long_window = parse_window(config, "long_window", DEFAULT_LONG_WINDOW)?;

    Ok(BacktestConfig {
        start_date,
        end_date,
        params: CrossoverParams::new(short_window, long_window)?,
        alignment: parse_alignment(config)?,
        parallel: parse_parallel(config)?,
        risk_free_rate: parse_risk_free_rate(config)?,
    })
}

pub fn resolve_universe(
    symbols_override: Option<&str>,
    config: &dyn ConfigPort,
) -> Result<Universe, CrossfolioError> {
    match symbols_override {
        Some(list) => parse_symbols(list)
            .and_then(|symbols| Universe::new(symbols, None))
            .map_err(|e| CrossfolioError::ConfigInvalid {
                section: "cli".into(),
                key: "symbols".into(),
                reason: e.to_string(),
            }),
        None => parse_universe(config),
    }
}

pub fn resolve_data_dir(data_dir_override: Option<&Path>, config: &dyn ConfigPort) -> PathBuf {
    data_dir_override
        .map(Path::to_path_buf)
        .or_else(|| config.get_non_empty("backtest", "data_dir").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}

fn run_backtest(
    config_path: &Path,
    output_path: Option<&Path>,
    symbols_override: Option<&str>,
    data_dir_override: Option<&Path>,
) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_config(&adapter, symbols_override) {
        return fail(&e);
    }

    let bt_config = match build_backtest_config(&adapter) {
        Ok(c) => c,
        Err(e) => return fail(&e),
    };

    let universe = match resolve_universe(symbols_override, &adapter) {
        Ok(u) => u,
        Err(e) => return fail(&e),
    };

    let data_dir = resolve_data_dir(data_dir_override, &adapter);
    info!(data_dir = %data_dir.display(), "reading prices");
    let data_port = CsvAdapter::new(data_dir);

    let output = output_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_REPORT_PATH));

    run_backtest_pipeline(
        &data_port,
        &CsvReportAdapter::new(),
        &universe,
        &bt_config,
        &output,
    )
}

pub fn run_backtest_pipeline(
    data_port: &dyn DataPort,
    report_port: &dyn ReportPort,
    universe: &Universe,
    bt_config: &BacktestConfig,
    output_path: &Path,
) -> ExitCode {
    info!(
        assets = universe.count(),
        start = %bt_config.start_date,
        end = %bt_config.end_date,
        strategy = %bt_config.params,
        alignment = %bt_config.alignment,
        "running backtest"
    );

    let result = match backtest_engine::run_backtest(data_port, universe, bt_config) {
        Ok(r) => r,
        Err(e) => return fail(&e),
    };

    info!(
        rows = result.returns.portfolio.len(),
        dropped_rows = result.returns.dropped_rows,
        warmup = bt_config.params.long_window,
        "portfolio aggregated"
    );

    print_summary(&result);

    let output = output_path.display().to_string();
    match report_port.write(&result, &output) {
        Ok(()) => {
            info!(path = %output, "report written");
            ExitCode::SUCCESS
        }
        Err(e) => fail(&e),
    }
}

fn pct(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

pub fn print_summary(result: &BacktestResult) {
    let returns = &result.returns;
    let strategy = &result.comparison.strategy;
    let baseline = &result.comparison.baseline;

    eprintln!("\n=== {} vs {} ===", PORTFOLIO_COLUMN, INVESTED_COLUMN);
    if let (Some(first), Some(last)) = (returns.portfolio.first_date(), returns.portfolio.last_date())
    {
        eprintln!(
            "Period:           {} to {} ({} rows)",
            first,
            last,
            returns.portfolio.len()
        );
    }
    eprintln!("{:<18}{:>12}{:>12}", "", "Strategy", "Buy & Hold");
    eprintln!(
        "{:<18}{:>12.2}{:>12.2}",
        "Final Value:",
        returns.portfolio.last_value().unwrap_or_default(),
        returns.invested.last_value().unwrap_or_default()
    );
    eprintln!(
        "{:<18}{:>12}{:>12}",
        "Total Return:",
        pct(strategy.total_return),
        pct(baseline.total_return)
    );
    eprintln!(
        "{:<18}{:>12}{:>12}",
        "Annualized:",
        pct(strategy.annualized_return),
        pct(baseline.annualized_return)
    );
    eprintln!(
        "{:<18}{:>12}{:>12}",
        "Volatility:",
        pct(strategy.volatility),
        pct(baseline.volatility)
    );
    eprintln!(
        "{:<18}{:>12.2}{:>12.2}",
        "Sharpe Ratio:", strategy.sharpe_ratio, baseline.sharpe_ratio
    );
    eprintln!(
        "{:<18}{:>12.2}{:>12.2}",
        "Sortino Ratio:", strategy.sortino_ratio, baseline.sortino_ratio
    );
    eprintln!(
        "{:<18}{:>12}{:>12}",
        "Max Drawdown:",
        format!("-{}", pct(strategy.max_drawdown)),
        format!("-{}", pct(baseline.max_drawdown))
    );
    eprintln!("Excess Return:    {}", pct(result.comparison.excess_return()));

    eprintln!("\n=== Per-Asset Summary ===");
    for asset in &returns.assets {
        eprintln!(
            "  {}:  weight {:.1}%, in market {:.1}%, strategy growth {:.2}x",
            asset.symbol,
            asset.weight * 100.0,
            asset.exposure() * 100.0,
            asset.final_cumulative_return(),
        );
    }
}

pub fn run_dry_run(
    config_path: &Path,
    symbols_override: Option<&str>,
    data_dir_override: Option<&Path>,
) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_config(&adapter, symbols_override) {
        return fail(&e);
    }
    let bt_config = match build_backtest_config(&adapter) {
        Ok(c) => c,
        Err(e) => return fail(&e),
    };
    let universe = match resolve_universe(symbols_override, &adapter) {
        Ok(u) => u,
        Err(e) => return fail(&e),
    };
    info!("config validated successfully");

    eprintln!("\nStrategy:   {}", bt_config.params);
    eprintln!(
        "Period:     {} to {}",
        bt_config.start_date, bt_config.end_date
    );
    eprintln!("Alignment:  {}", bt_config.alignment);
    eprintln!("Parallel:   {}", bt_config.parallel);
    eprintln!(
        "Data dir:   {}",
        resolve_data_dir(data_dir_override, &adapter).display()
    );

    eprintln!("\nUniverse:");
    for (symbol, weight) in universe.iter() {
        eprintln!("  {:<8} {:.4}", symbol, weight);
    }

    eprintln!("\nDry run complete: configuration is valid");
    ExitCode::SUCCESS
}

fn run_validate(config_path: &Path) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_config(&adapter, None).and_then(|()| build_backtest_config(&adapter))
    {
        return fail(&e);
    }

    eprintln!("Configuration is valid.");
    ExitCode::SUCCESS
}

fn run_list_symbols(data_dir: &Path) -> ExitCode {
    let adapter = CsvAdapter::new(data_dir.to_path_buf());

    let symbols = match adapter.list_symbols() {
        Ok(s) => s,
        Err(e) => return fail(&e),
    };

    if symbols.is_empty() {
        warn!(data_dir = %data_dir.display(), "no symbols found");
    } else {
        for symbol in &symbols {
            println!("{}", symbol);
        }
        eprintln!("{} symbols found", symbols.len());
    }
    ExitCode::SUCCESS
}

fn run_info(symbol: &str, data_dir: &Path) -> ExitCode {
    let adapter = CsvAdapter::new(data_dir.to_path_buf());
    let symbol = symbol.trim().to_uppercase();

    match adapter.get_data_range(&symbol) {
        Ok(Some((min_date, max_date, count))) => {
            println!("{}: {} rows, {} to {}", symbol, count, min_date, max_date);
            ExitCode::SUCCESS
        }
        Ok(None) => {
            warn!(symbol = %symbol, "no data found");
            ExitCode::SUCCESS
        }
        Err(e) => fail(&e),
    }
}
