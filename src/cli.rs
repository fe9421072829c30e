//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_data_adapter::CsvDataAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::paper_broker::PaperBroker;
use crate::domain::config_validation::{
    validate_portfolio_config, validate_regime_config, validate_strategy_config,
};
use crate::domain::cycle::{run_cycle, CycleInput, CycleOutcome};
use crate::domain::error::QuantrebalError;
use crate::domain::factors::{parse_directions, FactorDirection};
use crate::domain::ranking;
use crate::domain::regime::{classify, RegimeConfig, RegimeLabel};
use crate::domain::universe::{
    feasible_universe, parse_tickers, protected_holdings, UniverseFilterConfig,
};
use crate::ports::broker_port::BrokerPort;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;

#[derive(Parser, Debug)]
#[command(name = "quantrebal", about = "Multi-factor ranking and rebalancing engine")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one rebalance cycle
    Rebalance {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        data: PathBuf,
        #[arg(long)]
        date: String,
        /// Print the plan without applying it to the paper broker
        #[arg(long)]
        dry_run: bool,
    },
    /// Print the ranked score table for a date
    Rank {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        data: PathBuf,
        #[arg(long)]
        date: String,
    },
    /// Classify the current market regime
    Regime {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        data: PathBuf,
    },
    /// Validate a strategy configuration
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Rebalance {
            config,
            data,
            date,
            dry_run,
        } => run_rebalance(&config, &data, &date, dry_run),
        Command::Rank { config, data, date } => run_rank(&config, &data, &date),
        Command::Regime { config, data } => run_regime(&config, &data),
        Command::Validate { config } => run_validate(&config),
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = QuantrebalError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// Strategy parameters assembled from `[strategy]`.
#[derive(Debug, Clone)]
pub struct StrategyParams {
    pub factors: Vec<String>,
    pub directions: Vec<FactorDirection>,
    pub portfolio_size: usize,
    pub index: Option<String>,
    pub tickers: Option<Vec<String>>,
    pub filter: UniverseFilterConfig,
}

pub fn build_strategy_params(
    config: &dyn ConfigPort,
) -> Result<StrategyParams, QuantrebalError> {
    let factors_str =
        config
            .get_string("strategy", "factors")
            .ok_or_else(|| QuantrebalError::ConfigMissing {
                section: "strategy".into(),
                key: "factors".into(),
            })?;
    let factors: Vec<String> = factors_str
        .split(',')
        .map(|t| t.trim().to_string())
        .collect();

    let directions_str =
        config
            .get_string("strategy", "directions")
            .ok_or_else(|| QuantrebalError::ConfigMissing {
                section: "strategy".into(),
                key: "directions".into(),
            })?;
    let directions = parse_directions(&directions_str)?;

    let portfolio_size = config.get_int("strategy", "portfolio_size", 0);
    if portfolio_size < 1 {
        return Err(QuantrebalError::ConfigInvalid {
            section: "strategy".into(),
            key: "portfolio_size".into(),
            reason: "portfolio_size must be at least 1".into(),
        });
    }

    let tickers = match config.get_string("strategy", "tickers") {
        Some(list) => Some(parse_tickers(&list)?),
        None => None,
    };

    let excluded_prefixes = config
        .get_string("strategy", "excluded_prefixes")
        .map(|s| {
            s.split(',')
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect()
        })
        .unwrap_or_default();

    Ok(StrategyParams {
        factors,
        directions,
        portfolio_size: portfolio_size as usize,
        index: config.get_string("strategy", "index"),
        tickers,
        filter: UniverseFilterConfig {
            lookback_days: config.get_int("strategy", "lookback_days", 63) as usize,
            min_listed_days: config.get_int("strategy", "min_listed_days", 375),
            excluded_prefixes,
        },
    })
}

pub fn build_regime_config(config: &dyn ConfigPort) -> RegimeConfig {
    RegimeConfig {
        trend_window: config.get_int("regime", "trend_window", 20) as usize,
        slope_window: config.get_int("regime", "slope_window", 5) as usize,
        turnover_growth_threshold: config.get_double("regime", "turnover_growth_threshold", 0.1),
        sector_return_threshold: config.get_double("regime", "sector_return_threshold", 0.9),
    }
}

fn parse_cycle_date(input: &str) -> Result<NaiveDate, ExitCode> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d").map_err(|_| {
        eprintln!("error: invalid date '{input}' (expected YYYY-MM-DD)");
        ExitCode::from(2)
    })
}

fn validate_all(config: &dyn ConfigPort) -> Result<(), QuantrebalError> {
    validate_strategy_config(config)?;
    validate_regime_config(config)?;
    validate_portfolio_config(config)?;
    Ok(())
}

/// Resolve the raw candidate list: index membership when configured,
/// otherwise the explicit ticker list.
fn resolve_universe(
    params: &StrategyParams,
    data: &dyn DataPort,
    date: NaiveDate,
) -> Result<Vec<String>, QuantrebalError> {
    if let Some(index) = &params.index {
        return data.fetch_index_members(index, date);
    }
    params
        .tickers
        .clone()
        .ok_or(QuantrebalError::EmptyUniverse)
}

/// Classify the regime from provider series; any failure degrades to
/// `Unknown` rather than blocking the cycle.
fn classify_regime(config: &dyn ConfigPort, data: &dyn DataPort) -> RegimeLabel {
    if !config.get_bool("regime", "enabled", false) {
        return RegimeLabel::Unknown;
    }
    let regime_config = build_regime_config(config);
    let turnover_count = regime_config.trend_window + regime_config.slope_window;

    let turnover = match data.fetch_turnover_series(turnover_count) {
        Ok(series) => series,
        Err(e) => {
            eprintln!("warning: turnover series unavailable ({e}); regime unknown");
            return RegimeLabel::Unknown;
        }
    };
    let sector = match data.fetch_sector_levels(regime_config.trend_window) {
        Ok(series) => series,
        Err(e) => {
            eprintln!("warning: sector series unavailable ({e}); regime unknown");
            return RegimeLabel::Unknown;
        }
    };

    classify(&turnover, &sector, &regime_config)
}

fn run_rebalance(config_path: &Path, data_path: &Path, date_str: &str, dry_run: bool) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    if let Err(e) = validate_all(&config) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    let date = match parse_cycle_date(date_str) {
        Ok(d) => d,
        Err(code) => return code,
    };
    let params = match build_strategy_params(&config) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let data = CsvDataAdapter::new(data_path.to_path_buf());

    let cash = config.get_double("portfolio", "cash", 0.0);
    let mut broker =
        match PaperBroker::from_holdings_file(cash, &data_path.join("holdings.csv")) {
            Ok(b) => b,
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        };
    let holdings = match broker.holdings() {
        Ok(h) => h,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let total_value = match broker.total_value() {
        Ok(v) => v,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let candidates = match resolve_universe(&params, &data, date) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let universe = feasible_universe(&data, &candidates, date, &params.filter);
    for skipped in &universe.skipped {
        eprintln!(
            "warning: skipping {} ({:?})",
            skipped.ticker, skipped.reason
        );
    }
    eprintln!(
        "Universe: {} of {} candidates feasible",
        universe.tickers.len(),
        candidates.len()
    );

    let held_tickers: Vec<String> = holdings.iter().map(|h| h.ticker.clone()).collect();
    let protected = protected_holdings(&data, &held_tickers);

    let regime = classify_regime(&config, &data);
    eprintln!("Regime: {regime}");

    let matrix = match data.fetch_factors(&universe.tickers, &params.factors, date) {
        Ok(m) => m,
        Err(e) => {
            // Data unavailability skips the cycle; it is not fatal.
            eprintln!("warning: factor data unavailable ({e}); cycle skipped");
            return ExitCode::SUCCESS;
        }
    };

    let input = CycleInput {
        matrix,
        directions: params.directions.clone(),
        holdings,
        protected,
        total_value,
        portfolio_size: params.portfolio_size,
        regime,
    };

    match run_cycle(&input) {
        CycleOutcome::Skipped(cause) => {
            eprintln!("cycle skipped: {cause}");
            ExitCode::SUCCESS
        }
        CycleOutcome::Planned(instructions) => {
            if instructions.is_empty() {
                println!("No rebalancing required.");
                return ExitCode::SUCCESS;
            }
            for instruction in &instructions {
                println!("{instruction}");
            }
            if dry_run {
                return ExitCode::SUCCESS;
            }
            for instruction in &instructions {
                if let Err(e) = broker.submit(instruction) {
                    eprintln!("error: {e}");
                    return (&e).into();
                }
            }
            println!("-- after rebalance --");
            match broker.holdings() {
                Ok(holdings) => {
                    for holding in holdings {
                        println!("{}  {:.2}", holding.ticker, holding.market_value);
                    }
                }
                Err(e) => {
                    eprintln!("error: {e}");
                    return (&e).into();
                }
            }
            println!("cash  {:.2}", broker.cash());
            ExitCode::SUCCESS
        }
    }
}

fn run_rank(config_path: &Path, data_path: &Path, date_str: &str) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    if let Err(e) = validate_strategy_config(&config) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    let date = match parse_cycle_date(date_str) {
        Ok(d) => d,
        Err(code) => return code,
    };
    let params = match build_strategy_params(&config) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let data = CsvDataAdapter::new(data_path.to_path_buf());
    let candidates = match resolve_universe(&params, &data, date) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let universe = feasible_universe(&data, &candidates, date, &params.filter);

    let matrix = match data.fetch_factors(&universe.tickers, &params.factors, date) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let mut scores = match ranking::rank(&matrix, &params.directions) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    scores.sort_by(|a, b| b.score.total_cmp(&a.score));
    for score in scores {
        println!("{}  {:.1}", score.ticker, score.score);
    }
    ExitCode::SUCCESS
}

fn run_regime(config_path: &Path, data_path: &Path) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    if let Err(e) = validate_regime_config(&config) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let data = CsvDataAdapter::new(data_path.to_path_buf());
    let regime_config = build_regime_config(&config);
    let turnover_count = regime_config.trend_window + regime_config.slope_window;

    let turnover = match data.fetch_turnover_series(turnover_count) {
        Ok(series) => series,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let sector = match data.fetch_sector_levels(regime_config.trend_window) {
        Ok(series) => series,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    println!("{}", classify(&turnover, &sector, &regime_config));
    ExitCode::SUCCESS
}

fn run_validate(config_path: &Path) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    if let Err(e) = validate_all(&config) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    println!("Configuration OK");
    ExitCode::SUCCESS
}
