//! Configuration validation.
//!
//! Validates all config fields before a cycle runs, so data and broker
//! collaborators are never touched with a broken configuration.

use super::error::QuantrebalError;
use super::factors::parse_directions;
use crate::ports::config_port::ConfigPort;

pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<(), QuantrebalError> {
    validate_factors(config)?;
    validate_directions(config)?;
    validate_portfolio_size(config)?;
    validate_universe_source(config)?;
    validate_lookback(config)?;
    Ok(())
}

pub fn validate_regime_config(config: &dyn ConfigPort) -> Result<(), QuantrebalError> {
    validate_windows(config)?;
    validate_thresholds(config)?;
    Ok(())
}

pub fn validate_portfolio_config(config: &dyn ConfigPort) -> Result<(), QuantrebalError> {
    let cash = config.get_double("portfolio", "cash", 0.0);
    if cash < 0.0 {
        return Err(QuantrebalError::ConfigInvalid {
            section: "portfolio".to_string(),
            key: "cash".to_string(),
            reason: "cash must be non-negative".to_string(),
        });
    }
    Ok(())
}

fn validate_factors(config: &dyn ConfigPort) -> Result<(), QuantrebalError> {
    match config.get_string("strategy", "factors") {
        None => Err(QuantrebalError::ConfigMissing {
            section: "strategy".to_string(),
            key: "factors".to_string(),
        }),
        Some(s) if s.split(',').any(|t| t.trim().is_empty()) => {
            Err(QuantrebalError::ConfigInvalid {
                section: "strategy".to_string(),
                key: "factors".to_string(),
                reason: "factor list contains an empty name".to_string(),
            })
        }
        Some(_) => Ok(()),
    }
}

fn validate_directions(config: &dyn ConfigPort) -> Result<(), QuantrebalError> {
    let factors = config
        .get_string("strategy", "factors")
        .unwrap_or_default();
    let directions_str =
        config
            .get_string("strategy", "directions")
            .ok_or_else(|| QuantrebalError::ConfigMissing {
                section: "strategy".to_string(),
                key: "directions".to_string(),
            })?;

    let directions = parse_directions(&directions_str)?;
    let factor_count = factors.split(',').count();
    if directions.len() != factor_count {
        return Err(QuantrebalError::ConfigInvalid {
            section: "strategy".to_string(),
            key: "directions".to_string(),
            reason: format!(
                "{} directions for {} factors",
                directions.len(),
                factor_count
            ),
        });
    }
    Ok(())
}

fn validate_portfolio_size(config: &dyn ConfigPort) -> Result<(), QuantrebalError> {
    let size = config.get_int("strategy", "portfolio_size", 0);
    if size < 1 {
        return Err(QuantrebalError::ConfigInvalid {
            section: "strategy".to_string(),
            key: "portfolio_size".to_string(),
            reason: "portfolio_size must be at least 1".to_string(),
        });
    }
    Ok(())
}

fn validate_universe_source(config: &dyn ConfigPort) -> Result<(), QuantrebalError> {
    let index = config.get_string("strategy", "index");
    let tickers = config.get_string("strategy", "tickers");
    match (index, tickers) {
        (None, None) => Err(QuantrebalError::ConfigMissing {
            section: "strategy".to_string(),
            key: "index".to_string(),
        }),
        (Some(i), _) if i.trim().is_empty() => Err(QuantrebalError::ConfigInvalid {
            section: "strategy".to_string(),
            key: "index".to_string(),
            reason: "index must not be empty".to_string(),
        }),
        _ => Ok(()),
    }
}

fn validate_lookback(config: &dyn ConfigPort) -> Result<(), QuantrebalError> {
    let lookback = config.get_int("strategy", "lookback_days", 63);
    if lookback < 1 {
        return Err(QuantrebalError::ConfigInvalid {
            section: "strategy".to_string(),
            key: "lookback_days".to_string(),
            reason: "lookback_days must be at least 1".to_string(),
        });
    }
    let min_listed = config.get_int("strategy", "min_listed_days", 375);
    if min_listed < 0 {
        return Err(QuantrebalError::ConfigInvalid {
            section: "strategy".to_string(),
            key: "min_listed_days".to_string(),
            reason: "min_listed_days must be non-negative".to_string(),
        });
    }
    Ok(())
}

fn validate_windows(config: &dyn ConfigPort) -> Result<(), QuantrebalError> {
    let trend = config.get_int("regime", "trend_window", 20);
    if trend < 1 {
        return Err(QuantrebalError::ConfigInvalid {
            section: "regime".to_string(),
            key: "trend_window".to_string(),
            reason: "trend_window must be at least 1".to_string(),
        });
    }
    let slope = config.get_int("regime", "slope_window", 5);
    if slope < 1 {
        return Err(QuantrebalError::ConfigInvalid {
            section: "regime".to_string(),
            key: "slope_window".to_string(),
            reason: "slope_window must be at least 1".to_string(),
        });
    }
    Ok(())
}

fn validate_thresholds(config: &dyn ConfigPort) -> Result<(), QuantrebalError> {
    let sector = config.get_double("regime", "sector_return_threshold", 0.9);
    if sector <= 0.0 {
        return Err(QuantrebalError::ConfigInvalid {
            section: "regime".to_string(),
            key: "sector_return_threshold".to_string(),
            reason: "sector_return_threshold must be positive".to_string(),
        });
    }
    Ok(())
}
