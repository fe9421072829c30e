//! Candidate universe: ticker list parsing and feasibility filtering.
//!
//! Every external lookup is wrapped so that a failure for one ticker skips
//! that ticker and records why, instead of aborting the batch.

use chrono::NaiveDate;
use std::collections::HashSet;

use crate::ports::data_port::DataPort;

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum TickerListError {
    #[error("empty token in ticker list")]
    EmptyToken,

    #[error("duplicate ticker: {0}")]
    DuplicateTicker(String),
}

/// Parse a comma-separated ticker list from configuration.
pub fn parse_tickers(input: &str) -> Result<Vec<String>, TickerListError> {
    let mut tickers = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(TickerListError::EmptyToken);
        }
        let ticker = trimmed.to_uppercase();
        if seen.contains(&ticker) {
            return Err(TickerListError::DuplicateTicker(ticker));
        }
        seen.insert(ticker.clone());
        tickers.push(ticker);
    }

    Ok(tickers)
}

#[derive(Debug, Clone)]
pub struct UniverseFilterConfig {
    /// Sessions of volume history inspected for suspensions.
    pub lookback_days: usize,
    /// Minimum days since listing; younger tickers are excluded.
    pub min_listed_days: i64,
    /// Ticker prefixes excluded outright (e.g. off-board listings).
    pub excluded_prefixes: Vec<String>,
}

impl Default for UniverseFilterConfig {
    fn default() -> Self {
        UniverseFilterConfig {
            lookback_days: 63,
            min_listed_days: 375,
            excluded_prefixes: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    ExcludedPrefix,
    LookupFailed(String),
    Suspended { zero_volume_days: usize },
    SpecialTreatment,
    RecentlyListed { listed_days: i64 },
    LimitLocked,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedTicker {
    pub ticker: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone)]
pub struct FeasibleUniverse {
    pub tickers: Vec<String>,
    pub skipped: Vec<SkippedTicker>,
}

/// Filter `tickers` down to the tradeable candidate universe for `date`.
///
/// Applied in order: prefix exclusion, ST status, listing age, suspension
/// (any zero-volume day in the lookback window), and limit-locked price.
/// A failed lookup skips only the ticker it was for.
pub fn feasible_universe(
    data: &dyn DataPort,
    tickers: &[String],
    date: NaiveDate,
    config: &UniverseFilterConfig,
) -> FeasibleUniverse {
    let mut feasible = Vec::new();
    let mut skipped: Vec<SkippedTicker> = Vec::new();

    for ticker in tickers {
        let skip = |reason: SkipReason| SkippedTicker {
            ticker: ticker.clone(),
            reason,
        };

        if config
            .excluded_prefixes
            .iter()
            .any(|prefix| ticker.starts_with(prefix.as_str()))
        {
            skipped.push(skip(SkipReason::ExcludedPrefix));
            continue;
        }

        let info = match data.fetch_security_info(ticker) {
            Ok(info) => info,
            Err(e) => {
                skipped.push(skip(SkipReason::LookupFailed(e.to_string())));
                continue;
            }
        };

        if info.is_st {
            skipped.push(skip(SkipReason::SpecialTreatment));
            continue;
        }

        let listed_days = (date - info.listing_date).num_days();
        if listed_days < config.min_listed_days {
            skipped.push(skip(SkipReason::RecentlyListed { listed_days }));
            continue;
        }

        let volumes = match data.fetch_volume_history(ticker, config.lookback_days) {
            Ok(volumes) => volumes,
            Err(e) => {
                skipped.push(skip(SkipReason::LookupFailed(e.to_string())));
                continue;
            }
        };

        let zero_volume_days = volumes.iter().filter(|&&v| v == 0.0).count();
        if zero_volume_days > 0 {
            skipped.push(skip(SkipReason::Suspended { zero_volume_days }));
            continue;
        }

        let snapshot = match data.fetch_snapshot(ticker) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                skipped.push(skip(SkipReason::LookupFailed(e.to_string())));
                continue;
            }
        };

        // A ticker pinned at either band cannot be entered at a sane price.
        if snapshot.is_limit_up() || snapshot.is_limit_down() {
            skipped.push(skip(SkipReason::LimitLocked));
            continue;
        }

        feasible.push(ticker.clone());
    }

    FeasibleUniverse {
        tickers: feasible,
        skipped,
    }
}

/// Held tickers that closed the previous session at limit-up. These are
/// exempt from forced liquidation for one cycle (the position may keep
/// running; it is re-examined next cycle).
pub fn protected_holdings(data: &dyn DataPort, held: &[String]) -> HashSet<String> {
    let mut protected = HashSet::new();
    for ticker in held {
        match data.fetch_previous_close(ticker) {
            Ok(prev) if prev.closed_limit_up() => {
                protected.insert(ticker.clone());
            }
            // A failed lookup just leaves the ticker unprotected.
            _ => {}
        }
    }
    protected
}
