//! One rebalance cycle: ranking, selection and planning run to completion.
//!
//! All per-cycle state is threaded through [`CycleInput`] explicitly; the
//! engine holds nothing between cycles, so a skipped or failed cycle is
//! simply repeated at the next scheduled trigger.

use std::collections::HashSet;

use super::error::QuantrebalError;
use super::factors::{FactorDirection, FactorMatrix};
use super::market::Holding;
use super::ranking;
use super::rebalance::{self, TradeInstruction};
use super::regime::RegimeLabel;
use super::selection;

/// Immutable snapshot of everything one cycle needs.
#[derive(Debug, Clone)]
pub struct CycleInput {
    pub matrix: FactorMatrix,
    pub directions: Vec<FactorDirection>,
    pub holdings: Vec<Holding>,
    /// Tickers exempt from forced liquidation this cycle.
    pub protected: HashSet<String>,
    pub total_value: f64,
    /// Configured portfolio size k.
    pub portfolio_size: usize,
    pub regime: RegimeLabel,
}

/// Why a cycle produced no instructions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SkipCause {
    #[error("empty candidate universe")]
    EmptyUniverse,

    #[error("factor data unusable: {0}")]
    BadFactorData(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    Planned(Vec<TradeInstruction>),
    /// No orders this cycle; the caller logs and waits for the next trigger.
    Skipped(SkipCause),
}

/// Run one rebalance cycle.
///
/// A `Contracting` regime replaces the target with an empty selection, so
/// the plan liquidates every unprotected holding. `Unknown` does not veto.
/// Unusable factor data skips the cycle entirely — no orders at all.
pub fn run_cycle(input: &CycleInput) -> CycleOutcome {
    if input.regime.vetoes() {
        let instructions = rebalance::plan(&input.holdings, &[], &input.protected);
        return CycleOutcome::Planned(instructions);
    }

    if input.matrix.is_empty() {
        return CycleOutcome::Skipped(SkipCause::EmptyUniverse);
    }

    let scores = match ranking::rank(&input.matrix, &input.directions) {
        Ok(scores) => scores,
        Err(QuantrebalError::EmptyUniverse) => {
            return CycleOutcome::Skipped(SkipCause::EmptyUniverse);
        }
        Err(e) => return CycleOutcome::Skipped(SkipCause::BadFactorData(e.to_string())),
    };

    let target = match selection::select(&scores, input.portfolio_size, input.total_value) {
        Ok(target) => target,
        Err(e) => return CycleOutcome::Skipped(SkipCause::BadFactorData(e.to_string())),
    };

    CycleOutcome::Planned(rebalance::plan(&input.holdings, &target, &input.protected))
}
