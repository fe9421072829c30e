//! Rebalance planning: diff current holdings against the target selection.

use std::collections::HashSet;
use std::fmt;

use super::market::Holding;
use super::selection::TargetEntry;

/// An advisory order for the external execution collaborator.
#[derive(Debug, Clone, PartialEq)]
pub enum TradeInstruction {
    /// Close the position entirely.
    Sell { ticker: String },
    /// Bring the position to `target_value`.
    Buy { ticker: String, target_value: f64 },
}

impl TradeInstruction {
    pub fn ticker(&self) -> &str {
        match self {
            TradeInstruction::Sell { ticker } => ticker,
            TradeInstruction::Buy { ticker, .. } => ticker,
        }
    }
}

impl fmt::Display for TradeInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeInstruction::Sell { ticker } => write!(f, "SELL {}", ticker),
            TradeInstruction::Buy {
                ticker,
                target_value,
            } => write!(f, "BUY {} to {:.2}", ticker, target_value),
        }
    }
}

/// Produce the instruction list that moves `holdings` to `target`.
///
/// Sells come first (a held ticker absent from the target, unless it is in
/// `protected`), then buys (a target ticker not already held, at its
/// allocated value). Tickers in both sets are untouched. Holdings order and
/// target order are preserved within each phase, so the output is
/// deterministic for identical inputs.
pub fn plan(
    holdings: &[Holding],
    target: &[TargetEntry],
    protected: &HashSet<String>,
) -> Vec<TradeInstruction> {
    let target_tickers: HashSet<&str> = target.iter().map(|e| e.ticker.as_str()).collect();
    let held_tickers: HashSet<&str> = holdings.iter().map(|h| h.ticker.as_str()).collect();

    let mut instructions = Vec::new();

    for holding in holdings {
        if !target_tickers.contains(holding.ticker.as_str())
            && !protected.contains(&holding.ticker)
        {
            instructions.push(TradeInstruction::Sell {
                ticker: holding.ticker.clone(),
            });
        }
    }

    for entry in target {
        if !held_tickers.contains(entry.ticker.as_str()) {
            instructions.push(TradeInstruction::Buy {
                ticker: entry.ticker.clone(),
                target_value: entry.target_value,
            });
        }
    }

    instructions
}
