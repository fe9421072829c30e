//! Property tests for the ranking, selection, and planning invariants.

use proptest::prelude::*;
use quantrebal::domain::factors::{FactorDirection, FactorMatrix};
use quantrebal::domain::ranking;
use quantrebal::domain::rebalance::{plan, TradeInstruction};
use quantrebal::domain::market::Holding;
use quantrebal::domain::selection::{select, TargetEntry};
use std::collections::HashSet;

fn direction_strategy() -> impl Strategy<Value = FactorDirection> {
    prop_oneof![
        Just(FactorDirection::HigherIsBetter),
        Just(FactorDirection::LowerIsBetter),
    ]
}

/// A non-empty factor matrix with matching directions. Roughly a third of
/// cells are missing so imputation is always in play.
fn matrix_strategy() -> impl Strategy<Value = (FactorMatrix, Vec<FactorDirection>)> {
    (1usize..4, 1usize..16).prop_flat_map(|(factors, tickers)| {
        let cell = prop_oneof![
            2 => (-1e6f64..1e6).prop_map(Some),
            1 => Just(None::<f64>),
        ];
        let row = prop::collection::vec(cell, factors);
        let rows = prop::collection::vec(row, tickers);
        let directions = prop::collection::vec(direction_strategy(), factors);
        (rows, directions).prop_map(move |(rows, directions)| {
            let names = (0..factors).map(|i| format!("f{}", i)).collect();
            let mut matrix = FactorMatrix::new(names);
            for (i, values) in rows.into_iter().enumerate() {
                matrix
                    .push_row(&format!("60000{}.SS", i), values)
                    .expect("row width matches factor count");
            }
            (matrix, directions)
        })
    })
}

proptest! {
    #[test]
    fn rank_scores_every_ticker_once((matrix, directions) in matrix_strategy()) {
        let scores = ranking::rank(&matrix, &directions).unwrap();
        prop_assert_eq!(scores.len(), matrix.ticker_count());
        let tickers: Vec<&str> = scores.iter().map(|s| s.ticker.as_str()).collect();
        let expected: Vec<&str> = matrix.tickers.iter().map(|t| t.as_str()).collect();
        prop_assert_eq!(tickers, expected);
    }

    #[test]
    fn rank_is_deterministic((matrix, directions) in matrix_strategy()) {
        let first = ranking::rank(&matrix, &directions).unwrap();
        let second = ranking::rank(&matrix, &directions).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn rank_scores_are_bounded_by_rank_sum((matrix, directions) in matrix_strategy()) {
        // Each factor contributes a rank in 1..=N with sign +-1.
        let n = matrix.ticker_count() as f64;
        let bound = n * matrix.factor_count() as f64;
        let scores = ranking::rank(&matrix, &directions).unwrap();
        for score in scores {
            prop_assert!(score.score.abs() <= bound);
        }
    }

    #[test]
    fn select_allocates_total_over_configured_slots(
        (matrix, directions) in matrix_strategy(),
        k in 1usize..8,
        total in 1.0f64..1e7,
    ) {
        let scores = ranking::rank(&matrix, &directions).unwrap();
        let target = select(&scores, k, total).unwrap();
        prop_assert!(target.len() <= k);
        prop_assert!(target.len() <= scores.len());
        let slot = total / k as f64;
        for entry in &target {
            prop_assert!((entry.target_value - slot).abs() < 1e-9);
        }
    }

    #[test]
    fn select_takes_the_top_scores(
        (matrix, directions) in matrix_strategy(),
        k in 1usize..8,
    ) {
        let scores = ranking::rank(&matrix, &directions).unwrap();
        let target = select(&scores, k, 100_000.0).unwrap();

        let chosen: HashSet<&str> = target.iter().map(|e| e.ticker.as_str()).collect();
        let worst_chosen = scores
            .iter()
            .filter(|s| chosen.contains(s.ticker.as_str()))
            .map(|s| s.score)
            .fold(f64::INFINITY, f64::min);
        for score in scores.iter().filter(|s| !chosen.contains(s.ticker.as_str())) {
            prop_assert!(score.score <= worst_chosen);
        }
    }

    #[test]
    fn plan_puts_every_sell_before_every_buy(
        held in prop::collection::hash_set(0usize..12, 0..8),
        wanted in prop::collection::hash_set(0usize..12, 0..8),
        shielded in prop::collection::hash_set(0usize..12, 0..4),
    ) {
        let holdings: Vec<Holding> = held
            .iter()
            .map(|i| Holding {
                ticker: format!("60000{}.SS", i),
                market_value: 10_000.0,
            })
            .collect();
        let target: Vec<TargetEntry> = wanted
            .iter()
            .map(|i| TargetEntry {
                ticker: format!("60000{}.SS", i),
                target_value: 10_000.0,
            })
            .collect();
        let protected: HashSet<String> =
            shielded.iter().map(|i| format!("60000{}.SS", i)).collect();

        let instructions = plan(&holdings, &target, &protected);

        let first_buy = instructions
            .iter()
            .position(|i| matches!(i, TradeInstruction::Buy { .. }));
        if let Some(first_buy) = first_buy {
            for instruction in &instructions[first_buy..] {
                prop_assert!(
                    matches!(instruction, TradeInstruction::Buy { .. }),
                    "expected only buys after the first buy"
                );
            }
        }

        let target_set: HashSet<&str> = target.iter().map(|e| e.ticker.as_str()).collect();
        let held_set: HashSet<&str> = holdings.iter().map(|h| h.ticker.as_str()).collect();
        for instruction in &instructions {
            match instruction {
                TradeInstruction::Sell { ticker } => {
                    prop_assert!(held_set.contains(ticker.as_str()));
                    prop_assert!(!target_set.contains(ticker.as_str()));
                    prop_assert!(!protected.contains(ticker));
                }
                TradeInstruction::Buy { ticker, .. } => {
                    prop_assert!(target_set.contains(ticker.as_str()));
                    prop_assert!(!held_set.contains(ticker.as_str()));
                }
            }
        }
    }
}
