//! Factor ranking engine: per-column ranks folded into a composite score.

use super::error::QuantrebalError;
use super::factors::{FactorDirection, FactorMatrix};

/// Composite score for one ticker. Higher is better downstream.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedScore {
    pub ticker: String,
    pub score: f64,
}

/// Rank every ticker in `matrix` and combine per-factor ranks into one
/// composite score per ticker.
///
/// Per column, rank 1 goes to the smallest value and N to the largest;
/// equal values keep their original row order (stable sort), so the
/// first-seen ticker takes the lower rank. The composite score is
/// `sum over factors of sign * rank`, where sign is +1 for
/// `HigherIsBetter` and -1 for `LowerIsBetter`. The selector treats the
/// highest composite score as the best candidate.
///
/// Missing cells are imputed per [`FactorMatrix::impute_column_means`]
/// before ranking, so every ticker receives a rank in every column.
///
/// Pure function: identical inputs yield identical output.
pub fn rank(
    matrix: &FactorMatrix,
    directions: &[FactorDirection],
) -> Result<Vec<RankedScore>, QuantrebalError> {
    if matrix.is_empty() {
        return Err(QuantrebalError::EmptyUniverse);
    }
    if directions.len() != matrix.factor_count() {
        return Err(QuantrebalError::FactorCountMismatch {
            factors: matrix.factor_count(),
            directions: directions.len(),
        });
    }

    let filled = matrix.impute_column_means();
    let n = matrix.ticker_count();
    let mut scores = vec![0.0_f64; n];

    for (col, direction) in directions.iter().enumerate() {
        let mut order: Vec<usize> = (0..n).collect();
        // Stable: ties keep original row order, first-seen gets the lower rank.
        order.sort_by(|&a, &b| filled[a][col].total_cmp(&filled[b][col]));

        for (position, &row) in order.iter().enumerate() {
            let rank = (position + 1) as f64;
            scores[row] += direction.sign() * rank;
        }
    }

    Ok(matrix
        .tickers
        .iter()
        .zip(scores)
        .map(|(ticker, score)| RankedScore {
            ticker: ticker.clone(),
            score,
        })
        .collect())
}
