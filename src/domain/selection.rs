//! Top-k selection and equal-weight target allocation.

use super::error::QuantrebalError;
use super::ranking::RankedScore;

/// One slot in the target portfolio.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetEntry {
    pub ticker: String,
    pub target_value: f64,
}

/// Select the `k` tickers with the highest composite score and allocate
/// `total_value / k` to each.
///
/// Ties are broken by input order (the earlier-listed ticker wins). If
/// fewer than `k` candidates exist, all are selected — but each slot is
/// still sized by the configured `k`, not by the selected count, so a
/// short selection leaves part of the capital undeployed.
pub fn select(
    scores: &[RankedScore],
    k: usize,
    total_value: f64,
) -> Result<Vec<TargetEntry>, QuantrebalError> {
    if scores.is_empty() || k == 0 {
        return Err(QuantrebalError::EmptySelection);
    }

    let mut order: Vec<usize> = (0..scores.len()).collect();
    // Descending by score; stable, so equal scores keep input order.
    order.sort_by(|&a, &b| scores[b].score.total_cmp(&scores[a].score));

    let slot_value = total_value / k as f64;
    let selected = order
        .into_iter()
        .take(k)
        .map(|i| TargetEntry {
            ticker: scores[i].ticker.clone(),
            target_value: slot_value,
        })
        .collect();

    Ok(selected)
}
