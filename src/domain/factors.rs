//! Factor matrix and per-factor ranking direction.

use super::error::QuantrebalError;

/// Ranking direction for one factor.
///
/// `HigherIsBetter` corresponds to a +1 weight in the strategy config
/// (a larger raw value earns a better composite score), `LowerIsBetter`
/// to -1 (a smaller raw value earns a better composite score).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FactorDirection {
    HigherIsBetter,
    LowerIsBetter,
}

impl FactorDirection {
    pub fn from_weight(weight: i64) -> Option<Self> {
        match weight {
            1 => Some(FactorDirection::HigherIsBetter),
            -1 => Some(FactorDirection::LowerIsBetter),
            _ => None,
        }
    }

    /// Sign applied to this factor's rank in the composite score.
    pub fn sign(self) -> f64 {
        match self {
            FactorDirection::HigherIsBetter => 1.0,
            FactorDirection::LowerIsBetter => -1.0,
        }
    }
}

/// Parse a comma-separated list of +1/-1 weights into directions.
pub fn parse_directions(input: &str) -> Result<Vec<FactorDirection>, QuantrebalError> {
    let mut directions = Vec::new();
    for token in input.split(',') {
        let trimmed = token.trim();
        let weight: i64 = trimmed.parse().map_err(|_| QuantrebalError::ConfigInvalid {
            section: "strategy".to_string(),
            key: "directions".to_string(),
            reason: format!("expected +1 or -1, got '{}'", trimmed),
        })?;
        let direction =
            FactorDirection::from_weight(weight).ok_or_else(|| QuantrebalError::ConfigInvalid {
                section: "strategy".to_string(),
                key: "directions".to_string(),
                reason: format!("expected +1 or -1, got '{}'", trimmed),
            })?;
        directions.push(direction);
    }
    Ok(directions)
}

/// Raw per-ticker factor values. One row per ticker; a `None` cell is a
/// missing value, imputed before ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct FactorMatrix {
    pub factor_names: Vec<String>,
    pub tickers: Vec<String>,
    rows: Vec<Vec<Option<f64>>>,
}

impl FactorMatrix {
    pub fn new(factor_names: Vec<String>) -> Self {
        FactorMatrix {
            factor_names,
            tickers: Vec::new(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(
        &mut self,
        ticker: &str,
        values: Vec<Option<f64>>,
    ) -> Result<(), QuantrebalError> {
        if values.len() != self.factor_names.len() {
            return Err(QuantrebalError::FactorCountMismatch {
                factors: self.factor_names.len(),
                directions: values.len(),
            });
        }
        self.tickers.push(ticker.to_string());
        self.rows.push(values);
        Ok(())
    }

    pub fn ticker_count(&self) -> usize {
        self.tickers.len()
    }

    pub fn factor_count(&self) -> usize {
        self.factor_names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickers.is_empty()
    }

    /// Resolve missing cells: each column independently takes the arithmetic
    /// mean of its present cells; a column with no present cells imputes 0.0.
    /// The result contains no missing values.
    pub fn impute_column_means(&self) -> Vec<Vec<f64>> {
        let rows = self.rows.len();
        let columns = self.factor_names.len();
        let mut filled = vec![vec![0.0; columns]; rows];

        for col in 0..columns {
            let mut sum = 0.0;
            let mut count = 0usize;
            for row in &self.rows {
                if let Some(value) = row[col] {
                    sum += value;
                    count += 1;
                }
            }
            let mean = if count > 0 { sum / count as f64 } else { 0.0 };

            for (i, row) in self.rows.iter().enumerate() {
                filled[i][col] = row[col].unwrap_or(mean);
            }
        }

        filled
    }
}
