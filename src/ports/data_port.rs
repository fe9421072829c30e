//! Data provider port trait.
//!
//! Lookups are best-effort: a failure for a single ticker must not abort a
//! batch — callers wrap per-ticker calls in a skip fold (see
//! [`crate::domain::universe`]).

use crate::domain::error::QuantrebalError;
use crate::domain::factors::FactorMatrix;
use crate::domain::market::{PrevClose, SecurityInfo, Snapshot};
use chrono::NaiveDate;

pub trait DataPort {
    /// Factor values for the given tickers on `date`, in the given ticker
    /// order. Tickers with no data are omitted, not errors.
    fn fetch_factors(
        &self,
        tickers: &[String],
        factors: &[String],
        date: NaiveDate,
    ) -> Result<FactorMatrix, QuantrebalError>;

    fn fetch_index_members(
        &self,
        index: &str,
        date: NaiveDate,
    ) -> Result<Vec<String>, QuantrebalError>;

    /// Daily traded volumes for the most recent `days` sessions, oldest first.
    fn fetch_volume_history(&self, ticker: &str, days: usize)
        -> Result<Vec<f64>, QuantrebalError>;

    fn fetch_security_info(&self, ticker: &str) -> Result<SecurityInfo, QuantrebalError>;

    fn fetch_snapshot(&self, ticker: &str) -> Result<Snapshot, QuantrebalError>;

    fn fetch_previous_close(&self, ticker: &str) -> Result<PrevClose, QuantrebalError>;

    /// Aggregate market turnover for the most recent `count` sessions,
    /// oldest first.
    fn fetch_turnover_series(&self, count: usize) -> Result<Vec<f64>, QuantrebalError>;

    /// Sector index levels for the most recent `count` sessions, oldest first.
    fn fetch_sector_levels(&self, count: usize) -> Result<Vec<f64>, QuantrebalError>;
}
