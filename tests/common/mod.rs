#![allow(dead_code)]

use chrono::NaiveDate;
use quantrebal::domain::error::QuantrebalError;
use quantrebal::domain::factors::FactorMatrix;
pub use quantrebal::domain::market::{Holding, PrevClose, SecurityInfo, Snapshot};
use quantrebal::ports::data_port::DataPort;
use std::collections::{HashMap, HashSet};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// In-memory data provider. Tickers added via [`with_clean_ticker`] pass
/// every universe filter; individual datasets can then be overridden, and
/// [`with_failing_ticker`] makes every lookup for that ticker fail.
///
/// [`with_clean_ticker`]: MockDataPort::with_clean_ticker
/// [`with_failing_ticker`]: MockDataPort::with_failing_ticker
pub struct MockDataPort {
    pub factor_names: Vec<String>,
    pub factor_rows: HashMap<String, Vec<Option<f64>>>,
    pub index_members: HashMap<String, Vec<String>>,
    pub volumes: HashMap<String, Vec<f64>>,
    pub securities: HashMap<String, SecurityInfo>,
    pub snapshots: HashMap<String, Snapshot>,
    pub prev_closes: HashMap<String, PrevClose>,
    pub turnover: Vec<f64>,
    pub sector: Vec<f64>,
    pub failing: HashSet<String>,
}

impl MockDataPort {
    pub fn new(factor_names: &[&str]) -> Self {
        Self {
            factor_names: factor_names.iter().map(|s| s.to_string()).collect(),
            factor_rows: HashMap::new(),
            index_members: HashMap::new(),
            volumes: HashMap::new(),
            securities: HashMap::new(),
            snapshots: HashMap::new(),
            prev_closes: HashMap::new(),
            turnover: Vec::new(),
            sector: Vec::new(),
            failing: HashSet::new(),
        }
    }

    /// A ticker with factor data, no suspensions, no ST flag, an old
    /// listing, and a mid-band price.
    pub fn with_clean_ticker(mut self, ticker: &str, factor_values: &[Option<f64>]) -> Self {
        self.factor_rows
            .insert(ticker.to_string(), factor_values.to_vec());
        self.volumes.insert(ticker.to_string(), vec![1000.0; 63]);
        self.securities.insert(
            ticker.to_string(),
            SecurityInfo {
                listing_date: date(2015, 1, 1),
                is_st: false,
            },
        );
        self.snapshots.insert(
            ticker.to_string(),
            Snapshot {
                last_price: 10.0,
                limit_up: 11.0,
                limit_down: 9.0,
            },
        );
        self.prev_closes.insert(
            ticker.to_string(),
            PrevClose {
                close: 10.0,
                limit_up: 11.0,
            },
        );
        self
    }

    pub fn with_failing_ticker(mut self, ticker: &str) -> Self {
        self.failing.insert(ticker.to_string());
        self
    }

    pub fn with_index(mut self, index: &str, members: &[&str]) -> Self {
        self.index_members.insert(
            index.to_string(),
            members.iter().map(|s| s.to_string()).collect(),
        );
        self
    }

    pub fn with_volumes(mut self, ticker: &str, volumes: Vec<f64>) -> Self {
        self.volumes.insert(ticker.to_string(), volumes);
        self
    }

    pub fn with_security(mut self, ticker: &str, info: SecurityInfo) -> Self {
        self.securities.insert(ticker.to_string(), info);
        self
    }

    pub fn with_snapshot(mut self, ticker: &str, snapshot: Snapshot) -> Self {
        self.snapshots.insert(ticker.to_string(), snapshot);
        self
    }

    pub fn with_prev_close(mut self, ticker: &str, prev: PrevClose) -> Self {
        self.prev_closes.insert(ticker.to_string(), prev);
        self
    }

    pub fn with_turnover(mut self, series: Vec<f64>) -> Self {
        self.turnover = series;
        self
    }

    pub fn with_sector(mut self, series: Vec<f64>) -> Self {
        self.sector = series;
        self
    }

    fn fail_if_poisoned(&self, ticker: &str) -> Result<(), QuantrebalError> {
        if self.failing.contains(ticker) {
            return Err(QuantrebalError::Data {
                reason: format!("lookup failed for {}", ticker),
            });
        }
        Ok(())
    }
}

impl DataPort for MockDataPort {
    fn fetch_factors(
        &self,
        tickers: &[String],
        factors: &[String],
        _date: NaiveDate,
    ) -> Result<FactorMatrix, QuantrebalError> {
        assert_eq!(factors, self.factor_names.as_slice());
        let mut matrix = FactorMatrix::new(factors.to_vec());
        for ticker in tickers {
            if let Some(values) = self.factor_rows.get(ticker) {
                matrix.push_row(ticker, values.clone())?;
            }
        }
        Ok(matrix)
    }

    fn fetch_index_members(
        &self,
        index: &str,
        _date: NaiveDate,
    ) -> Result<Vec<String>, QuantrebalError> {
        self.index_members
            .get(index)
            .cloned()
            .ok_or_else(|| QuantrebalError::Data {
                reason: format!("no members for index {}", index),
            })
    }

    fn fetch_volume_history(
        &self,
        ticker: &str,
        days: usize,
    ) -> Result<Vec<f64>, QuantrebalError> {
        self.fail_if_poisoned(ticker)?;
        let volumes = self
            .volumes
            .get(ticker)
            .ok_or_else(|| QuantrebalError::Data {
                reason: format!("no volume history for {}", ticker),
            })?;
        let skip = volumes.len().saturating_sub(days);
        Ok(volumes[skip..].to_vec())
    }

    fn fetch_security_info(&self, ticker: &str) -> Result<SecurityInfo, QuantrebalError> {
        self.fail_if_poisoned(ticker)?;
        self.securities
            .get(ticker)
            .cloned()
            .ok_or_else(|| QuantrebalError::Data {
                reason: format!("no security info for {}", ticker),
            })
    }

    fn fetch_snapshot(&self, ticker: &str) -> Result<Snapshot, QuantrebalError> {
        self.fail_if_poisoned(ticker)?;
        self.snapshots
            .get(ticker)
            .cloned()
            .ok_or_else(|| QuantrebalError::Data {
                reason: format!("no snapshot for {}", ticker),
            })
    }

    fn fetch_previous_close(&self, ticker: &str) -> Result<PrevClose, QuantrebalError> {
        self.fail_if_poisoned(ticker)?;
        self.prev_closes
            .get(ticker)
            .cloned()
            .ok_or_else(|| QuantrebalError::Data {
                reason: format!("no previous close for {}", ticker),
            })
    }

    fn fetch_turnover_series(&self, count: usize) -> Result<Vec<f64>, QuantrebalError> {
        if self.turnover.is_empty() {
            return Err(QuantrebalError::Data {
                reason: "no turnover series".to_string(),
            });
        }
        let skip = self.turnover.len().saturating_sub(count);
        Ok(self.turnover[skip..].to_vec())
    }

    fn fetch_sector_levels(&self, count: usize) -> Result<Vec<f64>, QuantrebalError> {
        if self.sector.is_empty() {
            return Err(QuantrebalError::Data {
                reason: "no sector series".to_string(),
            });
        }
        let skip = self.sector.len().saturating_sub(count);
        Ok(self.sector[skip..].to_vec())
    }
}
