//! CSV file data adapter.
//!
//! Serves a directory of CSV files as a [`DataPort`] for offline runs and
//! tests. One file per dataset:
//!
//! - `factors_YYYYMMDD.csv` — `ticker,<factor>,...`, empty cell = missing
//! - `index_<name>.csv` — `ticker`
//! - `volumes.csv` — `ticker,date,volume`
//! - `securities.csv` — `ticker,listing_date,is_st`
//! - `snapshots.csv` — `ticker,last_price,limit_up,limit_down`
//! - `prev_close.csv` — `ticker,close,limit_up`
//! - `turnover.csv` — `date,turnover`
//! - `sector.csv` — `date,close`

use crate::domain::error::QuantrebalError;
use crate::domain::factors::FactorMatrix;
use crate::domain::market::{PrevClose, SecurityInfo, Snapshot};
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

pub struct CsvDataAdapter {
    base_path: PathBuf,
}

impl CsvDataAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn read_file(&self, name: &str) -> Result<String, QuantrebalError> {
        let path = self.base_path.join(name);
        fs::read_to_string(&path).map_err(|e| QuantrebalError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })
    }

    fn parse_f64(field: &str, column: &str) -> Result<f64, QuantrebalError> {
        field.trim().parse().map_err(|e| QuantrebalError::Data {
            reason: format!("invalid {} value '{}': {}", column, field, e),
        })
    }

    fn parse_date(field: &str, column: &str) -> Result<NaiveDate, QuantrebalError> {
        NaiveDate::parse_from_str(field.trim(), "%Y-%m-%d").map_err(|e| QuantrebalError::Data {
            reason: format!("invalid {} value '{}': {}", column, field, e),
        })
    }

    fn field<'r>(
        record: &'r csv::StringRecord,
        index: usize,
        column: &str,
    ) -> Result<&'r str, QuantrebalError> {
        record.get(index).ok_or_else(|| QuantrebalError::Data {
            reason: format!("missing {} column", column),
        })
    }

    /// Read a two-column `date,value` series, sorted by date, last `count`
    /// values.
    fn read_series(&self, name: &str, count: usize) -> Result<Vec<f64>, QuantrebalError> {
        let content = self.read_file(name)?;
        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut points = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| QuantrebalError::Data {
                reason: format!("CSV parse error in {}: {}", name, e),
            })?;
            let date = Self::parse_date(Self::field(&record, 0, "date")?, "date")?;
            let value = Self::parse_f64(Self::field(&record, 1, "value")?, "value")?;
            points.push((date, value));
        }

        points.sort_by_key(|(date, _)| *date);
        let skip = points.len().saturating_sub(count);
        Ok(points.into_iter().skip(skip).map(|(_, v)| v).collect())
    }

    /// Find the row for `ticker` in a ticker-keyed CSV file.
    fn find_row(
        &self,
        name: &str,
        ticker: &str,
    ) -> Result<csv::StringRecord, QuantrebalError> {
        let content = self.read_file(name)?;
        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        for result in rdr.records() {
            let record = result.map_err(|e| QuantrebalError::Data {
                reason: format!("CSV parse error in {}: {}", name, e),
            })?;
            if Self::field(&record, 0, "ticker")? == ticker {
                return Ok(record);
            }
        }
        Err(QuantrebalError::Data {
            reason: format!("no row for {} in {}", ticker, name),
        })
    }
}

impl DataPort for CsvDataAdapter {
    fn fetch_factors(
        &self,
        tickers: &[String],
        factors: &[String],
        date: NaiveDate,
    ) -> Result<FactorMatrix, QuantrebalError> {
        let name = format!("factors_{}.csv", date.format("%Y%m%d"));
        let content = self.read_file(&name)?;
        let mut rdr = csv::Reader::from_reader(content.as_bytes());

        let headers = rdr.headers().map_err(|e| QuantrebalError::Data {
            reason: format!("CSV parse error in {}: {}", name, e),
        })?;
        let mut column_of = HashMap::new();
        for (i, header) in headers.iter().enumerate() {
            column_of.insert(header.trim().to_string(), i);
        }
        let columns: Vec<usize> = factors
            .iter()
            .map(|factor| {
                column_of
                    .get(factor.as_str())
                    .copied()
                    .ok_or_else(|| QuantrebalError::Data {
                        reason: format!("no column '{}' in {}", factor, name),
                    })
            })
            .collect::<Result<_, _>>()?;

        let mut rows: HashMap<String, Vec<Option<f64>>> = HashMap::new();
        for result in rdr.records() {
            let record = result.map_err(|e| QuantrebalError::Data {
                reason: format!("CSV parse error in {}: {}", name, e),
            })?;
            let ticker = Self::field(&record, 0, "ticker")?.trim().to_string();
            let mut values = Vec::with_capacity(columns.len());
            for (&col, factor) in columns.iter().zip(factors) {
                let raw = Self::field(&record, col, factor)?.trim();
                if raw.is_empty() {
                    values.push(None);
                } else {
                    values.push(Some(Self::parse_f64(raw, factor)?));
                }
            }
            rows.insert(ticker, values);
        }

        // Requested ticker order is preserved; tickers without a row are
        // omitted rather than treated as errors.
        let mut matrix = FactorMatrix::new(factors.to_vec());
        for ticker in tickers {
            if let Some(values) = rows.get(ticker) {
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
        let name = format!("index_{}.csv", index);
        let content = self.read_file(&name)?;
        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut members = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| QuantrebalError::Data {
                reason: format!("CSV parse error in {}: {}", name, e),
            })?;
            members.push(Self::field(&record, 0, "ticker")?.trim().to_string());
        }
        Ok(members)
    }

    fn fetch_volume_history(
        &self,
        ticker: &str,
        days: usize,
    ) -> Result<Vec<f64>, QuantrebalError> {
        let content = self.read_file("volumes.csv")?;
        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut points = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| QuantrebalError::Data {
                reason: format!("CSV parse error in volumes.csv: {}", e),
            })?;
            if Self::field(&record, 0, "ticker")? != ticker {
                continue;
            }
            let date = Self::parse_date(Self::field(&record, 1, "date")?, "date")?;
            let volume = Self::parse_f64(Self::field(&record, 2, "volume")?, "volume")?;
            points.push((date, volume));
        }

        if points.is_empty() {
            return Err(QuantrebalError::Data {
                reason: format!("no volume history for {}", ticker),
            });
        }

        points.sort_by_key(|(date, _)| *date);
        let skip = points.len().saturating_sub(days);
        Ok(points.into_iter().skip(skip).map(|(_, v)| v).collect())
    }

    fn fetch_security_info(&self, ticker: &str) -> Result<SecurityInfo, QuantrebalError> {
        let record = self.find_row("securities.csv", ticker)?;
        let listing_date =
            Self::parse_date(Self::field(&record, 1, "listing_date")?, "listing_date")?;
        let is_st = matches!(
            Self::field(&record, 2, "is_st")?.trim(),
            "1" | "true" | "yes"
        );
        Ok(SecurityInfo {
            listing_date,
            is_st,
        })
    }

    fn fetch_snapshot(&self, ticker: &str) -> Result<Snapshot, QuantrebalError> {
        let record = self.find_row("snapshots.csv", ticker)?;
        Ok(Snapshot {
            last_price: Self::parse_f64(Self::field(&record, 1, "last_price")?, "last_price")?,
            limit_up: Self::parse_f64(Self::field(&record, 2, "limit_up")?, "limit_up")?,
            limit_down: Self::parse_f64(Self::field(&record, 3, "limit_down")?, "limit_down")?,
        })
    }

    fn fetch_previous_close(&self, ticker: &str) -> Result<PrevClose, QuantrebalError> {
        let record = self.find_row("prev_close.csv", ticker)?;
        Ok(PrevClose {
            close: Self::parse_f64(Self::field(&record, 1, "close")?, "close")?,
            limit_up: Self::parse_f64(Self::field(&record, 2, "limit_up")?, "limit_up")?,
        })
    }

    fn fetch_turnover_series(&self, count: usize) -> Result<Vec<f64>, QuantrebalError> {
        self.read_series("turnover.csv", count)
    }

    fn fetch_sector_levels(&self, count: usize) -> Result<Vec<f64>, QuantrebalError> {
        self.read_series("sector.csv", count)
    }
}
