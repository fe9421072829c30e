//! In-memory paper broker.
//!
//! Applies rebalance instructions to a cash + holdings ledger, for offline
//! runs and tests. Real order routing is out of scope; this adapter only
//! mirrors the target-value semantics the planner assumes.

use crate::domain::error::QuantrebalError;
use crate::domain::market::Holding;
use crate::domain::rebalance::TradeInstruction;
use crate::ports::broker_port::BrokerPort;
use std::fs;
use std::path::Path;

pub struct PaperBroker {
    cash: f64,
    holdings: Vec<Holding>,
}

impl PaperBroker {
    pub fn new(cash: f64) -> Self {
        Self {
            cash,
            holdings: Vec::new(),
        }
    }

    pub fn with_holding(mut self, ticker: &str, market_value: f64) -> Self {
        self.holdings.push(Holding {
            ticker: ticker.to_string(),
            market_value,
        });
        self
    }

    pub fn cash(&self) -> f64 {
        self.cash
    }

    /// Seed a broker from a `ticker,market_value` CSV file. A missing file
    /// means no open positions.
    pub fn from_holdings_file(cash: f64, path: &Path) -> Result<Self, QuantrebalError> {
        let mut broker = Self::new(cash);
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(broker),
            Err(e) => {
                return Err(QuantrebalError::Broker {
                    reason: format!("failed to read {}: {}", path.display(), e),
                });
            }
        };

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        for result in rdr.records() {
            let record = result.map_err(|e| QuantrebalError::Broker {
                reason: format!("CSV parse error in {}: {}", path.display(), e),
            })?;
            let ticker = record.get(0).ok_or_else(|| QuantrebalError::Broker {
                reason: "missing ticker column".to_string(),
            })?;
            let market_value: f64 = record
                .get(1)
                .ok_or_else(|| QuantrebalError::Broker {
                    reason: "missing market_value column".to_string(),
                })?
                .trim()
                .parse()
                .map_err(|e| QuantrebalError::Broker {
                    reason: format!("invalid market_value: {}", e),
                })?;
            broker.holdings.push(Holding {
                ticker: ticker.trim().to_string(),
                market_value,
            });
        }
        Ok(broker)
    }
}

impl BrokerPort for PaperBroker {
    fn holdings(&self) -> Result<Vec<Holding>, QuantrebalError> {
        Ok(self.holdings.clone())
    }

    fn total_value(&self) -> Result<f64, QuantrebalError> {
        let position_value: f64 = self.holdings.iter().map(|h| h.market_value).sum();
        Ok(self.cash + position_value)
    }

    fn submit(&mut self, instruction: &TradeInstruction) -> Result<(), QuantrebalError> {
        match instruction {
            TradeInstruction::Sell { ticker } => {
                let index = self
                    .holdings
                    .iter()
                    .position(|h| &h.ticker == ticker)
                    .ok_or_else(|| QuantrebalError::Broker {
                        reason: format!("cannot sell {}: not held", ticker),
                    })?;
                let holding = self.holdings.remove(index);
                self.cash += holding.market_value;
                Ok(())
            }
            TradeInstruction::Buy {
                ticker,
                target_value,
            } => {
                if self.holdings.iter().any(|h| &h.ticker == ticker) {
                    return Err(QuantrebalError::Broker {
                        reason: format!("cannot buy {}: already held", ticker),
                    });
                }
                if *target_value > self.cash {
                    return Err(QuantrebalError::Broker {
                        reason: format!(
                            "cannot buy {}: target {:.2} exceeds cash {:.2}",
                            ticker, target_value, self.cash
                        ),
                    });
                }
                self.cash -= target_value;
                self.holdings.push(Holding {
                    ticker: ticker.clone(),
                    market_value: *target_value,
                });
                Ok(())
            }
        }
    }
}
