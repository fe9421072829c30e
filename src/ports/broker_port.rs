//! Broker/execution port trait.

use crate::domain::error::QuantrebalError;
use crate::domain::market::Holding;
use crate::domain::rebalance::TradeInstruction;

pub trait BrokerPort {
    /// Current holdings in a stable, deterministic order.
    fn holdings(&self) -> Result<Vec<Holding>, QuantrebalError>;

    /// Cash plus the market value of all holdings.
    fn total_value(&self) -> Result<f64, QuantrebalError>;

    fn submit(&mut self, instruction: &TradeInstruction) -> Result<(), QuantrebalError>;
}
