//! Core domain types and logic.

pub mod market;
pub mod factors;
pub mod ranking;
pub mod selection;
pub mod rebalance;
pub mod regime;
pub mod cycle;
pub mod universe;
pub mod config_validation;
pub mod error;
