pub mod data_port;
pub mod broker_port;
pub mod config_port;
