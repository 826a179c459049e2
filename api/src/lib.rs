//! This crate contains the data layer of the deposit dashboard: chain reads,
//! indexer queries, and the fixed-point values they produce.

pub mod chain;
pub mod config;
pub mod contract_cache;
pub mod contracts;
pub mod deposit;
pub mod error;
pub mod indexer;
pub mod units;

pub use alloy_primitives::Address;
pub use error::DashboardError;
