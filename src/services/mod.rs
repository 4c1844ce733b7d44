//! Core services implementing the forward contract ledger functionality.
//!
//! - `blockchain`: Ledger node client and transport
//! - `contract`: Contract binding, transaction pipeline, read model and the service facade

pub mod blockchain;
pub mod contract;
