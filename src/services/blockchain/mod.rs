//! Ledger node access.
//!
//! This module provides the adapter the forward contract service uses to reach an
//! EVM-compatible node:
//!
//! - `client`: The [`LedgerClient`] contract and its JSON-RPC implementation
//! - `transports`: HTTP transport for raw JSON-RPC requests
//! - `error`: Error types for node operations

mod client;
mod error;
mod transports;

pub use client::{EvmLedgerClient, LedgerClient};
#[cfg(test)]
pub use client::MockLedgerClient;
pub use error::BlockChainError;
pub use transports::{BlockchainTransport, HttpTransportClient};
