//! Configuration loading for the ledger service.
//!
//! Settings come from the process environment, optionally seeded from a `.env` file by
//! the binary before loading.

mod error;
mod ledger_config;

pub use error::ConfigError;
pub use ledger_config::{
	LedgerSettings, DEFAULT_RECEIPT_POLL_INTERVAL, DEFAULT_RECEIPT_TIMEOUT, DEFAULT_REQUEST_TIMEOUT,
	DEFAULT_RPC_URL,
};
