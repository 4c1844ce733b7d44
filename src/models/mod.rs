//! Domain models and data structures for the forward contract ledger service.
//!
//! This module contains all the core data structures used throughout the application:
//!
//! - `config`: Ledger settings loaded from the environment
//! - `ledger`: Contract records, views, events and transaction receipts
//! - `security`: Zeroizing secret holder for the signing key

mod config;
mod ledger;
mod security;

pub use config::{
	ConfigError, LedgerSettings, DEFAULT_RECEIPT_POLL_INTERVAL, DEFAULT_RECEIPT_TIMEOUT,
	DEFAULT_REQUEST_TIMEOUT, DEFAULT_RPC_URL,
};
pub use ledger::{
	ContractCreatedEvent, ContractEvent, ContractEventRecord, ContractRecord, ContractSettledEvent,
	ContractSignedEvent, ContractStatus, ContractView, CreateContractResult, LedgerLog,
	LedgerReceipt, LedgerStatus, LogQuery, SignContractResult,
};
pub use security::SecretString;
