//! Forward contract ledger service.
//!
//! Records oilseed forward-delivery agreements on an EVM ledger and reads them back as
//! typed contract views.
//!
//! # Architecture
//!
//! - `bootstrap`: Service construction from the environment
//! - `models`: Settings, contract records, events and receipts
//! - `services`: Ledger client, contract binding, transaction pipeline and read model
//! - `utils`: Error context, logging and parsing helpers
//!
//! # Flow
//!
//! 1. Settings are loaded from the environment, optionally seeded from a `.env` file
//! 2. An HTTP JSON-RPC client is built for the configured node
//! 3. Every operation passes the availability gate before any ledger I/O
//! 4. Mutating calls are signed under a per-identity nonce lock, then confirmed
//! 5. Reads decode the stored tuple and the event history into a [`models::ContractView`]

pub mod bootstrap;
pub mod models;
pub mod services;
pub mod utils;
