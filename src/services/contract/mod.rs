//! Forward contract ledger service.
//!
//! Turns create, sign and read intents into confirmed ledger transactions and typed
//! contract views:
//!
//! - `binding`: Call data and event encoding of the forward contract program
//! - `gate`: Credential checks and liveness probe run before any operation
//! - `pipeline`: Nonce serialized signing, submission and confirmation
//! - `read_model`: Contract reads, status derivation and event history
//! - `service`: The [`ForwardContractService`] facade
//! - `error`: The service error taxonomy

pub mod binding;
mod error;
pub mod gate;
pub mod pipeline;
pub mod read_model;
mod service;

pub use error::{ErrorCategory, ForwardContractError};
pub use gate::Credentials;
pub use pipeline::{PendingTransaction, TransactionPipeline};
pub use read_model::{derive_status, ContractReadModel};
pub use service::ForwardContractService;
