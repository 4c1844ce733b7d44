//! Ledger domain models.
//!
//! - `contract`: Stored contract records, derived status and the caller facing view
//! - `event`: Events emitted by the forward contract program
//! - `receipt`: Receipts, logs and log queries of the ledger node
//! - `result`: Outcomes of the service operations

mod contract;
mod event;
mod receipt;
mod result;

pub use contract::{ContractRecord, ContractStatus, ContractView};
pub use event::{
	ContractCreatedEvent, ContractEvent, ContractEventRecord, ContractSettledEvent,
	ContractSignedEvent,
};
pub use receipt::{LedgerLog, LedgerReceipt, LogQuery};
pub use result::{CreateContractResult, LedgerStatus, SignContractResult};
