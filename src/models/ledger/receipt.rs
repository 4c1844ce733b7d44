//! Transaction receipts and logs as returned by the ledger node.

use alloy::primitives::{Address, Log, B256};

/// A log entry with its position on the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerLog {
	/// Emitting address, topics and data
	pub inner: Log,
	pub block_number: Option<u64>,
	pub transaction_hash: Option<B256>,
	pub log_index: Option<u64>,
}

impl LedgerLog {
	/// Wraps a bare log that has no ledger position, e.g. one built in memory.
	pub fn from_log(inner: Log) -> Self {
		Self {
			inner,
			block_number: None,
			transaction_hash: None,
			log_index: None,
		}
	}

	pub fn address(&self) -> Address {
		self.inner.address
	}
}

/// Confirmation record of a mined transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerReceipt {
	pub transaction_hash: B256,
	pub block_number: u64,
	pub gas_used: u64,
	/// `false` when the program reverted the transaction
	pub success: bool,
	/// Emitted logs, in emission order
	pub logs: Vec<LedgerLog>,
}

/// Filter for an `eth_getLogs` query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogQuery {
	pub address: Address,
	/// One entry per topic position; each entry matches any of its hashes, an empty
	/// entry matches anything.
	pub topics: Vec<Vec<B256>>,
	/// First block to search, the earliest block when absent
	pub from_block: Option<u64>,
}
