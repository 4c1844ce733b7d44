//! Events emitted by the forward contract program.

use alloy::primitives::{Address, B256, U256};
use serde::Serialize;

/// A new contract was recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContractCreatedEvent {
	pub contract_id: U256,
	pub farmer: Address,
	pub commodity: String,
	pub quantity: U256,
	pub price_per_unit: U256,
	pub delivery_date: U256,
}

/// A party signed a contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContractSignedEvent {
	pub contract_id: U256,
	pub signer: Address,
	/// Role of the signer as reported by the program, e.g. `"buyer"`
	pub signer_type: String,
}

/// A contract was settled between both parties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContractSettledEvent {
	pub contract_id: U256,
	pub farmer: Address,
	pub buyer: Address,
	pub total_value: U256,
}

/// Any event of the forward contract program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ContractEvent {
	Created(ContractCreatedEvent),
	Signed(ContractSignedEvent),
	Settled(ContractSettledEvent),
}

impl ContractEvent {
	pub fn contract_id(&self) -> U256 {
		match self {
			Self::Created(event) => event.contract_id,
			Self::Signed(event) => event.contract_id,
			Self::Settled(event) => event.contract_id,
		}
	}
}

/// An event together with where it was found on the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContractEventRecord {
	pub block_number: Option<u64>,
	pub transaction_hash: Option<B256>,
	pub log_index: Option<u64>,
	#[serde(flatten)]
	pub event: ContractEvent,
}
