//! Forward contract records and their presentation view.

use std::fmt;

use alloy::primitives::{Address, U256, U512};
use serde::{Deserialize, Serialize};

use crate::models::ContractEventRecord;

/// A forward contract as stored by the ledger program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractRecord {
	pub id: U256,
	pub farmer: Address,
	/// Zero until a buyer has signed
	pub buyer: Address,
	pub commodity: String,
	pub quantity: U256,
	pub price_per_unit: U256,
	/// Unix timestamp in seconds
	pub delivery_date: U256,
	pub farmer_signed: bool,
	pub buyer_signed: bool,
	pub settled: bool,
	/// Unix timestamp in seconds, set by the program
	pub created_at: U256,
}

impl ContractRecord {
	/// `quantity * price_per_unit`, widened to 512 bits so the product of two
	/// 256-bit values never truncates.
	pub fn total_value(&self) -> U512 {
		self.quantity.widening_mul(self.price_per_unit)
	}

	/// Whether this is the zero-valued tuple the program returns for an id it never
	/// assigned.
	///
	/// Creation always records a non-zero farmer and a creation time, so a record
	/// lacking both was never written. Id and quantity are not considered: id 0 with
	/// zero quantity can be a real contract.
	pub fn is_unset(&self) -> bool {
		self.farmer == Address::ZERO && self.created_at.is_zero()
	}

	/// The buyer, if one has signed.
	pub fn buyer(&self) -> Option<Address> {
		(self.buyer != Address::ZERO).then_some(self.buyer)
	}
}

/// Lifecycle state of a contract, derived from its three flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContractStatus {
	Pending,
	WaitingForBuyer,
	SignedByBoth,
	Settled,
}

impl ContractStatus {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Pending => "PENDING",
			Self::WaitingForBuyer => "WAITING_FOR_BUYER",
			Self::SignedByBoth => "SIGNED_BY_BOTH",
			Self::Settled => "SETTLED",
		}
	}

	/// No further transitions are possible.
	pub fn is_terminal(&self) -> bool {
		matches!(self, Self::Settled)
	}
}

impl fmt::Display for ContractStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Contract details as reported to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContractView {
	pub contract_id: U256,
	pub farmer_address: Address,
	pub buyer_address: Address,
	pub commodity: String,
	pub quantity: U256,
	pub price_per_unit: U256,
	/// `YYYY-MM-DD`, absent when the timestamp is out of calendar range
	pub delivery_date: Option<String>,
	pub delivery_date_timestamp: U256,
	pub farmer_signed: bool,
	pub buyer_signed: bool,
	pub settled: bool,
	/// `YYYY-MM-DD HH:MM:SS`, absent when the timestamp is out of calendar range
	pub created_at: Option<String>,
	pub created_at_timestamp: U256,
	pub total_value: U512,
	pub status: ContractStatus,
	/// Events emitted for this contract, in ledger order
	pub events: Vec<ContractEventRecord>,
}
