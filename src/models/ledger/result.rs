//! Outcomes of the service operations.

use alloy::primitives::{Address, B256, U256};
use serde::Serialize;

/// Outcome of a confirmed contract creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateContractResult {
	pub success: bool,
	pub transaction_hash: B256,
	/// Id assigned by the program, absent when the receipt carries no creation event
	pub contract_id: Option<U256>,
	/// Business counterparty supplied by the caller
	pub farmer_address: Address,
	pub block_number: u64,
	pub gas_used: u64,
}

/// Outcome of a confirmed buyer signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignContractResult {
	pub success: bool,
	pub transaction_hash: B256,
	pub contract_id: U256,
	/// Business counterparty supplied by the caller
	pub buyer_address: Address,
	pub block_number: u64,
	pub gas_used: u64,
}

/// Snapshot of the service availability, for status reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerStatus {
	pub configured: bool,
	pub connected: bool,
	pub rpc_url: String,
	/// Only reported when the service is configured
	pub contract_address: Option<String>,
	pub total_contracts: U256,
	pub message: String,
}
