//! Contract read model.
//!
//! Fetches stored contracts and their event history from the ledger and turns them into
//! [`ContractView`]s. Status is classified from the stored flags; nothing here writes to
//! the ledger.

use std::{collections::HashMap, sync::Arc};

use alloy::primitives::{Address, Bytes, B256, U256};
use tracing::{debug, warn};

use crate::{
	models::{ContractEventRecord, ContractRecord, ContractStatus, ContractView, LogQuery},
	services::{
		blockchain::{BlockChainError, LedgerClient},
		contract::{binding, ForwardContractError},
	},
	utils::{format_timestamp_date, format_timestamp_datetime},
};

/// Classifies the three stored flags into a status.
///
/// First match wins: settled, then both signed, then farmer signed. A contract without
/// any flag set is `Pending`.
pub fn derive_status(farmer_signed: bool, buyer_signed: bool, settled: bool) -> ContractStatus {
	if settled {
		ContractStatus::Settled
	} else if farmer_signed && buyer_signed {
		ContractStatus::SignedByBoth
	} else if farmer_signed {
		ContractStatus::WaitingForBuyer
	} else {
		ContractStatus::Pending
	}
}

/// Assembles the caller facing view of a stored contract.
pub fn build_view(record: ContractRecord, events: Vec<ContractEventRecord>) -> ContractView {
	let status = derive_status(record.farmer_signed, record.buyer_signed, record.settled);
	let total_value = record.total_value();

	ContractView {
		contract_id: record.id,
		farmer_address: record.farmer,
		buyer_address: record.buyer,
		delivery_date: u64::try_from(record.delivery_date)
			.ok()
			.and_then(format_timestamp_date),
		delivery_date_timestamp: record.delivery_date,
		created_at: u64::try_from(record.created_at)
			.ok()
			.and_then(format_timestamp_datetime),
		created_at_timestamp: record.created_at,
		commodity: record.commodity,
		quantity: record.quantity,
		price_per_unit: record.price_per_unit,
		farmer_signed: record.farmer_signed,
		buyer_signed: record.buyer_signed,
		settled: record.settled,
		total_value,
		status,
		events,
	}
}

/// Log filter selecting every program event of one contract.
pub fn event_history_query(contract_address: Address, contract_id: U256) -> LogQuery {
	LogQuery {
		address: contract_address,
		topics: vec![
			binding::event_signatures(),
			vec![B256::from(contract_id.to_be_bytes::<32>())],
		],
		from_block: None,
	}
}

/// Read-only access to the forward contract program
pub struct ContractReadModel<C> {
	client: Arc<C>,
}

impl<C: LedgerClient> ContractReadModel<C> {
	pub fn new(client: Arc<C>) -> Self {
		Self { client }
	}

	/// Fetches one contract with its event history.
	///
	/// # Errors
	/// - `NotFound` if the program reverts, returns nothing, or returns the zero-valued
	///   tuple it reports for unassigned ids
	/// - `Unreachable` if the node cannot be queried or returns malformed data
	pub async fn get_contract(
		&self,
		contract_address: Address,
		contract_id: U256,
	) -> Result<ContractView, ForwardContractError> {
		let metadata = HashMap::from([
			("contract_address".to_string(), contract_address.to_string()),
			("contract_id".to_string(), contract_id.to_string()),
		]);

		let data = self
			.client
			.call(contract_address, binding::encode_get_contract(contract_id))
			.await
			.map_err(|e| match e {
				BlockChainError::ExecutionReverted(_) => ForwardContractError::not_found(
					format!("Contract {} does not exist", contract_id),
					Some(Box::new(e)),
					Some(metadata.clone()),
				),
				_ => ForwardContractError::unreachable(
					format!("Failed to read contract {}", contract_id),
					Some(Box::new(e)),
					Some(metadata.clone()),
				),
			})?;

		if data.is_empty() {
			return Err(ForwardContractError::not_found(
				format!("Contract {} does not exist", contract_id),
				None,
				Some(metadata),
			));
		}

		let record = binding::decode_contract_record(&data).map_err(|e| {
			ForwardContractError::unreachable(
				"Ledger returned malformed contract data",
				Some(Box::new(e)),
				Some(metadata.clone()),
			)
		})?;

		if record.is_unset() {
			return Err(ForwardContractError::not_found(
				format!("Contract {} does not exist", contract_id),
				None,
				Some(metadata),
			));
		}

		let events = self.event_history(contract_address, contract_id).await;
		Ok(build_view(record, events))
	}

	/// Decoded events of one contract, in ledger order.
	///
	/// History is supplementary to the stored record: a failed log query is logged and
	/// yields no events.
	pub async fn event_history(
		&self,
		contract_address: Address,
		contract_id: U256,
	) -> Vec<ContractEventRecord> {
		let logs = match self
			.client
			.get_logs(event_history_query(contract_address, contract_id))
			.await
		{
			Ok(logs) => logs,
			Err(e) => {
				warn!("Event history of contract {} unavailable: {}", contract_id, e);
				return Vec::new();
			}
		};

		let mut events: Vec<ContractEventRecord> = logs
			.iter()
			.filter_map(|log| binding::decode_event_record(contract_address, log))
			.filter(|record| record.event.contract_id() == contract_id)
			.collect();
		events.sort_by_key(|record| (record.block_number, record.log_index));
		debug!("Found {} events for contract {}", events.len(), contract_id);
		events
	}

	/// Number of contracts recorded by the program.
	///
	/// # Errors
	/// - `LedgerRevert` if the program rejects the call
	/// - `Unreachable` if the node cannot be queried or returns malformed data
	pub async fn total_contracts(
		&self,
		contract_address: Address,
	) -> Result<U256, ForwardContractError> {
		let data = self
			.read(
				contract_address,
				"getTotalContracts",
				binding::encode_get_total_contracts(),
			)
			.await?;
		binding::decode_total_contracts(&data).map_err(|e| {
			ForwardContractError::unreachable(
				"Ledger returned a malformed contract count",
				Some(Box::new(e)),
				None,
			)
		})
	}

	/// Ids of the contracts created for `farmer`.
	///
	/// # Errors
	/// - `LedgerRevert` if the program rejects the call
	/// - `Unreachable` if the node cannot be queried or returns malformed data
	pub async fn farmer_contracts(
		&self,
		contract_address: Address,
		farmer: Address,
	) -> Result<Vec<U256>, ForwardContractError> {
		let data = self
			.read(
				contract_address,
				"getFarmerContracts",
				binding::encode_get_farmer_contracts(farmer),
			)
			.await?;
		binding::decode_farmer_contracts(&data).map_err(|e| {
			ForwardContractError::unreachable(
				"Ledger returned a malformed contract list",
				Some(Box::new(e)),
				Some(HashMap::from([("farmer".to_string(), farmer.to_string())])),
			)
		})
	}

	async fn read(
		&self,
		contract_address: Address,
		function: &str,
		calldata: Bytes,
	) -> Result<Bytes, ForwardContractError> {
		let metadata = HashMap::from([
			("contract_address".to_string(), contract_address.to_string()),
			("function".to_string(), function.to_string()),
		]);
		self.client
			.call(contract_address, calldata)
			.await
			.map_err(|e| match e {
				BlockChainError::ExecutionReverted(_) => ForwardContractError::ledger_revert(
					format!("{} was rejected by the program", function),
					Some(Box::new(e)),
					Some(metadata),
				),
				_ => ForwardContractError::unreachable(
					format!("Failed to call {}", function),
					Some(Box::new(e)),
					Some(metadata),
				),
			})
	}
}
