//! Typed binding of the forward contract program.
//!
//! Encodes the entry points of the program into call data and decodes return data and
//! event logs into domain values. Everything here is pure; no I/O happens in this module.

use alloy::{
	primitives::{Address, Bytes, Log, U256},
	sol,
	sol_types::{SolCall, SolEvent},
};

use crate::models::{
	ContractCreatedEvent, ContractEvent, ContractEventRecord, ContractRecord, ContractSettledEvent,
	ContractSignedEvent, LedgerLog, LedgerReceipt,
};

sol! {
	interface IForwardContract {
		#[derive(Debug, PartialEq, Eq)]
		struct Contract {
			uint256 id;
			address farmer;
			address buyer;
			string commodity;
			uint256 quantity;
			uint256 pricePerUnit;
			uint256 deliveryDate;
			bool farmerSigned;
			bool buyerSigned;
			bool settled;
			uint256 createdAt;
		}

		#[derive(Debug, PartialEq, Eq)]
		event ContractCreated(
			uint256 indexed contractId,
			address indexed farmer,
			string commodity,
			uint256 quantity,
			uint256 pricePerUnit,
			uint256 deliveryDate
		);

		#[derive(Debug, PartialEq, Eq)]
		event ContractSigned(uint256 indexed contractId, address indexed signer, string signerType);

		#[derive(Debug, PartialEq, Eq)]
		event ContractSettled(
			uint256 indexed contractId,
			address indexed farmer,
			address indexed buyer,
			uint256 totalValue
		);

		function createContract(
			string commodity,
			uint256 quantity,
			uint256 pricePerUnit,
			uint256 deliveryDate
		) external returns (uint256);

		function signAsBuyer(uint256 contractId) external;

		function getContract(uint256 contractId) external view returns (Contract memory);

		function getTotalContracts() external view returns (uint256);

		function getFarmerContracts(address farmer) external view returns (uint256[] memory);
	}
}

/// Mutating entry points of the program
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryPoint {
	CreateContract,
	SignAsBuyer,
}

impl EntryPoint {
	/// Static gas ceiling of the entry point
	pub fn gas_limit(&self) -> u64 {
		match self {
			Self::CreateContract => 500_000,
			Self::SignAsBuyer => 300_000,
		}
	}

	/// Solidity name of the entry point
	pub fn name(&self) -> &'static str {
		match self {
			Self::CreateContract => "createContract",
			Self::SignAsBuyer => "signAsBuyer",
		}
	}
}

pub fn encode_create_contract(
	commodity: &str,
	quantity: U256,
	price_per_unit: U256,
	delivery_date: U256,
) -> Bytes {
	IForwardContract::createContractCall {
		commodity: commodity.to_string(),
		quantity,
		pricePerUnit: price_per_unit,
		deliveryDate: delivery_date,
	}
	.abi_encode()
	.into()
}

pub fn encode_sign_as_buyer(contract_id: U256) -> Bytes {
	IForwardContract::signAsBuyerCall {
		contractId: contract_id,
	}
	.abi_encode()
	.into()
}

pub fn encode_get_contract(contract_id: U256) -> Bytes {
	IForwardContract::getContractCall {
		contractId: contract_id,
	}
	.abi_encode()
	.into()
}

pub fn encode_get_total_contracts() -> Bytes {
	IForwardContract::getTotalContractsCall {}.abi_encode().into()
}

pub fn encode_get_farmer_contracts(farmer: Address) -> Bytes {
	IForwardContract::getFarmerContractsCall { farmer }
		.abi_encode()
		.into()
}

/// Decodes the return data of `getContract`.
pub fn decode_contract_record(data: &[u8]) -> Result<ContractRecord, alloy::sol_types::Error> {
	let contract = IForwardContract::getContractCall::abi_decode_returns(data)?;
	Ok(ContractRecord::from(contract))
}

/// Decodes the return data of `getTotalContracts`.
pub fn decode_total_contracts(data: &[u8]) -> Result<U256, alloy::sol_types::Error> {
	IForwardContract::getTotalContractsCall::abi_decode_returns(data)
}

/// Decodes the return data of `getFarmerContracts`.
pub fn decode_farmer_contracts(data: &[u8]) -> Result<Vec<U256>, alloy::sol_types::Error> {
	IForwardContract::getFarmerContractsCall::abi_decode_returns(data)
}

impl From<IForwardContract::Contract> for ContractRecord {
	fn from(contract: IForwardContract::Contract) -> Self {
		Self {
			id: contract.id,
			farmer: contract.farmer,
			buyer: contract.buyer,
			commodity: contract.commodity,
			quantity: contract.quantity,
			price_per_unit: contract.pricePerUnit,
			delivery_date: contract.deliveryDate,
			farmer_signed: contract.farmerSigned,
			buyer_signed: contract.buyerSigned,
			settled: contract.settled,
			created_at: contract.createdAt,
		}
	}
}

/// Topic hashes of every event the program emits
pub fn event_signatures() -> Vec<alloy::primitives::B256> {
	vec![
		IForwardContract::ContractCreated::SIGNATURE_HASH,
		IForwardContract::ContractSigned::SIGNATURE_HASH,
		IForwardContract::ContractSettled::SIGNATURE_HASH,
	]
}

/// Decodes a log emitted by `contract_address` into a program event.
///
/// Logs of other emitters, unknown topics and malformed payloads yield `None`.
pub fn decode_contract_event(contract_address: Address, log: &Log) -> Option<ContractEvent> {
	if log.address != contract_address {
		return None;
	}
	let topic0 = *log.topics().first()?;

	if topic0 == IForwardContract::ContractCreated::SIGNATURE_HASH {
		let event = IForwardContract::ContractCreated::decode_log_data(&log.data).ok()?;
		return Some(ContractEvent::Created(ContractCreatedEvent {
			contract_id: event.contractId,
			farmer: event.farmer,
			commodity: event.commodity,
			quantity: event.quantity,
			price_per_unit: event.pricePerUnit,
			delivery_date: event.deliveryDate,
		}));
	}
	if topic0 == IForwardContract::ContractSigned::SIGNATURE_HASH {
		let event = IForwardContract::ContractSigned::decode_log_data(&log.data).ok()?;
		return Some(ContractEvent::Signed(ContractSignedEvent {
			contract_id: event.contractId,
			signer: event.signer,
			signer_type: event.signerType,
		}));
	}
	if topic0 == IForwardContract::ContractSettled::SIGNATURE_HASH {
		let event = IForwardContract::ContractSettled::decode_log_data(&log.data).ok()?;
		return Some(ContractEvent::Settled(ContractSettledEvent {
			contract_id: event.contractId,
			farmer: event.farmer,
			buyer: event.buyer,
			total_value: event.totalValue,
		}));
	}
	None
}

/// Decodes a positioned log, keeping its ledger position.
pub fn decode_event_record(contract_address: Address, log: &LedgerLog) -> Option<ContractEventRecord> {
	decode_contract_event(contract_address, &log.inner).map(|event| ContractEventRecord {
		block_number: log.block_number,
		transaction_hash: log.transaction_hash,
		log_index: log.log_index,
		event,
	})
}

/// Picks the creation event out of a receipt.
///
/// Returns the first `ContractCreated` log emitted by `contract_address`; logs of other
/// emitters are ignored even when their topics match.
pub fn find_contract_created(
	contract_address: Address,
	receipt: &LedgerReceipt,
) -> Option<ContractCreatedEvent> {
	receipt
		.logs
		.iter()
		.find_map(|log| match decode_contract_event(contract_address, &log.inner) {
			Some(ContractEvent::Created(event)) => Some(event),
			_ => None,
		})
}
