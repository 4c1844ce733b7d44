//! Forward contract service.
//!
//! The single entry point of the ledger core. Every operation passes the availability
//! gate first, then runs through the transaction pipeline (create, sign) or the read
//! model (details, counts).

use std::{collections::HashMap, sync::Arc};

use alloy::primitives::{Address, U256};
use tracing::{info, warn};

use crate::{
	models::{
		ContractView, CreateContractResult, LedgerSettings, LedgerStatus, SignContractResult,
	},
	services::{
		blockchain::LedgerClient,
		contract::{
			binding::{self, EntryPoint},
			gate::{self, Credentials},
			pipeline::TransactionPipeline,
			read_model::ContractReadModel,
			ForwardContractError,
		},
	},
};

/// Ledger access of a service whose client could be constructed
struct Ledger<C> {
	client: Arc<C>,
	pipeline: TransactionPipeline<C>,
	read_model: ContractReadModel<C>,
}

/// Records and reads forward contracts on the ledger
///
/// One instance per signing identity; share it behind an `Arc` across request handlers.
pub struct ForwardContractService<C> {
	settings: LedgerSettings,
	ledger: Option<Ledger<C>>,
}

impl<C: LedgerClient> ForwardContractService<C> {
	/// Creates a service over the given ledger client
	pub fn new(settings: LedgerSettings, client: Arc<C>) -> Self {
		Self {
			settings,
			ledger: Some(Ledger {
				pipeline: TransactionPipeline::new(client.clone()),
				read_model: ContractReadModel::new(client.clone()),
				client,
			}),
		}
	}

	/// Creates a service that has no ledger client, e.g. because the RPC URL is invalid
	///
	/// Every operation reports the service as not configured.
	pub fn without_client(settings: LedgerSettings) -> Self {
		Self {
			settings,
			ledger: None,
		}
	}

	pub fn settings(&self) -> &LedgerSettings {
		&self.settings
	}

	/// Runs the availability gate
	async fn available(&self) -> Result<(&Ledger<C>, Credentials), ForwardContractError> {
		let Some(ledger) = &self.ledger else {
			return Err(ForwardContractError::not_configured(
				"Ledger client could not be created",
				None,
				Some(HashMap::from([(
					"rpc_url".to_string(),
					self.settings.rpc_url.clone(),
				)])),
			));
		};
		let credentials = gate::check_availability(&self.settings, ledger.client.as_ref()).await?;
		Ok((ledger, credentials))
	}

	/// Whether the service can currently reach the ledger with valid credentials
	///
	/// Evaluated on every call; node connectivity may change between calls.
	pub async fn is_configured(&self) -> bool {
		self.available().await.is_ok()
	}

	/// Number of contracts recorded by the program, zero when the service is unavailable
	pub async fn total_contracts(&self) -> Result<U256, ForwardContractError> {
		let Ok((ledger, credentials)) = self.available().await else {
			return Ok(U256::ZERO);
		};
		ledger
			.read_model
			.total_contracts(credentials.contract_address)
			.await
	}

	/// Records a new forward contract
	///
	/// # Arguments
	/// * `commodity` - Free-form commodity label
	/// * `quantity` - Contracted quantity
	/// * `price_per_unit` - Agreed price per unit
	/// * `delivery_timestamp` - Delivery date as Unix seconds
	/// * `farmer_address` - Business counterparty; not compared with the signing account
	///
	/// # Returns
	/// The confirmed outcome; `contract_id` is absent when the receipt carries no creation
	/// event of the program
	pub async fn create_contract(
		&self,
		commodity: &str,
		quantity: U256,
		price_per_unit: U256,
		delivery_timestamp: u64,
		farmer_address: &str,
	) -> Result<CreateContractResult, ForwardContractError> {
		let (ledger, credentials) = self.available().await?;
		let farmer_address = parse_counterparty("farmer", farmer_address)?;

		let calldata = binding::encode_create_contract(
			commodity,
			quantity,
			price_per_unit,
			U256::from(delivery_timestamp),
		);
		let receipt = ledger
			.pipeline
			.submit(&credentials, EntryPoint::CreateContract, calldata)
			.await?;

		let contract_id = binding::find_contract_created(credentials.contract_address, &receipt)
			.map(|event| event.contract_id);
		match contract_id {
			Some(id) => info!("Contract {} created for farmer {}", id, farmer_address),
			None => warn!(
				"Transaction {} confirmed without a ContractCreated event",
				receipt.transaction_hash
			),
		}

		Ok(CreateContractResult {
			success: true,
			transaction_hash: receipt.transaction_hash,
			contract_id,
			farmer_address,
			block_number: receipt.block_number,
			gas_used: receipt.gas_used,
		})
	}

	/// Signs a contract as buyer
	///
	/// The contract is not checked beforehand; rejections of the program, such as an
	/// unknown or already signed contract, surface as `LedgerRevert`.
	pub async fn sign_contract(
		&self,
		contract_id: U256,
		buyer_address: &str,
	) -> Result<SignContractResult, ForwardContractError> {
		let (ledger, credentials) = self.available().await?;
		let buyer_address = parse_counterparty("buyer", buyer_address)?;

		let receipt = ledger
			.pipeline
			.submit(
				&credentials,
				EntryPoint::SignAsBuyer,
				binding::encode_sign_as_buyer(contract_id),
			)
			.await?;
		info!("Contract {} signed by buyer {}", contract_id, buyer_address);

		Ok(SignContractResult {
			success: true,
			transaction_hash: receipt.transaction_hash,
			contract_id,
			buyer_address,
			block_number: receipt.block_number,
			gas_used: receipt.gas_used,
		})
	}

	/// Reads one contract with its derived status and event history
	pub async fn get_contract_details(
		&self,
		contract_id: U256,
	) -> Result<ContractView, ForwardContractError> {
		let (ledger, credentials) = self.available().await?;
		ledger
			.read_model
			.get_contract(credentials.contract_address, contract_id)
			.await
	}

	/// Ids of the contracts recorded for a farmer
	pub async fn farmer_contracts(
		&self,
		farmer_address: &str,
	) -> Result<Vec<U256>, ForwardContractError> {
		let (ledger, credentials) = self.available().await?;
		let farmer_address = parse_counterparty("farmer", farmer_address)?;
		ledger
			.read_model
			.farmer_contracts(credentials.contract_address, farmer_address)
			.await
	}

	/// Availability snapshot for status reporting; never fails
	pub async fn status(&self) -> LedgerStatus {
		let gate = self.available().await;
		let configured = gate.is_ok();

		let connected = match &gate {
			Ok(_) => true,
			Err(ForwardContractError::Unreachable(_)) => false,
			Err(_) => match &self.ledger {
				Some(ledger) => ledger.client.is_connected().await,
				None => false,
			},
		};

		let (total_contracts, contract_address) = match &gate {
			Ok((ledger, credentials)) => {
				let total = ledger
					.read_model
					.total_contracts(credentials.contract_address)
					.await
					.unwrap_or_else(|e| {
						warn!("Failed to read the contract count: {}", e);
						U256::ZERO
					});
				(total, Some(credentials.contract_address.to_checksum(None)))
			}
			Err(_) => (U256::ZERO, None),
		};

		let message = match &gate {
			Ok(_) => "Blockchain service is operational".to_string(),
			Err(ForwardContractError::Unreachable(_)) => {
				format!("Ledger node at {} is unreachable", self.settings.rpc_url)
			}
			Err(_) => {
				"Blockchain not configured. Set CONTRACT_ADDRESS and PRIVATE_KEY in .env".to_string()
			}
		};

		LedgerStatus {
			configured,
			connected,
			rpc_url: self.settings.rpc_url.clone(),
			contract_address,
			total_contracts,
			message,
		}
	}
}

/// Validates a counterparty address supplied by the caller.
///
/// The program records the sender as the party, so the address is reported back but
/// never encoded into the call.
fn parse_counterparty(role: &str, value: &str) -> Result<Address, ForwardContractError> {
	gate::parse_address(value).map_err(|e| {
		ForwardContractError::invalid_input(
			format!("Invalid {} address: {}", role, e),
			Some(HashMap::from([("role".to_string(), role.to_string())])),
		)
	})
}
