use std::sync::Arc;

use alloy::primitives::{Address, U256, U512};

use oilseed_ledger::{
	models::{ContractEvent, ContractStatus, LedgerSettings},
	services::contract::{ErrorCategory, ForwardContractError, ForwardContractService},
	utils::parse_date_to_timestamp,
};

use crate::integration::mocks::FakeLedger;

const CONTRACT: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";
const KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
const FARMER: &str = "0xabcabcabcabcabcabcabcabcabcabcabcabcabca";
const BUYER: &str = "0xdefdefdefdefdefdefdefdefdefdefdefdefdef0";

fn settings() -> LedgerSettings {
	LedgerSettings::new("http://localhost:8545", CONTRACT, KEY)
}

fn contract_address() -> Address {
	CONTRACT.parse().unwrap()
}

fn setup() -> (Arc<FakeLedger>, ForwardContractService<FakeLedger>) {
	let ledger = Arc::new(FakeLedger::new(contract_address()));
	let service = ForwardContractService::new(settings(), ledger.clone());
	(ledger, service)
}

async fn create_soybean(service: &ForwardContractService<FakeLedger>) -> U256 {
	let delivery = parse_date_to_timestamp("2025-06-01").unwrap();
	let result = service
		.create_contract(
			"Soybean",
			U256::from(100u64),
			U256::from(5000u64),
			delivery,
			FARMER,
		)
		.await
		.unwrap();
	result.contract_id.unwrap()
}

#[tokio::test]
async fn test_create_then_sign_scenario() {
	let (_ledger, service) = setup();
	assert!(service.is_configured().await);

	let delivery = parse_date_to_timestamp("2025-06-01").unwrap();
	let created = service
		.create_contract(
			"Soybean",
			U256::from(100u64),
			U256::from(5000u64),
			delivery,
			FARMER,
		)
		.await
		.unwrap();
	assert!(created.success);
	assert_eq!(created.contract_id, Some(U256::from(1u64)));

	let view = service.get_contract_details(U256::from(1u64)).await.unwrap();
	assert_eq!(view.status, ContractStatus::WaitingForBuyer);
	assert_eq!(view.delivery_date.as_deref(), Some("2025-06-01"));
	assert_eq!(view.total_value, U512::from(500_000u64));

	let signed = service
		.sign_contract(U256::from(1u64), BUYER)
		.await
		.unwrap();
	assert!(signed.success);
	assert_eq!(signed.contract_id, U256::from(1u64));

	let view = service.get_contract_details(U256::from(1u64)).await.unwrap();
	assert_eq!(view.status, ContractStatus::SignedByBoth);
	assert!(view.farmer_signed);
	assert!(view.buyer_signed);
	assert!(!view.settled);
	assert_eq!(view.commodity, "Soybean");
	assert_eq!(view.quantity, U256::from(100u64));
	assert_eq!(view.price_per_unit, U256::from(5000u64));

	assert_eq!(view.events.len(), 2);
	assert!(matches!(view.events[0].event, ContractEvent::Created(_)));
	assert!(matches!(view.events[1].event, ContractEvent::Signed(_)));
}

#[tokio::test]
async fn test_settled_contract_reports_settled() {
	let (ledger, service) = setup();
	let id = create_soybean(&service).await;
	service.sign_contract(id, BUYER).await.unwrap();
	ledger.settle(1);

	let view = service.get_contract_details(id).await.unwrap();
	assert_eq!(view.status, ContractStatus::Settled);
	assert!(view.status.is_terminal());
}

#[tokio::test]
async fn test_counterparty_is_not_the_signing_account() {
	let (_ledger, service) = setup();
	let farmer = "0x90f79bf6eb2c4f870365e785982e1f101e93b906";
	let result = service
		.create_contract("Sunflower", U256::from(10u64), U256::from(7000u64), 0, farmer)
		.await
		.unwrap();

	assert_eq!(result.farmer_address, farmer.parse::<Address>().unwrap());
	let view = service
		.get_contract_details(result.contract_id.unwrap())
		.await
		.unwrap();
	// The program records the signing account
	assert_ne!(view.farmer_address, result.farmer_address);
}

#[tokio::test]
async fn test_signing_twice_is_ledger_revert() {
	let (_ledger, service) = setup();
	let id = create_soybean(&service).await;
	service.sign_contract(id, BUYER).await.unwrap();

	let error = service.sign_contract(id, BUYER).await.unwrap_err();
	assert!(matches!(error, ForwardContractError::LedgerRevert(_)));
	assert_eq!(error.category(), ErrorCategory::Input);
}

#[tokio::test]
async fn test_signing_unknown_contract_is_ledger_revert() {
	let (_ledger, service) = setup();
	let result = service.sign_contract(U256::from(42u64), BUYER).await;
	assert!(matches!(result, Err(ForwardContractError::LedgerRevert(_))));
}

#[tokio::test]
async fn test_unknown_contract_is_not_found() {
	let (_ledger, service) = setup();
	create_soybean(&service).await;

	let result = service.get_contract_details(U256::from(2u64)).await;
	assert!(matches!(result, Err(ForwardContractError::NotFound(_))));
}

#[tokio::test]
async fn test_totals_and_farmer_contracts() {
	let (_ledger, service) = setup();
	assert_eq!(service.total_contracts().await.unwrap(), U256::ZERO);

	create_soybean(&service).await;
	create_soybean(&service).await;
	assert_eq!(service.total_contracts().await.unwrap(), U256::from(2u64));

	// The program files contracts under the signing account
	let signer = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266";
	assert_eq!(
		service.farmer_contracts(signer).await.unwrap(),
		vec![U256::from(1u64), U256::from(2u64)]
	);
	assert!(service
		.farmer_contracts(FARMER)
		.await
		.unwrap()
		.is_empty());
}

#[tokio::test]
async fn test_unconfigured_service_never_reaches_the_ledger() {
	for (address, key) in [("", KEY), (CONTRACT, ""), ("0x1234", KEY)] {
		let ledger = Arc::new(FakeLedger::new(contract_address()));
		let service = ForwardContractService::new(
			LedgerSettings::new("http://localhost:8545", address, key),
			ledger.clone(),
		);

		let result = service
			.create_contract("Soybean", U256::from(100u64), U256::from(5000u64), 0, FARMER)
			.await;
		assert!(matches!(result, Err(ForwardContractError::NotConfigured(_))));
		assert_eq!(service.total_contracts().await.unwrap(), U256::ZERO);
		assert!(!service.is_configured().await);
		assert_eq!(ledger.calls(), 0, "settings ({:?}, key set: {})", address, !key.is_empty());
	}
}

#[tokio::test]
async fn test_unreachable_node_fails_gate() {
	let (ledger, service) = setup();
	ledger.set_connected(false);

	assert!(!service.is_configured().await);
	let error = service
		.create_contract("Soybean", U256::from(1u64), U256::from(1u64), 0, FARMER)
		.await
		.unwrap_err();
	assert!(matches!(error, ForwardContractError::Unreachable(_)));
	assert_eq!(error.category(), ErrorCategory::Transient);
	assert!(ledger.accepted_nonces().is_empty());

	ledger.set_connected(true);
	assert!(service.is_configured().await);
}

#[tokio::test]
async fn test_unconfirmed_submission_reports_unknown_outcome() {
	let (ledger, service) = setup();
	ledger.set_mining(false);

	let error = service
		.create_contract("Soybean", U256::from(1u64), U256::from(1u64), 0, FARMER)
		.await
		.unwrap_err();
	assert_eq!(error.category(), ErrorCategory::OutcomeUnknown);
	assert!(error.pending_transaction().is_some());
	// The transaction was accepted, a retry would create a second contract
	assert_eq!(ledger.accepted_nonces(), vec![0]);
}

#[tokio::test]
async fn test_status_report() {
	let (_ledger, service) = setup();
	create_soybean(&service).await;

	let status = service.status().await;
	assert!(status.configured);
	assert!(status.connected);
	assert_eq!(status.total_contracts, U256::from(1u64));
	assert_eq!(status.contract_address.as_deref(), Some(CONTRACT));
	assert_eq!(status.rpc_url, "http://localhost:8545");
}
