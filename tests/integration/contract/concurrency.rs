use std::{collections::HashSet, sync::Arc};

use alloy::primitives::U256;
use futures::future::join_all;

use oilseed_ledger::{models::LedgerSettings, services::contract::ForwardContractService};

use crate::integration::mocks::FakeLedger;

const CONTRACT: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";
const KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
const FARMER: &str = "0x70997970c51812dc3a010c7d01b50e0d17dc79c8";

fn setup() -> (Arc<FakeLedger>, Arc<ForwardContractService<FakeLedger>>) {
	let ledger = Arc::new(FakeLedger::new(CONTRACT.parse().unwrap()));
	let service = Arc::new(ForwardContractService::new(
		LedgerSettings::new("http://localhost:8545", CONTRACT, KEY),
		ledger.clone(),
	));
	(ledger, service)
}

#[tokio::test]
async fn test_concurrent_creates_get_distinct_nonces() {
	let (ledger, service) = setup();

	let (first, second) = tokio::join!(
		service.create_contract("Soybean", U256::from(100u64), U256::from(5000u64), 0, FARMER),
		service.create_contract("Mustard", U256::from(80u64), U256::from(6200u64), 0, FARMER),
	);

	let first = first.unwrap();
	let second = second.unwrap();
	assert_ne!(first.transaction_hash, second.transaction_hash);
	assert_ne!(first.contract_id, second.contract_id);
	assert_eq!(ledger.accepted_nonces(), vec![0, 1]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_many_concurrent_submissions_across_threads() {
	let (ledger, service) = setup();

	let tasks = (0..8u64).map(|i| {
		let service = service.clone();
		tokio::spawn(async move {
			service
				.create_contract("Groundnut", U256::from(i + 1), U256::from(5500u64), 0, FARMER)
				.await
		})
	});
	let results = join_all(tasks).await;

	let ids: HashSet<U256> = results
		.into_iter()
		.map(|joined| joined.unwrap().unwrap().contract_id.unwrap())
		.collect();
	assert_eq!(ids.len(), 8);

	let mut nonces = ledger.accepted_nonces();
	nonces.sort_unstable();
	assert_eq!(nonces, (0..8).collect::<Vec<u64>>());
	assert_eq!(service.total_contracts().await.unwrap(), U256::from(8u64));
}

#[tokio::test]
async fn test_reads_run_alongside_writes() {
	let (_ledger, service) = setup();
	service
		.create_contract("Soybean", U256::from(1u64), U256::from(1u64), 0, FARMER)
		.await
		.unwrap();

	let (created, details) = tokio::join!(
		service.create_contract("Soybean", U256::from(2u64), U256::from(1u64), 0, FARMER),
		service.get_contract_details(U256::from(1u64)),
	);
	assert_eq!(created.unwrap().contract_id, Some(U256::from(2u64)));
	assert_eq!(details.unwrap().quantity, U256::from(1u64));
}
