use std::time::Duration;

use alloy::primitives::{Address, Bytes, B256};
use mockall::predicate;
use serde_json::{json, Value};

use oilseed_ledger::{
	models::LogQuery,
	services::blockchain::{BlockChainError, EvmLedgerClient, LedgerClient},
};

use crate::integration::mocks::{rpc_error, rpc_result, MockLedgerTransport};

fn client(transport: MockLedgerTransport) -> EvmLedgerClient<MockLedgerTransport> {
	EvmLedgerClient::new_with_transport(
		transport,
		Duration::from_millis(200),
		Duration::from_millis(10),
	)
}

fn receipt_json(hash: B256, status: &str) -> Value {
	json!({
		"transactionHash": hash,
		"blockNumber": "0x1b4",
		"gasUsed": "0x2bf20",
		"status": status,
		"logs": [{
			"address": Address::repeat_byte(0xcc),
			"topics": [B256::repeat_byte(0x01), B256::with_last_byte(1)],
			"data": "0x",
			"blockNumber": "0x1b4",
			"transactionHash": hash,
			"logIndex": "0x0"
		}]
	})
}

#[tokio::test]
async fn test_transaction_count_counts_pending() {
	let account = Address::repeat_byte(0x11);
	let mut transport = MockLedgerTransport::new();
	transport
		.expect_send_raw_request()
		.withf(move |method, params| {
			method == "eth_getTransactionCount" && *params == json!([account, "pending"])
		})
		.times(1)
		.returning(|_, _| Ok(rpc_result(json!("0x1f"))));

	let count = client(transport).get_transaction_count(account).await.unwrap();
	assert_eq!(count, 31);
}

#[tokio::test]
async fn test_gas_price_and_chain_id() {
	let mut transport = MockLedgerTransport::new();
	transport
		.expect_send_raw_request()
		.with(predicate::eq("eth_gasPrice"), predicate::always())
		.returning(|_, _| Ok(rpc_result(json!("0x6fc23ac00"))));
	transport
		.expect_send_raw_request()
		.with(predicate::eq("eth_chainId"), predicate::always())
		.returning(|_, _| Ok(rpc_result(json!("0x13881"))));

	let client = client(transport);
	assert_eq!(client.get_gas_price().await.unwrap(), 30_000_000_000);
	assert_eq!(client.get_chain_id().await.unwrap(), 80_001);
}

#[tokio::test]
async fn test_malformed_quantity_is_request_error() {
	let mut transport = MockLedgerTransport::new();
	transport
		.expect_send_raw_request()
		.returning(|_, _| Ok(rpc_result(json!(12))));

	let result = client(transport).get_gas_price().await;
	assert!(matches!(result, Err(BlockChainError::RequestError(_))));
}

#[tokio::test]
async fn test_send_raw_transaction_returns_hash() {
	let hash = B256::repeat_byte(0xab);
	let mut transport = MockLedgerTransport::new();
	transport
		.expect_send_raw_request()
		.withf(|method, params| method == "eth_sendRawTransaction" && *params == json!(["0x0102"]))
		.returning(move |_, _| Ok(rpc_result(json!(hash))));

	let result = client(transport)
		.send_raw_transaction(Bytes::from_static(&[1, 2]))
		.await
		.unwrap();
	assert_eq!(result, hash);
}

#[tokio::test]
async fn test_revert_and_rejection_are_told_apart() {
	let mut transport = MockLedgerTransport::new();
	let mut responses = vec![
		rpc_error(3, "execution reverted: contract already signed"),
		rpc_error(-32000, "nonce too low"),
	]
	.into_iter();
	transport
		.expect_send_raw_request()
		.times(2)
		.returning(move |_, _| Ok(responses.next().unwrap()));

	let client = client(transport);
	let reverted = client.send_raw_transaction(Bytes::new()).await;
	assert!(matches!(reverted, Err(BlockChainError::ExecutionReverted(_))));

	let rejected = client.send_raw_transaction(Bytes::new()).await;
	match rejected {
		Err(e @ BlockChainError::RequestError(_)) => {
			assert!(e.to_string().contains("nonce too low"));
		}
		other => panic!("Expected request error, got {:?}", other),
	}
}

#[tokio::test]
async fn test_wait_for_receipt_polls_until_mined() {
	let hash = B256::repeat_byte(0x42);
	let mut transport = MockLedgerTransport::new();
	let mut responses = vec![
		rpc_result(Value::Null),
		rpc_result(json!({ "transactionHash": hash, "blockNumber": null, "gasUsed": "0x0" })),
		rpc_result(receipt_json(hash, "0x1")),
	]
	.into_iter();
	transport
		.expect_send_raw_request()
		.with(
			predicate::eq("eth_getTransactionReceipt"),
			predicate::eq(json!([hash])),
		)
		.times(3)
		.returning(move |_, _| Ok(responses.next().unwrap()));

	let receipt = client(transport).wait_for_receipt(hash).await.unwrap();
	assert_eq!(receipt.transaction_hash, hash);
	assert_eq!(receipt.block_number, 436);
	assert_eq!(receipt.gas_used, 180_000);
	assert!(receipt.success);
	assert_eq!(receipt.logs.len(), 1);
	assert_eq!(receipt.logs[0].address(), Address::repeat_byte(0xcc));
	assert_eq!(receipt.logs[0].log_index, Some(0));
}

#[tokio::test]
async fn test_wait_for_receipt_reports_revert_status() {
	let hash = B256::repeat_byte(0x43);
	let mut transport = MockLedgerTransport::new();
	transport
		.expect_send_raw_request()
		.returning(move |_, _| Ok(rpc_result(receipt_json(hash, "0x0"))));

	let receipt = client(transport).wait_for_receipt(hash).await.unwrap();
	assert!(!receipt.success);
}

#[tokio::test]
async fn test_wait_for_receipt_survives_lookup_errors() {
	let hash = B256::repeat_byte(0x44);
	let mut transport = MockLedgerTransport::new();
	let mut failed = false;
	transport.expect_send_raw_request().returning(move |_, _| {
		if !failed {
			failed = true;
			return Err(BlockChainError::connection_error("connection reset", None, None));
		}
		Ok(rpc_result(receipt_json(hash, "0x1")))
	});

	let receipt = client(transport).wait_for_receipt(hash).await.unwrap();
	assert_eq!(receipt.transaction_hash, hash);
}

#[tokio::test]
async fn test_wait_for_receipt_times_out() {
	let mut transport = MockLedgerTransport::new();
	transport
		.expect_send_raw_request()
		.returning(|_, _| Ok(rpc_result(Value::Null)));

	let client = EvmLedgerClient::new_with_transport(
		transport,
		Duration::from_millis(50),
		Duration::from_millis(5),
	);
	let result = client.wait_for_receipt(B256::repeat_byte(0x45)).await;
	assert!(matches!(result, Err(BlockChainError::ReceiptTimeout(_))));
}

#[tokio::test]
async fn test_call_returns_data() {
	let to = Address::repeat_byte(0xcc);
	let mut transport = MockLedgerTransport::new();
	transport
		.expect_send_raw_request()
		.withf(move |method, params| {
			method == "eth_call" && *params == json!([{ "to": to, "data": "0xdeadbeef" }, "latest"])
		})
		.returning(|_, _| Ok(rpc_result(json!("0x0000000a"))));

	let data = client(transport)
		.call(to, Bytes::from_static(&[0xde, 0xad, 0xbe, 0xef]))
		.await
		.unwrap();
	assert_eq!(data, Bytes::from_static(&[0, 0, 0, 0x0a]));
}

#[tokio::test]
async fn test_get_logs_builds_filter() {
	let address = Address::repeat_byte(0xcc);
	let signature = B256::repeat_byte(0x01);
	let id = B256::with_last_byte(7);
	let mut transport = MockLedgerTransport::new();
	transport
		.expect_send_raw_request()
		.withf(move |method, params| {
			method == "eth_getLogs"
				&& *params
					== json!([{
						"address": address,
						"topics": [signature, id],
						"fromBlock": "earliest",
						"toBlock": "latest",
					}])
		})
		.returning(move |_, _| {
			Ok(rpc_result(json!([{
				"address": address,
				"topics": [signature, id],
				"data": "0x",
				"blockNumber": "0x10",
				"transactionHash": B256::repeat_byte(0x09),
				"logIndex": "0x2"
			}])))
		});

	let logs = client(transport)
		.get_logs(LogQuery {
			address,
			topics: vec![vec![signature], vec![id]],
			from_block: None,
		})
		.await
		.unwrap();
	assert_eq!(logs.len(), 1);
	assert_eq!(logs[0].block_number, Some(16));
	assert_eq!(logs[0].log_index, Some(2));
}

#[tokio::test]
async fn test_is_connected_never_fails() {
	let mut transport = MockLedgerTransport::new();
	let mut responses = vec![
		Ok(rpc_result(json!("80001"))),
		Err(BlockChainError::connection_error("refused", None, None)),
		Ok(rpc_error(-32601, "method not found")),
	]
	.into_iter();
	transport
		.expect_send_raw_request()
		.with(predicate::eq("net_version"), predicate::always())
		.times(3)
		.returning(move |_, _| responses.next().unwrap());

	let client = client(transport);
	assert!(client.is_connected().await);
	assert!(!client.is_connected().await);
	assert!(!client.is_connected().await);
}
