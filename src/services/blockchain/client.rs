//! EVM ledger client implementation.
//!
//! This module provides the adapter between the forward contract service and an
//! EVM-compatible node: account and fee queries, raw transaction submission, receipt
//! polling, read-only calls and log queries, all over JSON-RPC.

use std::{collections::HashMap, time::Duration};

use alloy::primitives::{Address, Bytes, Log, B256, U64};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::{
	models::{LedgerLog, LedgerReceipt, LedgerSettings, LogQuery},
	services::blockchain::{
		transports::{BlockchainTransport, HttpTransportClient},
		BlockChainError,
	},
	utils::{parse_hex_u128, parse_hex_u64},
};

/// JSON-RPC error code used by nodes for reverted calls
const EXECUTION_REVERTED_CODE: i64 = 3;

/// Operations the forward contract service needs from a ledger node
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LedgerClient: Send + Sync {
	/// Liveness probe; never fails, reports `false` instead
	async fn is_connected(&self) -> bool;

	/// Chain id used for replay protected signatures
	async fn get_chain_id(&self) -> Result<u64, BlockChainError>;

	/// Next usable nonce of `account`, counting pending transactions
	async fn get_transaction_count(&self, account: Address) -> Result<u64, BlockChainError>;

	/// Current gas price estimate of the node, in wei
	async fn get_gas_price(&self) -> Result<u128, BlockChainError>;

	/// Broadcasts a signed transaction and returns its hash
	async fn send_raw_transaction(&self, raw_transaction: Bytes) -> Result<B256, BlockChainError>;

	/// Waits until the transaction is mined
	///
	/// # Errors
	/// - `BlockChainError::ReceiptTimeout` if no receipt shows up within the wait bound
	async fn wait_for_receipt(&self, transaction_hash: B256)
		-> Result<LedgerReceipt, BlockChainError>;

	/// Executes a read-only call against the latest block
	async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, BlockChainError>;

	/// Retrieves logs matching the query
	async fn get_logs(&self, query: LogQuery) -> Result<Vec<LedgerLog>, BlockChainError>;
}

/// Client implementation for EVM compatible ledger nodes
///
/// Generic over the transport so tests can substitute a mock for the HTTP client.
#[derive(Clone)]
pub struct EvmLedgerClient<T> {
	/// The underlying transport for RPC communication
	transport: T,
	/// Upper bound on waiting for a receipt
	receipt_timeout: Duration,
	/// Delay between two receipt lookups
	receipt_poll_interval: Duration,
}

impl<T> EvmLedgerClient<T> {
	/// Creates a new client with a specific transport
	pub fn new_with_transport(
		transport: T,
		receipt_timeout: Duration,
		receipt_poll_interval: Duration,
	) -> Self {
		Self {
			transport,
			receipt_timeout,
			receipt_poll_interval,
		}
	}
}

impl EvmLedgerClient<HttpTransportClient> {
	/// Creates a new client over HTTP from the ledger settings
	///
	/// # Errors
	/// - `BlockChainError::ConnectionError` if the RPC URL is invalid
	pub fn new(settings: &LedgerSettings) -> Result<Self, BlockChainError> {
		let transport = HttpTransportClient::new(&settings.rpc_url, settings.request_timeout)?;
		Ok(Self::new_with_transport(
			transport,
			settings.receipt_timeout,
			settings.receipt_poll_interval,
		))
	}
}

/// Subset of an `eth_getTransactionReceipt` result used by the service
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RpcReceipt {
	transaction_hash: B256,
	block_number: Option<U64>,
	gas_used: U64,
	/// Absent on pre-Byzantium receipts
	status: Option<U64>,
	#[serde(default)]
	logs: Vec<RpcLog>,
}

/// Subset of a JSON-RPC log object
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RpcLog {
	address: Address,
	topics: Vec<B256>,
	data: Bytes,
	block_number: Option<U64>,
	transaction_hash: Option<B256>,
	log_index: Option<U64>,
}

impl From<RpcLog> for LedgerLog {
	fn from(log: RpcLog) -> Self {
		Self {
			inner: Log::new_unchecked(log.address, log.topics, log.data),
			block_number: log.block_number.map(|n| n.to::<u64>()),
			transaction_hash: log.transaction_hash,
			log_index: log.log_index.map(|n| n.to::<u64>()),
		}
	}
}

impl<T: BlockchainTransport> EvmLedgerClient<T> {
	/// Sends a request and extracts its `result` member
	///
	/// JSON-RPC error objects are mapped to `ExecutionReverted` when the node reports a
	/// revert and to `RequestError` otherwise.
	async fn request(
		&self,
		method: &str,
		params: Value,
		mut context: HashMap<String, String>,
	) -> Result<Value, BlockChainError> {
		context.insert("method".to_string(), method.to_string());

		let mut response = self
			.transport
			.send_raw_request(method, params)
			.await
			.map_err(|e| match e {
				BlockChainError::ConnectionError(_) => BlockChainError::connection_error(
					format!("Failed to send {}", method),
					Some(Box::new(e)),
					Some(context.clone()),
				),
				_ => BlockChainError::request_error(
					format!("Failed to send {}", method),
					Some(Box::new(e)),
					Some(context.clone()),
				),
			})?;

		if let Some(error) = response.get("error").filter(|error| !error.is_null()) {
			let code = error.get("code").and_then(Value::as_i64);
			let message = error
				.get("message")
				.and_then(Value::as_str)
				.unwrap_or("unknown error")
				.to_string();

			if let Some(code) = code {
				context.insert("code".to_string(), code.to_string());
			}
			if let Some(data) = error.get("data").filter(|data| !data.is_null()) {
				context.insert("data".to_string(), data.to_string());
			}

			if is_revert(code, &message) {
				return Err(BlockChainError::execution_reverted(
					message,
					None,
					Some(context),
				));
			}
			return Err(BlockChainError::request_error(
				format!("JSON-RPC error: {}", message),
				None,
				Some(context),
			));
		}

		response
			.get_mut("result")
			.map(Value::take)
			.ok_or_else(|| {
				BlockChainError::request_error("Missing 'result' field", None, Some(context))
			})
	}

	/// Sends a request whose result is a hex encoded quantity
	async fn request_quantity(
		&self,
		method: &str,
		params: Value,
		context: HashMap<String, String>,
	) -> Result<String, BlockChainError> {
		let result = self.request(method, params, context.clone()).await?;
		result.as_str().map(str::to_string).ok_or_else(|| {
			BlockChainError::request_error(
				format!("Expected a hex quantity from {}, got {}", method, result),
				None,
				Some(context),
			)
		})
	}

	/// Looks up the receipt of a transaction once
	///
	/// # Returns
	/// * `Ok(None)` while the transaction is not mined
	pub async fn get_transaction_receipt(
		&self,
		transaction_hash: B256,
	) -> Result<Option<LedgerReceipt>, BlockChainError> {
		let context = HashMap::from([("hash".to_string(), transaction_hash.to_string())]);

		let receipt_data = self
			.request(
				"eth_getTransactionReceipt",
				json!([transaction_hash]),
				context.clone(),
			)
			.await?;

		// Handle null response case
		if receipt_data.is_null() {
			return Ok(None);
		}

		let receipt: RpcReceipt = serde_json::from_value(receipt_data).map_err(|e| {
			BlockChainError::request_error(
				"Failed to parse transaction receipt",
				Some(Box::new(e)),
				Some(context.clone()),
			)
		})?;

		// Receipts of pending blocks carry no block number yet
		let Some(block_number) = receipt.block_number else {
			return Ok(None);
		};

		Ok(Some(LedgerReceipt {
			transaction_hash: receipt.transaction_hash,
			block_number: block_number.to::<u64>(),
			gas_used: receipt.gas_used.to::<u64>(),
			success: receipt.status.map(|status| status == U64::from(1)).unwrap_or(true),
			logs: receipt.logs.into_iter().map(LedgerLog::from).collect(),
		}))
	}
}

fn is_revert(code: Option<i64>, message: &str) -> bool {
	code == Some(EXECUTION_REVERTED_CODE) || message.to_lowercase().contains("revert")
}

fn topics_param(topics: &[Vec<B256>]) -> Value {
	Value::Array(
		topics
			.iter()
			.map(|position| match position.as_slice() {
				[] => Value::Null,
				[single] => json!(single),
				many => json!(many),
			})
			.collect(),
	)
}

#[async_trait]
impl<T: BlockchainTransport> LedgerClient for EvmLedgerClient<T> {
	async fn is_connected(&self) -> bool {
		match self.transport.send_raw_request("net_version", json!([])).await {
			Ok(response) => {
				let alive = response.get("result").is_some_and(|result| !result.is_null());
				if !alive {
					debug!("Liveness probe returned no result: {}", response);
				}
				alive
			}
			Err(e) => {
				debug!("Liveness probe failed: {}", e);
				false
			}
		}
	}

	async fn get_chain_id(&self) -> Result<u64, BlockChainError> {
		let context = HashMap::new();
		let hex = self
			.request_quantity("eth_chainId", json!([]), context.clone())
			.await?;
		parse_hex_u64(&hex).map_err(|e| {
			BlockChainError::request_error(
				format!("Failed to parse chain id: {}", e),
				None,
				Some(context),
			)
		})
	}

	async fn get_transaction_count(&self, account: Address) -> Result<u64, BlockChainError> {
		let context = HashMap::from([("account".to_string(), account.to_string())]);
		let hex = self
			.request_quantity(
				"eth_getTransactionCount",
				json!([account, "pending"]),
				context.clone(),
			)
			.await?;
		parse_hex_u64(&hex).map_err(|e| {
			BlockChainError::request_error(
				format!("Failed to parse transaction count: {}", e),
				None,
				Some(context),
			)
		})
	}

	async fn get_gas_price(&self) -> Result<u128, BlockChainError> {
		let context = HashMap::new();
		let hex = self
			.request_quantity("eth_gasPrice", json!([]), context.clone())
			.await?;
		parse_hex_u128(&hex).map_err(|e| {
			BlockChainError::request_error(
				format!("Failed to parse gas price: {}", e),
				None,
				Some(context),
			)
		})
	}

	async fn send_raw_transaction(&self, raw_transaction: Bytes) -> Result<B256, BlockChainError> {
		let context = HashMap::from([(
			"size".to_string(),
			raw_transaction.len().to_string(),
		)]);
		let result = self
			.request(
				"eth_sendRawTransaction",
				json!([raw_transaction]),
				context.clone(),
			)
			.await?;
		serde_json::from_value(result).map_err(|e| {
			BlockChainError::request_error(
				"Failed to parse transaction hash",
				Some(Box::new(e)),
				Some(context),
			)
		})
	}

	async fn wait_for_receipt(
		&self,
		transaction_hash: B256,
	) -> Result<LedgerReceipt, BlockChainError> {
		let poll = async {
			loop {
				match self.get_transaction_receipt(transaction_hash).await {
					Ok(Some(receipt)) => return receipt,
					Ok(None) => debug!("Transaction {} not mined yet", transaction_hash),
					Err(e) => warn!(
						"Receipt lookup for {} failed, polling continues: {}",
						transaction_hash, e
					),
				}
				tokio::time::sleep(self.receipt_poll_interval).await;
			}
		};

		tokio::time::timeout(self.receipt_timeout, poll)
			.await
			.map_err(|_| {
				BlockChainError::receipt_timeout(
					format!(
						"No receipt for transaction {} within {:?}",
						transaction_hash, self.receipt_timeout
					),
					None,
					Some(HashMap::from([(
						"hash".to_string(),
						transaction_hash.to_string(),
					)])),
				)
			})
	}

	async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, BlockChainError> {
		let context = HashMap::from([("to".to_string(), to.to_string())]);
		let result = self
			.request(
				"eth_call",
				json!([{ "to": to, "data": data }, "latest"]),
				context.clone(),
			)
			.await?;
		serde_json::from_value(result).map_err(|e| {
			BlockChainError::request_error(
				"Failed to parse call result",
				Some(Box::new(e)),
				Some(context),
			)
		})
	}

	async fn get_logs(&self, query: LogQuery) -> Result<Vec<LedgerLog>, BlockChainError> {
		let from_block = query
			.from_block
			.map(|block| format!("0x{:x}", block))
			.unwrap_or_else(|| "earliest".to_string());
		let context = HashMap::from([
			("address".to_string(), query.address.to_string()),
			("from_block".to_string(), from_block.clone()),
		]);

		let result = self
			.request(
				"eth_getLogs",
				json!([{
					"address": query.address,
					"topics": topics_param(&query.topics),
					"fromBlock": from_block,
					"toBlock": "latest",
				}]),
				context.clone(),
			)
			.await?;

		let logs: Vec<RpcLog> = serde_json::from_value(result).map_err(|e| {
			BlockChainError::request_error(
				"Failed to parse logs",
				Some(Box::new(e)),
				Some(context),
			)
		})?;

		Ok(logs.into_iter().map(LedgerLog::from).collect())
	}
}
