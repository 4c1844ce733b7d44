//! HTTP transport implementation for EVM JSON-RPC nodes.
//!
//! Holds a single pooled `reqwest` client bound to the configured endpoint. Requests are
//! sent once; retrying is left to callers.

use std::{
	collections::HashMap,
	sync::{
		atomic::{AtomicU64, Ordering},
		Arc,
	},
	time::Duration,
};

use async_trait::async_trait;
use serde_json::{json, Value};
use url::Url;

use crate::services::blockchain::{transports::BlockchainTransport, BlockChainError};

/// A client for sending JSON-RPC requests to a ledger node over HTTP
#[derive(Clone, Debug)]
pub struct HttpTransportClient {
	/// Pooled HTTP client
	client: reqwest::Client,
	/// Endpoint of the node
	url: Url,
	/// Source of JSON-RPC request ids
	next_id: Arc<AtomicU64>,
}

impl HttpTransportClient {
	/// Creates a new transport for the given endpoint
	///
	/// No request is sent; an unreachable node is only detected on first use.
	///
	/// # Arguments
	/// * `rpc_url` - HTTP(S) endpoint of the node
	/// * `request_timeout` - Upper bound on a single request
	///
	/// # Returns
	/// * `Result<Self, BlockChainError>` - A new client instance or a connection error for
	///   an invalid URL
	pub fn new(rpc_url: &str, request_timeout: Duration) -> Result<Self, BlockChainError> {
		let metadata = HashMap::from([("rpc_url".to_string(), rpc_url.to_string())]);

		let url = Url::parse(rpc_url).map_err(|e| {
			BlockChainError::connection_error(
				"Invalid URL",
				Some(Box::new(e)),
				Some(metadata.clone()),
			)
		})?;

		if !matches!(url.scheme(), "http" | "https") {
			return Err(BlockChainError::connection_error(
				format!("Unsupported URL scheme '{}'", url.scheme()),
				None,
				Some(metadata),
			));
		}

		let client = reqwest::Client::builder()
			.timeout(request_timeout)
			.build()
			.map_err(|e| {
				BlockChainError::internal_error(
					"Failed to create HTTP client",
					Some(Box::new(e)),
					Some(metadata),
				)
			})?;

		Ok(Self {
			client,
			url,
			next_id: Arc::new(AtomicU64::new(0)),
		})
	}
}

#[async_trait]
impl BlockchainTransport for HttpTransportClient {
	async fn get_current_url(&self) -> String {
		self.url.to_string()
	}

	async fn send_raw_request(
		&self,
		method: &str,
		params: Value,
	) -> Result<Value, BlockChainError> {
		let id = self.next_id.fetch_add(1, Ordering::Relaxed);
		let request_body = json!({
			"jsonrpc": "2.0",
			"id": id,
			"method": method,
			"params": params,
		});
		let metadata = HashMap::from([
			("method".to_string(), method.to_string()),
			("rpc_url".to_string(), self.url.to_string()),
		]);

		let response = self
			.client
			.post(self.url.clone())
			.header("Content-Type", "application/json")
			.json(&request_body)
			.send()
			.await
			.map_err(|e| {
				if e.is_connect() || e.is_timeout() {
					BlockChainError::connection_error(
						"Failed to reach ledger node",
						Some(Box::new(e)),
						Some(metadata.clone()),
					)
				} else {
					BlockChainError::request_error(
						"Failed to send request",
						Some(Box::new(e)),
						Some(metadata.clone()),
					)
				}
			})?;

		let status = response.status();
		if !status.is_success() {
			let error_body = response.text().await.unwrap_or_default();
			return Err(BlockChainError::request_error(
				format!("HTTP error {}: {}", status, error_body),
				None,
				Some(metadata),
			));
		}

		response.json::<Value>().await.map_err(|e| {
			BlockChainError::request_error(
				"Failed to parse JSON-RPC response",
				Some(Box::new(e)),
				Some(metadata),
			)
		})
	}
}
