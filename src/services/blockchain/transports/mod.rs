//! Network transport for the ledger node.
//!
//! - `http`: JSON-RPC over HTTP using `reqwest`

mod http;

pub use http::HttpTransportClient;

use async_trait::async_trait;
use serde_json::Value;

use crate::services::blockchain::BlockChainError;

/// Sends raw JSON-RPC requests to a ledger node
///
/// Implementations return the complete JSON-RPC response object; interpreting its
/// `result` or `error` member is left to the client.
#[async_trait]
pub trait BlockchainTransport: Send + Sync {
	/// Returns the endpoint requests are sent to
	async fn get_current_url(&self) -> String;

	/// Sends a JSON-RPC request
	///
	/// # Arguments
	/// * `method` - The JSON-RPC method to call
	/// * `params` - The positional parameters, as a JSON array
	async fn send_raw_request(&self, method: &str, params: Value)
		-> Result<Value, BlockChainError>;
}
