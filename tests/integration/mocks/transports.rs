use mockall::mock;
use serde_json::{json, Value};

use oilseed_ledger::services::blockchain::{BlockChainError, BlockchainTransport};

// Mock implementation of a JSON-RPC transport.
// Used for testing the ledger client without a node.
// Returns complete JSON-RPC response objects, as the HTTP transport does.
mock! {
	pub LedgerTransport {}

	#[async_trait::async_trait]
	impl BlockchainTransport for LedgerTransport {
		async fn get_current_url(&self) -> String;
		async fn send_raw_request(&self, method: &str, params: Value) -> Result<Value, BlockChainError>;
	}
}

/// Wraps a result into a JSON-RPC success response
pub fn rpc_result(result: Value) -> Value {
	json!({ "jsonrpc": "2.0", "id": 0, "result": result })
}

/// Builds a JSON-RPC error response
pub fn rpc_error(code: i64, message: &str) -> Value {
	json!({
		"jsonrpc": "2.0",
		"id": 0,
		"error": { "code": code, "message": message }
	})
}
