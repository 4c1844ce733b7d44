//! Blockchain error types and handling.
//!
//! Errors raised while talking to the ledger node: connectivity, malformed requests or
//! responses, program reverts reported by the node, and receipt wait timeouts.

use std::collections::HashMap;

use thiserror::Error as ThisError;

use crate::utils::{BoxedSource, ErrorContext, TraceableError};

/// Represents possible errors that can occur during blockchain operations
#[derive(ThisError, Debug)]
pub enum BlockChainError {
	/// Errors related to network connectivity issues
	#[error("Connection error: {0}")]
	ConnectionError(Box<ErrorContext>),

	/// Errors related to malformed requests, invalid responses or JSON-RPC failures
	#[error("Request error: {0}")]
	RequestError(Box<ErrorContext>),

	/// The node reported that the program reverted the call
	#[error("Execution reverted: {0}")]
	ExecutionReverted(Box<ErrorContext>),

	/// No receipt was observed before the wait bound elapsed
	#[error("Receipt timeout: {0}")]
	ReceiptTimeout(Box<ErrorContext>),

	/// Internal errors within the blockchain client
	#[error("Internal error: {0}")]
	InternalError(Box<ErrorContext>),
}

impl BlockChainError {
	/// Creates a new connection error with logging
	pub fn connection_error(
		msg: impl Into<String>,
		source: Option<BoxedSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::ConnectionError(Box::new(ErrorContext::new_with_log(msg, source, metadata)))
	}

	/// Creates a new request error with logging
	pub fn request_error(
		msg: impl Into<String>,
		source: Option<BoxedSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::RequestError(Box::new(ErrorContext::new_with_log(msg, source, metadata)))
	}

	/// Creates a new execution reverted error with logging
	pub fn execution_reverted(
		msg: impl Into<String>,
		source: Option<BoxedSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::ExecutionReverted(Box::new(ErrorContext::new_with_log(msg, source, metadata)))
	}

	/// Creates a new receipt timeout error with logging
	pub fn receipt_timeout(
		msg: impl Into<String>,
		source: Option<BoxedSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::ReceiptTimeout(Box::new(ErrorContext::new_with_log(msg, source, metadata)))
	}

	/// Creates a new internal error with logging
	pub fn internal_error(
		msg: impl Into<String>,
		source: Option<BoxedSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::InternalError(Box::new(ErrorContext::new_with_log(msg, source, metadata)))
	}

	/// The wrapped error context
	pub fn context(&self) -> &ErrorContext {
		match self {
			Self::ConnectionError(ctx) => ctx,
			Self::RequestError(ctx) => ctx,
			Self::ExecutionReverted(ctx) => ctx,
			Self::ReceiptTimeout(ctx) => ctx,
			Self::InternalError(ctx) => ctx,
		}
	}
}

impl TraceableError for BlockChainError {
	fn trace_id(&self) -> String {
		self.context().trace_id.clone()
	}
}
