//! Error handling utilities for the application.
//!
//! This module provides a structured approach to error handling with context and metadata.
//! The primary type is [`ErrorContext`], which wraps errors with additional information
//! such as timestamps, trace IDs, and custom metadata.
//!
//! # Examples
//!
//! ```
//! use oilseed_ledger::utils::ErrorContext;
//!
//! let error = ErrorContext::new("Failed to reach ledger node", None, None)
//! 	.with_metadata("rpc_url", "http://localhost:8545")
//! 	.with_metadata("method", "net_version");
//!
//! assert_eq!(
//! 	error.format_with_metadata(),
//! 	"Failed to reach ledger node [method=net_version, rpc_url=http://localhost:8545]"
//! );
//! ```

use chrono::Utc;
use std::{collections::HashMap, fmt};
use uuid::Uuid;

/// Boxed error type used as the source of an [`ErrorContext`].
pub type BoxedSource = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A context wrapper for errors with additional metadata.
///
/// Each error context includes:
///
/// - A descriptive message
/// - An optional source error
/// - Optional key-value metadata
/// - A timestamp (automatically generated)
/// - A unique trace ID (automatically generated, or inherited from the source)
#[derive(Debug)]
pub struct ErrorContext {
	/// The error message
	pub message: String,
	/// The source error that caused this error
	pub source: Option<BoxedSource>,
	/// Additional metadata about the error
	pub metadata: Option<HashMap<String, String>>,
	/// The timestamp of the error in RFC 3339 format
	pub timestamp: String,
	/// The unique identifier for the error (UUID v4)
	pub trace_id: String,
}

impl ErrorContext {
	/// Creates a new error context with the given message, source, and metadata.
	///
	/// If the source is itself a [`TraceableError`], its trace id is carried over so
	/// that an error can be followed across layers in the logs.
	pub fn new(
		message: impl Into<String>,
		source: Option<BoxedSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		let trace_id = source
			.as_deref()
			.and_then(find_trace_id)
			.unwrap_or_else(|| Uuid::new_v4().to_string());

		Self {
			message: message.into(),
			source,
			metadata,
			timestamp: Utc::now().to_rfc3339(),
			trace_id,
		}
	}

	/// Creates a new error context and logs it at error level.
	pub fn new_with_log(
		message: impl Into<String>,
		source: Option<BoxedSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		let context = Self::new(message, source, metadata);
		tracing::error!(
			trace_id = %context.trace_id,
			timestamp = %context.timestamp,
			"{}",
			context.format_with_metadata()
		);
		context
	}

	/// Adds a single key-value metadata pair to the error context.
	pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		let metadata = self.metadata.get_or_insert_with(HashMap::new);
		metadata.insert(key.into(), value.into());
		self
	}

	/// Formats the error message with its metadata appended in a readable format.
	///
	/// The format is: `"message [key1=value1, key2=value2, ...]"`.
	/// Metadata keys are sorted alphabetically for consistent output.
	pub fn format_with_metadata(&self) -> String {
		let mut result = self.message.clone();

		if let Some(metadata) = &self.metadata {
			if !metadata.is_empty() {
				let mut keys: Vec<_> = metadata.keys().collect();
				keys.sort();

				let parts: Vec<String> = keys
					.into_iter()
					.filter_map(|key| metadata.get(key).map(|value| format!("{}={}", key, value)))
					.collect();

				if !parts.is_empty() {
					result.push_str(&format!(" [{}]", parts.join(", ")));
				}
			}
		}

		result
	}
}

impl fmt::Display for ErrorContext {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.format_with_metadata())?;
		if let Some(source) = &self.source {
			write!(f, " ({})", source)?;
		}
		Ok(())
	}
}

impl std::error::Error for ErrorContext {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		self.source
			.as_deref()
			.map(|source| source as &(dyn std::error::Error + 'static))
	}
}

/// Errors that carry a trace id which survives wrapping by higher layers.
pub trait TraceableError: std::error::Error + Send + Sync {
	/// Returns the trace id of the underlying [`ErrorContext`].
	fn trace_id(&self) -> String;
}

fn find_trace_id(source: &(dyn std::error::Error + Send + Sync + 'static)) -> Option<String> {
	if let Some(context) = source.downcast_ref::<ErrorContext>() {
		return Some(context.trace_id.clone());
	}
	if let Some(err) = source.downcast_ref::<crate::services::blockchain::BlockChainError>() {
		return Some(err.trace_id());
	}
	if let Some(err) = source.downcast_ref::<crate::models::ConfigError>() {
		return Some(err.trace_id());
	}
	None
}

/// Formats the complete error chain of an `anyhow` error, one cause per line.
pub fn format_error_chain(err: &anyhow::Error) -> String {
	let mut result = err.to_string();
	let mut source = err.source();

	while let Some(err) = source {
		result.push_str(&format!("\n  Caused by: {}", err));
		source = err.source();
	}

	result
}
