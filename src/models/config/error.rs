//! Configuration error types.
//!
//! This module defines the error types that can occur during configuration
//! loading and validation.

use std::collections::HashMap;

use thiserror::Error as ThisError;

use crate::utils::{BoxedSource, ErrorContext, TraceableError};

/// Errors that can occur during configuration operations
#[derive(ThisError, Debug)]
#[allow(clippy::enum_variant_names)]
pub enum ConfigError {
	/// Configuration validation failed
	#[error("Validation error: {0}")]
	ValidationError(Box<ErrorContext>),

	/// Failed to parse a configuration value
	#[error("Parse error: {0}")]
	ParseError(Box<ErrorContext>),
}

impl ConfigError {
	/// Create a new validation error with logging
	pub fn validation_error(
		msg: impl Into<String>,
		source: Option<BoxedSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::ValidationError(Box::new(ErrorContext::new_with_log(msg, source, metadata)))
	}

	/// Create a new parse error with logging
	pub fn parse_error(
		msg: impl Into<String>,
		source: Option<BoxedSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::ParseError(Box::new(ErrorContext::new_with_log(msg, source, metadata)))
	}
}

impl TraceableError for ConfigError {
	fn trace_id(&self) -> String {
		match self {
			Self::ValidationError(ctx) => ctx.trace_id.clone(),
			Self::ParseError(ctx) => ctx.trace_id.clone(),
		}
	}
}
