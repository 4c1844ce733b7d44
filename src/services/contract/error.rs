//! Forward contract service error types.
//!
//! Every failure of the service is reported as exactly one of six kinds so callers can
//! tell configuration problems, rejected input, transient unavailability and unknown
//! transaction outcomes apart.

use std::{collections::HashMap, fmt};

use alloy::primitives::B256;
use thiserror::Error as ThisError;

use crate::utils::{BoxedSource, ErrorContext, TraceableError};

/// What a caller can do about an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
	/// Configure the blockchain settings
	Configuration,
	/// Fix the request
	Input,
	/// Try again later
	Transient,
	/// Inspect the transaction before retrying, a retry may submit a duplicate
	OutcomeUnknown,
}

impl fmt::Display for ErrorCategory {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let label = match self {
			Self::Configuration => "configuration",
			Self::Input => "input",
			Self::Transient => "transient",
			Self::OutcomeUnknown => "outcome_unknown",
		};
		f.write_str(label)
	}
}

/// Represents the failures of the forward contract service
#[derive(ThisError, Debug)]
pub enum ForwardContractError {
	/// Address or signing key missing or invalid; no ledger I/O was attempted
	#[error("Not configured: {0}")]
	NotConfigured(Box<ErrorContext>),

	/// The ledger node did not respond
	#[error("Ledger unreachable: {0}")]
	Unreachable(Box<ErrorContext>),

	/// The transaction was not submitted: encoding or signing failed, or the node rejected it
	///
	/// `invalid_input` is set when the request itself could not be encoded.
	#[error("Submission failed: {context}")]
	SubmissionFailed {
		context: Box<ErrorContext>,
		invalid_input: bool,
	},

	/// The transaction was broadcast but no receipt was observed in time
	#[error(
		"Confirmation timeout for transaction {transaction_hash}, outcome unknown: {context}"
	)]
	ConfirmationTimeout {
		transaction_hash: B256,
		context: Box<ErrorContext>,
	},

	/// The ledger program rejected the call
	#[error("Ledger revert: {0}")]
	LedgerRevert(Box<ErrorContext>),

	/// The requested contract does not exist
	#[error("Not found: {0}")]
	NotFound(Box<ErrorContext>),
}

impl ForwardContractError {
	/// Creates a new not configured error with logging
	pub fn not_configured(
		msg: impl Into<String>,
		source: Option<BoxedSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::NotConfigured(Box::new(ErrorContext::new_with_log(msg, source, metadata)))
	}

	/// Creates a new unreachable error with logging
	pub fn unreachable(
		msg: impl Into<String>,
		source: Option<BoxedSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::Unreachable(Box::new(ErrorContext::new_with_log(msg, source, metadata)))
	}

	/// Creates a new submission failed error with logging
	pub fn submission_failed(
		msg: impl Into<String>,
		source: Option<BoxedSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::SubmissionFailed {
			context: Box::new(ErrorContext::new_with_log(msg, source, metadata)),
			invalid_input: false,
		}
	}

	/// Creates a submission failure caused by a malformed request argument
	pub fn invalid_input(
		msg: impl Into<String>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::SubmissionFailed {
			context: Box::new(ErrorContext::new_with_log(msg, None, metadata)),
			invalid_input: true,
		}
	}

	/// Creates a new confirmation timeout error with logging
	pub fn confirmation_timeout(
		transaction_hash: B256,
		msg: impl Into<String>,
		source: Option<BoxedSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::ConfirmationTimeout {
			transaction_hash,
			context: Box::new(ErrorContext::new_with_log(msg, source, metadata)),
		}
	}

	/// Creates a new ledger revert error with logging
	pub fn ledger_revert(
		msg: impl Into<String>,
		source: Option<BoxedSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::LedgerRevert(Box::new(ErrorContext::new_with_log(msg, source, metadata)))
	}

	/// Creates a new not found error with logging
	pub fn not_found(
		msg: impl Into<String>,
		source: Option<BoxedSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::NotFound(Box::new(ErrorContext::new_with_log(msg, source, metadata)))
	}

	/// The wrapped error context
	pub fn context(&self) -> &ErrorContext {
		match self {
			Self::NotConfigured(ctx) => ctx,
			Self::Unreachable(ctx) => ctx,
			Self::SubmissionFailed { context, .. } => context,
			Self::ConfirmationTimeout { context, .. } => context,
			Self::LedgerRevert(ctx) => ctx,
			Self::NotFound(ctx) => ctx,
		}
	}

	/// What a caller can do about this error
	pub fn category(&self) -> ErrorCategory {
		match self {
			Self::NotConfigured(_) => ErrorCategory::Configuration,
			Self::LedgerRevert(_) | Self::NotFound(_) => ErrorCategory::Input,
			Self::SubmissionFailed {
				invalid_input: true,
				..
			} => ErrorCategory::Input,
			Self::Unreachable(_) | Self::SubmissionFailed { .. } => ErrorCategory::Transient,
			Self::ConfirmationTimeout { .. } => ErrorCategory::OutcomeUnknown,
		}
	}

	/// Hash of the broadcast transaction whose outcome is unknown
	pub fn pending_transaction(&self) -> Option<B256> {
		match self {
			Self::ConfirmationTimeout {
				transaction_hash, ..
			} => Some(*transaction_hash),
			_ => None,
		}
	}
}

impl TraceableError for ForwardContractError {
	fn trace_id(&self) -> String {
		self.context().trace_id.clone()
	}
}
