//! Ledger connection settings.
//!
//! Settings are read from the process environment, which may be pre-populated from a
//! `.env` file. A missing contract address or private key is not an error here: the
//! service starts, and its availability gate reports it as not configured.

use std::{collections::HashMap, env, fmt, time::Duration};

use crate::models::{config::error::ConfigError, SecretString};

/// Default JSON-RPC endpoint used when `POLYGON_RPC_URL` is not set.
pub const DEFAULT_RPC_URL: &str = "https://rpc-mumbai.maticvigil.com";
/// Default upper bound on waiting for a transaction receipt.
pub const DEFAULT_RECEIPT_TIMEOUT: Duration = Duration::from_secs(120);
/// Default delay between two receipt lookups.
pub const DEFAULT_RECEIPT_POLL_INTERVAL: Duration = Duration::from_millis(500);
/// Default timeout of a single JSON-RPC request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const RPC_URL_VAR: &str = "POLYGON_RPC_URL";
const CONTRACT_ADDRESS_VAR: &str = "CONTRACT_ADDRESS";
const PRIVATE_KEY_VAR: &str = "PRIVATE_KEY";
const RECEIPT_TIMEOUT_VAR: &str = "LEDGER_RECEIPT_TIMEOUT_SECS";
const RECEIPT_POLL_INTERVAL_VAR: &str = "LEDGER_RECEIPT_POLL_INTERVAL_MS";
const REQUEST_TIMEOUT_VAR: &str = "LEDGER_REQUEST_TIMEOUT_SECS";

/// Connection and identity settings of the ledger service.
#[derive(Clone)]
pub struct LedgerSettings {
	/// JSON-RPC endpoint of the ledger node
	pub rpc_url: String,
	/// Address of the deployed forward contract program, as configured (unvalidated)
	pub contract_address: String,
	/// Hex encoded secp256k1 signing key
	pub private_key: SecretString,
	/// Upper bound on waiting for a transaction receipt
	pub receipt_timeout: Duration,
	/// Delay between two receipt lookups
	pub receipt_poll_interval: Duration,
	/// Timeout of a single JSON-RPC request
	pub request_timeout: Duration,
}

impl LedgerSettings {
	/// Creates settings with default timing parameters.
	pub fn new(
		rpc_url: impl Into<String>,
		contract_address: impl Into<String>,
		private_key: impl Into<String>,
	) -> Self {
		Self {
			rpc_url: rpc_url.into(),
			contract_address: contract_address.into(),
			private_key: SecretString::new(private_key.into()),
			receipt_timeout: DEFAULT_RECEIPT_TIMEOUT,
			receipt_poll_interval: DEFAULT_RECEIPT_POLL_INTERVAL,
			request_timeout: DEFAULT_REQUEST_TIMEOUT,
		}
	}

	/// Loads settings from the process environment.
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_lookup(|name| env::var(name).ok())
	}

	/// Loads settings through an arbitrary variable lookup.
	///
	/// Empty values are treated as unset.
	pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let read = |name: &str| {
			lookup(name)
				.map(|value| value.trim().to_string())
				.filter(|value| !value.is_empty())
		};

		let mut settings = Self::new(
			read(RPC_URL_VAR).unwrap_or_else(|| DEFAULT_RPC_URL.to_string()),
			read(CONTRACT_ADDRESS_VAR).unwrap_or_default(),
			read(PRIVATE_KEY_VAR).unwrap_or_default(),
		);

		if let Some(value) = read(RECEIPT_TIMEOUT_VAR) {
			settings.receipt_timeout = Duration::from_secs(parse_number(RECEIPT_TIMEOUT_VAR, &value)?);
		}
		if let Some(value) = read(RECEIPT_POLL_INTERVAL_VAR) {
			settings.receipt_poll_interval =
				Duration::from_millis(parse_number(RECEIPT_POLL_INTERVAL_VAR, &value)?);
		}
		if let Some(value) = read(REQUEST_TIMEOUT_VAR) {
			settings.request_timeout = Duration::from_secs(parse_number(REQUEST_TIMEOUT_VAR, &value)?);
		}

		settings.validate()?;
		Ok(settings)
	}

	/// Validates the timing parameters.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.receipt_poll_interval.is_zero() {
			return Err(ConfigError::validation_error(
				"Receipt poll interval must be greater than zero",
				None,
				None,
			));
		}
		if self.receipt_poll_interval > self.receipt_timeout {
			return Err(ConfigError::validation_error(
				"Receipt poll interval must not exceed the receipt timeout",
				None,
				Some(HashMap::from([
					(
						"receipt_timeout_ms".to_string(),
						self.receipt_timeout.as_millis().to_string(),
					),
					(
						"receipt_poll_interval_ms".to_string(),
						self.receipt_poll_interval.as_millis().to_string(),
					),
				])),
			));
		}
		if self.request_timeout.is_zero() {
			return Err(ConfigError::validation_error(
				"Request timeout must be greater than zero",
				None,
				None,
			));
		}
		Ok(())
	}
}

fn parse_number(name: &str, value: &str) -> Result<u64, ConfigError> {
	value.parse::<u64>().map_err(|e| {
		ConfigError::parse_error(
			format!("Invalid value for {}", name),
			Some(Box::new(e)),
			Some(HashMap::from([("value".to_string(), value.to_string())])),
		)
	})
}

impl fmt::Debug for LedgerSettings {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("LedgerSettings")
			.field("rpc_url", &self.rpc_url)
			.field("contract_address", &self.contract_address)
			.field("private_key", &self.private_key)
			.field("receipt_timeout", &self.receipt_timeout)
			.field("receipt_poll_interval", &self.receipt_poll_interval)
			.field("request_timeout", &self.request_timeout)
			.finish()
	}
}
