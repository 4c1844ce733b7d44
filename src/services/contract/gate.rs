//! Configuration and availability gate.
//!
//! Decides whether the service may touch the ledger. Credential checks are pure and run
//! before any I/O; the liveness probe is the only check that reaches the node.

use std::{collections::HashMap, str::FromStr};

use alloy::{primitives::Address, signers::local::PrivateKeySigner};

use crate::{
	models::LedgerSettings,
	services::{blockchain::LedgerClient, contract::ForwardContractError},
};

/// Validated identity of the service
#[derive(Clone, Debug)]
pub struct Credentials {
	/// Signs every transaction and pays its gas
	pub signer: PrivateKeySigner,
	/// Address of the deployed forward contract program
	pub contract_address: Address,
}

impl Credentials {
	/// Account the transactions are sent from
	pub fn account(&self) -> Address {
		self.signer.address()
	}
}

/// Parses an address, requiring a valid EIP-55 checksum when the input is mixed case.
pub fn parse_address(value: &str) -> Result<Address, String> {
	let value = value.trim();
	let digits = value
		.strip_prefix("0x")
		.or_else(|| value.strip_prefix("0X"))
		.unwrap_or(value);
	let mixed_case = digits.chars().any(|c| c.is_ascii_uppercase())
		&& digits.chars().any(|c| c.is_ascii_lowercase());

	let parsed = if mixed_case {
		Address::parse_checksummed(value, None).map_err(|e| e.to_string())
	} else {
		Address::from_str(value).map_err(|e| e.to_string())
	};
	parsed.map_err(|e| format!("Invalid address '{}': {}", value, e))
}

/// Resolves the credentials from the settings without any ledger I/O.
///
/// # Errors
/// - `ForwardContractError::NotConfigured` if the contract address or the private key is
///   missing or invalid
pub fn resolve_credentials(settings: &LedgerSettings) -> Result<Credentials, ForwardContractError> {
	if settings.contract_address.trim().is_empty() {
		return Err(ForwardContractError::not_configured(
			"Contract address is not set",
			None,
			None,
		));
	}
	let contract_address = parse_address(&settings.contract_address).map_err(|e| {
		ForwardContractError::not_configured(
			e,
			None,
			Some(HashMap::from([(
				"contract_address".to_string(),
				settings.contract_address.clone(),
			)])),
		)
	})?;

	if settings.private_key.is_empty() {
		return Err(ForwardContractError::not_configured(
			"Private key is not set",
			None,
			None,
		));
	}
	let key = settings.private_key.as_str().trim();
	let key = key.strip_prefix("0x").unwrap_or(key);
	// The key itself never goes into the error, only the parser's message.
	let signer = PrivateKeySigner::from_str(key).map_err(|e| {
		ForwardContractError::not_configured(
			format!("Private key is invalid: {}", e),
			None,
			None,
		)
	})?;

	Ok(Credentials {
		signer,
		contract_address,
	})
}

/// Runs the complete gate: credentials first, then the liveness probe.
///
/// # Errors
/// - `ForwardContractError::NotConfigured` if the credentials are unusable, in which case
///   the client is never called
/// - `ForwardContractError::Unreachable` if the node does not answer the probe
pub async fn check_availability<C: LedgerClient + ?Sized>(
	settings: &LedgerSettings,
	client: &C,
) -> Result<Credentials, ForwardContractError> {
	let credentials = resolve_credentials(settings)?;

	if !client.is_connected().await {
		return Err(ForwardContractError::unreachable(
			"Ledger node did not answer the liveness probe",
			None,
			Some(HashMap::from([(
				"rpc_url".to_string(),
				settings.rpc_url.clone(),
			)])),
		));
	}

	Ok(credentials)
}
