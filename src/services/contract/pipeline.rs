//! Transaction pipeline for mutating calls.
//!
//! Builds, signs, submits and confirms one transaction per call. Nonce acquisition,
//! signing and broadcast of a given identity run under one lock so concurrent calls
//! never share a nonce; the confirmation wait runs outside of it.

use std::{collections::HashMap, sync::Arc};

use alloy::{
	consensus::{SignableTransaction, TxEnvelope, TxLegacy},
	eips::eip2718::Encodable2718,
	network::TxSignerSync,
	primitives::{Address, Bytes, TxKind, B256, U256},
	signers::local::PrivateKeySigner,
};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::{
	models::LedgerReceipt,
	services::{
		blockchain::{BlockChainError, LedgerClient},
		contract::{binding::EntryPoint, gate::Credentials, ForwardContractError},
	},
};

/// A signed transaction ready for broadcast
///
/// Lives only for the duration of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTransaction {
	pub nonce: u64,
	pub gas_price: u128,
	pub gas_limit: u64,
	/// EIP-2718 encoded signed transaction
	pub raw: Bytes,
	pub hash: B256,
}

/// Assembles and signs a legacy transaction calling `to` with `input`.
///
/// Signing is deterministic: identical arguments always produce identical bytes.
pub fn build_signed_transaction(
	signer: &PrivateKeySigner,
	chain_id: u64,
	nonce: u64,
	gas_price: u128,
	gas_limit: u64,
	to: Address,
	input: Bytes,
) -> Result<PendingTransaction, alloy::signers::Error> {
	let mut tx = TxLegacy {
		chain_id: Some(chain_id),
		nonce,
		gas_price,
		gas_limit,
		to: TxKind::Call(to),
		value: U256::ZERO,
		input,
	};
	let signature = signer.sign_transaction_sync(&mut tx)?;
	let envelope = TxEnvelope::from(tx.into_signed(signature));

	Ok(PendingTransaction {
		nonce,
		gas_price,
		gas_limit,
		raw: envelope.encoded_2718().into(),
		hash: *envelope.tx_hash(),
	})
}

/// Runs mutating calls against the ledger on behalf of one signing identity
pub struct TransactionPipeline<C> {
	client: Arc<C>,
	/// Serializes nonce acquisition through broadcast
	nonce_lock: Mutex<()>,
}

impl<C: LedgerClient> TransactionPipeline<C> {
	pub fn new(client: Arc<C>) -> Self {
		Self {
			client,
			nonce_lock: Mutex::new(()),
		}
	}

	/// Submits one call and waits for its receipt
	///
	/// # Arguments
	/// * `credentials` - Signing key and program address
	/// * `entry_point` - Entry point the call data targets, selects the gas ceiling
	/// * `calldata` - Encoded call
	///
	/// # Errors
	/// - `SubmissionFailed` if anything fails before the transaction was signed, or the node
	///   definitively rejected the broadcast
	/// - `LedgerRevert` if the node rejects the transaction as reverted, or the receipt
	///   reports a revert
	/// - `ConfirmationTimeout` if the broadcast lost its connection, or the transaction was
	///   accepted but no receipt was observed
	pub async fn submit(
		&self,
		credentials: &Credentials,
		entry_point: EntryPoint,
		calldata: Bytes,
	) -> Result<LedgerReceipt, ForwardContractError> {
		let account = credentials.account();
		let mut metadata = HashMap::from([
			("entry_point".to_string(), entry_point.name().to_string()),
			("account".to_string(), account.to_string()),
		]);

		let pending = {
			let _guard = self.nonce_lock.lock().await;

			let nonce = self
				.client
				.get_transaction_count(account)
				.await
				.map_err(|e| submission_failed("Failed to acquire nonce", e, &metadata))?;
			metadata.insert("nonce".to_string(), nonce.to_string());

			let gas_price = self
				.client
				.get_gas_price()
				.await
				.map_err(|e| submission_failed("Failed to fetch gas price", e, &metadata))?;
			let chain_id = self
				.client
				.get_chain_id()
				.await
				.map_err(|e| submission_failed("Failed to fetch chain id", e, &metadata))?;
			debug!(
				"Building {} transaction: nonce={}, gas_price={}, chain_id={}",
				entry_point.name(),
				nonce,
				gas_price,
				chain_id
			);

			let pending = build_signed_transaction(
				&credentials.signer,
				chain_id,
				nonce,
				gas_price,
				entry_point.gas_limit(),
				credentials.contract_address,
				calldata,
			)
			.map_err(|e| {
				ForwardContractError::submission_failed(
					"Failed to sign transaction",
					Some(Box::new(e)),
					Some(metadata.clone()),
				)
			})?;

			let hash = self
				.client
				.send_raw_transaction(pending.raw.clone())
				.await
				.map_err(|e| match e {
					BlockChainError::ExecutionReverted(_) => ForwardContractError::ledger_revert(
						format!("{} was rejected by the program", entry_point.name()),
						Some(Box::new(e)),
						Some(metadata.clone()),
					),
					// The request may have reached the node, the transaction can still be mined
					BlockChainError::ConnectionError(_) => ForwardContractError::confirmation_timeout(
						pending.hash,
						"Broadcast did not complete; the transaction may have been accepted",
						Some(Box::new(e)),
						Some(metadata.clone()),
					),
					_ => submission_failed("Failed to broadcast transaction", e, &metadata),
				})?;
			if hash != pending.hash {
				debug!(
					"Node reported hash {} for locally computed {}",
					hash, pending.hash
				);
			}
			PendingTransaction { hash, ..pending }
		};

		info!(
			"Submitted {} transaction {} with nonce {}",
			entry_point.name(),
			pending.hash,
			pending.nonce
		);
		metadata.insert("hash".to_string(), pending.hash.to_string());

		let receipt = self
			.client
			.wait_for_receipt(pending.hash)
			.await
			.map_err(|e| {
				ForwardContractError::confirmation_timeout(
					pending.hash,
					"Transaction was broadcast but not confirmed; it may still be mined",
					Some(Box::new(e)),
					Some(metadata.clone()),
				)
			})?;

		if !receipt.success {
			return Err(ForwardContractError::ledger_revert(
				format!(
					"{} reverted in block {}",
					entry_point.name(),
					receipt.block_number
				),
				None,
				Some(metadata),
			));
		}

		info!(
			"Confirmed {} transaction {} in block {} (gas used {})",
			entry_point.name(),
			receipt.transaction_hash,
			receipt.block_number,
			receipt.gas_used
		);
		Ok(receipt)
	}
}

fn submission_failed(
	msg: &str,
	source: BlockChainError,
	metadata: &HashMap<String, String>,
) -> ForwardContractError {
	ForwardContractError::submission_failed(msg, Some(Box::new(source)), Some(metadata.clone()))
}
