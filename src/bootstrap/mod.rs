//! Service construction.
//!
//! Builds the forward contract service from the ledger settings. An invalid RPC URL does
//! not prevent startup: the service is created without a client and reports itself as
//! not configured.

use std::sync::Arc;

use tracing::{info, warn};

use crate::{
	models::LedgerSettings,
	services::{
		blockchain::{EvmLedgerClient, HttpTransportClient},
		contract::ForwardContractService,
	},
};

/// The service as wired against a live JSON-RPC node
pub type LedgerService = ForwardContractService<EvmLedgerClient<HttpTransportClient>>;

/// Creates the forward contract service for the given settings.
///
/// No network I/O happens here; the node is first contacted by the availability gate.
pub fn build_service(settings: LedgerSettings) -> LedgerService {
	match EvmLedgerClient::new(&settings) {
		Ok(client) => {
			info!("Ledger client created for {}", settings.rpc_url);
			ForwardContractService::new(settings, Arc::new(client))
		}
		Err(e) => {
			warn!("Ledger client unavailable, service is not configured: {}", e);
			ForwardContractService::without_client(settings)
		}
	}
}
