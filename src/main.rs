//! Forward contract ledger command line entry point.
//!
//! Loads the ledger settings from the environment (after an optional `.env` file), sets
//! up logging, builds the service and runs one operation, printing its result as JSON.
//!
//! ```bash
//! oilseed-ledger status
//! oilseed-ledger create --commodity Soybean --quantity 100 --price-per-unit 5000 \
//!     --delivery-date 2025-06-01 --farmer 0x70997970C51812dc3A010C7d01b50e0d17dc79C8
//! oilseed-ledger sign 1 --buyer 0x3C44CdDdB6a900fa2b585dd299e03d12FA4293BC
//! oilseed-ledger get 1
//! ```

use alloy::primitives::U256;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::debug;

use oilseed_ledger::{
	bootstrap::build_service,
	models::LedgerSettings,
	services::contract::ForwardContractError,
	utils::{
		format_error_chain,
		logging::{setup_logging, LogMode},
		parse_date_to_timestamp,
	},
};

/// Records and reads oilseed forward contracts on an EVM ledger
#[derive(Parser)]
#[command(name = "oilseed-ledger")]
#[command(author, version, about, long_about = None)]
struct Cli {
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Report configuration and connectivity of the ledger service
	Status,

	/// Print the number of contracts recorded on the ledger
	Total,

	/// Record a new forward contract
	Create {
		/// Commodity label, e.g. Soybean
		#[arg(long)]
		commodity: String,

		#[arg(long, value_parser = parse_u256)]
		quantity: U256,

		#[arg(long, value_parser = parse_u256)]
		price_per_unit: U256,

		/// Delivery date as YYYY-MM-DD, interpreted as midnight UTC
		#[arg(long, value_parser = parse_date_to_timestamp)]
		delivery_date: u64,

		/// Farmer address recorded as the business counterparty
		#[arg(long)]
		farmer: String,
	},

	/// Sign a contract as buyer
	Sign {
		#[arg(value_parser = parse_u256)]
		contract_id: U256,

		#[arg(long)]
		buyer: String,
	},

	/// Show a contract with its status and event history
	Get {
		#[arg(value_parser = parse_u256)]
		contract_id: U256,
	},

	/// List the contract ids recorded for a farmer
	FarmerContracts { farmer: String },
}

fn parse_u256(s: &str) -> Result<U256, String> {
	s.parse::<U256>()
		.map_err(|e| format!("Invalid unsigned integer '{}': {}", s, e))
}

#[tokio::main]
async fn main() {
	let cli = Cli::parse();

	if let Err(e) = run(cli).await {
		eprintln!("Error: {}", format_error_chain(&e));
		std::process::exit(1);
	}
}

async fn run(cli: Cli) -> Result<()> {
	// A missing .env file is fine, the process environment may already be complete
	if let Err(e) = dotenvy::dotenv() {
		if !e.not_found() {
			return Err(e).context("Failed to load .env file");
		}
	}

	let _guard = setup_logging(LogMode::from_env());
	let settings = LedgerSettings::from_env().context("Invalid ledger settings")?;
	debug!("Loaded ledger settings: {:?}", settings);
	let service = build_service(settings);

	match cli.command {
		Commands::Status => print_json(&service.status().await),
		Commands::Total => print_json(&service_result("total", service.total_contracts().await)?),
		Commands::Create {
			commodity,
			quantity,
			price_per_unit,
			delivery_date,
			farmer,
		} => {
			let result = service
				.create_contract(&commodity, quantity, price_per_unit, delivery_date, &farmer)
				.await;
			print_json(&service_result("create", result)?)
		}
		Commands::Sign { contract_id, buyer } => {
			let result = service.sign_contract(contract_id, &buyer).await;
			print_json(&service_result("sign", result)?)
		}
		Commands::Get { contract_id } => {
			let result = service.get_contract_details(contract_id).await;
			print_json(&service_result("get", result)?)
		}
		Commands::FarmerContracts { farmer } => {
			let result = service.farmer_contracts(&farmer).await;
			print_json(&service_result("farmer-contracts", result)?)
		}
	}
}

/// Tags a service failure with its category so the caller knows what to do next.
fn service_result<T>(operation: &str, result: Result<T, ForwardContractError>) -> Result<T> {
	result.map_err(|e| {
		let category = e.category();
		anyhow::Error::new(e).context(format!("{} failed [{}]", operation, category))
	})
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
	let output = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
	println!("{}", output);
	Ok(())
}
