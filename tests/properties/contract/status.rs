use crate::properties::strategies::contract_record_strategy;
use alloy::primitives::U256;
use oilseed_ledger::{
	models::ContractStatus,
	services::contract::{derive_status, read_model::build_view},
};
use proptest::{prelude::*, test_runner::Config};

proptest! {
	#![proptest_config(Config {
		failure_persistence: None,
		..Config::default()
	})]

	#[test]
	fn test_settled_always_wins(farmer_signed in any::<bool>(), buyer_signed in any::<bool>()) {
		prop_assert_eq!(
			derive_status(farmer_signed, buyer_signed, true),
			ContractStatus::Settled
		);
	}

	#[test]
	fn test_status_follows_priority_chain(
		farmer_signed in any::<bool>(),
		buyer_signed in any::<bool>(),
		settled in any::<bool>(),
	) {
		let status = derive_status(farmer_signed, buyer_signed, settled);
		match status {
			ContractStatus::Settled => prop_assert!(settled),
			ContractStatus::SignedByBoth => {
				prop_assert!(!settled && farmer_signed && buyer_signed);
			}
			ContractStatus::WaitingForBuyer => {
				prop_assert!(!settled && farmer_signed && !buyer_signed);
			}
			ContractStatus::Pending => prop_assert!(!settled && !farmer_signed),
		}
	}

	#[test]
	fn test_view_status_matches_record_flags(record in contract_record_strategy()) {
		let expected = derive_status(record.farmer_signed, record.buyer_signed, record.settled);
		let view = build_view(record.clone(), Vec::new());

		prop_assert_eq!(view.status, expected);
		prop_assert_eq!(view.contract_id, record.id);
		prop_assert_eq!(view.delivery_date_timestamp, record.delivery_date);
		if record.created_at <= U256::from(u32::MAX) {
			prop_assert!(view.created_at.is_some());
		}
		if record.created_at > U256::from(u64::MAX) {
			prop_assert!(view.created_at.is_none());
		}
	}
}
