use crate::properties::strategies::{address_strategy, stored_contract_strategy, u256_strategy};
use alloy::{
	primitives::{Log, U256},
	sol_types::{SolEvent, SolValue},
};
use oilseed_ledger::{
	models::{ContractEvent, ContractRecord},
	services::contract::binding::{self, IForwardContract},
};
use proptest::{prelude::*, test_runner::Config};

proptest! {
	#![proptest_config(Config {
		failure_persistence: None,
		..Config::default()
	})]

	#[test]
	fn test_stored_contract_decodes_field_for_field(contract in stored_contract_strategy()) {
		let record = binding::decode_contract_record(&contract.abi_encode()).unwrap();
		prop_assert_eq!(record, ContractRecord::from(contract));
	}

	#[test]
	fn test_sentinel_detection_ignores_id_and_quantity(
		contract in stored_contract_strategy(),
	) {
		let record = ContractRecord::from(contract);
		prop_assert_eq!(
			record.is_unset(),
			record.farmer.is_zero() && record.created_at == U256::ZERO
		);
	}

	#[test]
	fn test_truncated_return_data_never_panics(
		contract in stored_contract_strategy(),
		cut in 0usize..512,
	) {
		let encoded = contract.abi_encode();
		let cut = cut.min(encoded.len());
		let _ = binding::decode_contract_record(&encoded[..cut]);
	}

	#[test]
	fn test_events_of_other_emitters_are_ignored(
		id in u256_strategy(),
		emitter in address_strategy(),
		contract_address in address_strategy(),
		signer in address_strategy(),
	) {
		let event = IForwardContract::ContractSigned {
			contractId: id,
			signer,
			signerType: "buyer".to_string(),
		};
		let log = Log { address: emitter, data: event.encode_log_data() };

		let decoded = binding::decode_contract_event(contract_address, &log);
		if emitter == contract_address {
			prop_assert!(matches!(decoded, Some(ContractEvent::Signed(_))));
			prop_assert_eq!(decoded.map(|event| event.contract_id()), Some(id));
		} else {
			prop_assert!(decoded.is_none());
		}
	}
}
