//! Fuzz target for the `getContract` return data decoder.
//!
//! Arbitrary bytes must decode into a record or an error, never panic. Decoded records
//! are pushed through the view assembly as well, which does 512-bit arithmetic and
//! calendar formatting on attacker controlled values.

#![no_main]

use libfuzzer_sys::fuzz_target;
use oilseed_ledger::services::contract::{binding, read_model};

fuzz_target!(|data: &[u8]| {
	if let Ok(record) = binding::decode_contract_record(data) {
		let _ = record.is_unset();
		let _ = read_model::build_view(record, Vec::new());
	}
});
