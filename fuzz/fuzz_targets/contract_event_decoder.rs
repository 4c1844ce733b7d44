//! Fuzz target for event log decoding.
//!
//! The input is split into up to four 32-byte topics followed by the log data.

#![no_main]

use alloy::primitives::{Address, Bytes, Log, B256};
use libfuzzer_sys::fuzz_target;
use oilseed_ledger::services::contract::binding;

fuzz_target!(|data: &[u8]| {
	let Some((&count, rest)) = data.split_first() else {
		return;
	};
	let count = usize::from(count % 5).min(rest.len() / 32);
	let (topic_bytes, payload) = rest.split_at(count * 32);
	let topics = topic_bytes.chunks_exact(32).map(B256::from_slice).collect();

	let address = Address::repeat_byte(0xcc);
	let log = Log::new_unchecked(address, topics, Bytes::copy_from_slice(payload));
	let _ = binding::decode_contract_event(address, &log);
});
