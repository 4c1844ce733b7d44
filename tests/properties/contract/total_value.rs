use crate::properties::strategies::{contract_record_strategy, large_operand_strategy};
use alloy::primitives::{U256, U512};
use proptest::{prelude::*, test_runner::Config};

proptest! {
	#![proptest_config(Config {
		failure_persistence: None,
		..Config::default()
	})]

	#[test]
	fn test_total_value_of_large_operands_is_exact(
		mut record in contract_record_strategy(),
		quantity in large_operand_strategy(),
		price_per_unit in large_operand_strategy(),
	) {
		record.quantity = quantity;
		record.price_per_unit = price_per_unit;
		let total = record.total_value();

		// Dividing the product back recovers the other operand exactly
		prop_assert_eq!(total / U512::from(quantity), U512::from(price_per_unit));
		prop_assert_eq!(total % U512::from(quantity), U512::ZERO);
		prop_assert!(total >= U512::from(quantity));
	}

	#[test]
	fn test_total_value_matches_checked_product_when_it_fits(
		mut record in contract_record_strategy(),
		quantity in any::<u64>(),
		price_per_unit in any::<u64>(),
	) {
		record.quantity = U256::from(quantity);
		record.price_per_unit = U256::from(price_per_unit);

		let expected = u128::from(quantity) * u128::from(price_per_unit);
		prop_assert_eq!(record.total_value(), U512::from(expected));
	}

	#[test]
	fn test_total_value_is_commutative(
		mut record in contract_record_strategy(),
		a in large_operand_strategy(),
		b in large_operand_strategy(),
	) {
		record.quantity = a;
		record.price_per_unit = b;
		let forward = record.total_value();
		record.quantity = b;
		record.price_per_unit = a;
		prop_assert_eq!(forward, record.total_value());
	}
}
