//! Parsing utilities
//!
//! This module provides utilities for parsing JSON-RPC hex quantities and calendar dates.

use chrono::{DateTime, NaiveDate, NaiveTime};

/// Parses a JSON-RPC hex quantity (e.g. `"0x1a"`) into a `u64`.
pub fn parse_hex_u64(s: &str) -> Result<u64, String> {
	let digits = strip_hex_prefix(s)?;
	u64::from_str_radix(digits, 16).map_err(|e| format!("Invalid hex quantity '{}': {}", s, e))
}

/// Parses a JSON-RPC hex quantity into a `u128`, used for gas prices.
pub fn parse_hex_u128(s: &str) -> Result<u128, String> {
	let digits = strip_hex_prefix(s)?;
	u128::from_str_radix(digits, 16).map_err(|e| format!("Invalid hex quantity '{}': {}", s, e))
}

fn strip_hex_prefix(s: &str) -> Result<&str, String> {
	let digits = s
		.strip_prefix("0x")
		.or_else(|| s.strip_prefix("0X"))
		.ok_or_else(|| format!("Hex quantity '{}' is missing the 0x prefix", s))?;
	if digits.is_empty() {
		return Err(format!("Hex quantity '{}' has no digits", s));
	}
	Ok(digits)
}

/// Parses a `YYYY-MM-DD` date into the Unix timestamp of midnight UTC on that day.
pub fn parse_date_to_timestamp(s: &str) -> Result<u64, String> {
	let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
		.map_err(|e| format!("Invalid date '{}', expected YYYY-MM-DD: {}", s, e))?;
	let timestamp = date.and_time(NaiveTime::MIN).and_utc().timestamp();
	u64::try_from(timestamp).map_err(|_| format!("Date '{}' is before the Unix epoch", s))
}

/// Formats a Unix timestamp as `YYYY-MM-DD` (UTC).
pub fn format_timestamp_date(timestamp: u64) -> Option<String> {
	to_datetime(timestamp).map(|dt| dt.format("%Y-%m-%d").to_string())
}

/// Formats a Unix timestamp as `YYYY-MM-DD HH:MM:SS` (UTC).
pub fn format_timestamp_datetime(timestamp: u64) -> Option<String> {
	to_datetime(timestamp).map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
}

fn to_datetime(timestamp: u64) -> Option<DateTime<chrono::Utc>> {
	let secs = i64::try_from(timestamp).ok()?;
	DateTime::from_timestamp(secs, 0)
}
