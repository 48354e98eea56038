//! Formatting and unit-conversion helpers shared across the workspace.

use alloy::primitives::{Address, U256};

/// Converts an ETH amount from configuration into wei.
///
/// Configuration amounts are tiny (refuel thresholds), so `f64` precision
/// is more than enough here.
pub fn wei_from_eth(amount: f64) -> U256 {
	U256::from((amount * 1e18).round() as u128)
}

/// Renders a base-unit amount as a trimmed decimal for log lines.
pub fn format_units(value: U256, decimals: u8) -> String {
	let value = u128::try_from(value).unwrap_or(u128::MAX);
	let formatted = format!("{:.8}", value as f64 / 10f64.powi(decimals as i32));
	let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
	trimmed.to_string()
}

/// Renders a wei amount as a trimmed ETH decimal for log lines.
pub fn format_eth(wei: U256) -> String {
	format_units(wei, 18)
}

/// Shortens an address to the `0x1234..abcd` form used in logs.
pub fn truncate_address(address: &Address) -> String {
	let full = address.to_string();
	format!("{}..{}", &full[..6], &full[full.len() - 4..])
}

/// Renders an address for logging, truncated or not per configuration.
pub fn display_address(address: &Address, truncate: bool) -> String {
	if truncate {
		truncate_address(address)
	} else {
		address.to_string()
	}
}
