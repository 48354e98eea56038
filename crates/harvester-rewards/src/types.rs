//! Wire shapes for the rewards HTTP API.

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

/// One per-chain entry of `GET /users/{address}/rewards`.
#[derive(Debug, Clone, Deserialize)]
pub struct RewardBundle {
	#[serde(default)]
	pub rewards: Vec<RewardRecord>,
}

/// One claimable reward inside a bundle.
///
/// `amount` and `claimed` are decimal strings in the token's base units and
/// stay strings end to end: they are compared and forwarded, never parsed
/// into floats.
#[derive(Debug, Clone, Deserialize)]
pub struct RewardRecord {
	pub amount: String,
	/// `"0"` means the wallet has never claimed from this root.
	pub claimed: String,
	#[serde(default)]
	pub pending: String,
	#[serde(default)]
	pub proofs: Vec<String>,
	pub token: RewardToken,
}

/// Reward token descriptor.
#[derive(Debug, Clone, Deserialize)]
pub struct RewardToken {
	pub address: Address,
	pub symbol: String,
	pub decimals: u8,
}

/// Body of `POST {claim_url}`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimRequest {
	pub user_address: String,
	/// Reward token address, EIP-55 checksummed.
	pub distributor: String,
	/// Positional claim arguments:
	/// `[[wallet], [token], [amount], [[...proofs]]]`.
	pub args: serde_json::Value,
	pub sponsor: bool,
}

/// Response of `POST {claim_url}`: a server-built transaction skeleton.
#[derive(Debug, Clone, Deserialize)]
pub struct ClaimCalldata {
	#[serde(default)]
	pub to: Option<Address>,
	#[serde(default)]
	pub from: Option<Address>,
	/// 0x-prefixed claim calldata.
	#[serde(default)]
	pub data: Option<String>,
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn reward_bundles_deserialize_from_api_shape() {
		let bundles: Vec<RewardBundle> = serde_json::from_value(json!([{
			"chain": { "id": 1923, "name": "Swellchain" },
			"rewards": [{
				"root": "0xroot",
				"recipient": "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266",
				"amount": "1000000000000000000",
				"claimed": "0",
				"pending": "0",
				"proofs": ["0xaa", "0xbb"],
				"token": {
					"address": "0x2826D136F5630adA89C1678b64A61620Aab77Aea",
					"chainId": 1923,
					"symbol": "SWELL",
					"decimals": 18
				}
			}]
		}]))
		.unwrap();

		let reward = &bundles[0].rewards[0];
		assert_eq!(reward.amount, "1000000000000000000");
		assert_eq!(reward.claimed, "0");
		assert_eq!(reward.proofs.len(), 2);
		assert_eq!(reward.token.symbol, "SWELL");
		assert_eq!(reward.token.decimals, 18);
	}

	#[test]
	fn claim_response_fields_are_optional() {
		let full: ClaimCalldata = serde_json::from_value(json!({
			"to": "0x3Ef3D8bA38EBe18DB133cEc108f4D14CE00Dd9Ae",
			"from": "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266",
			"data": "0xdeadbeef"
		}))
		.unwrap();
		assert_eq!(full.data.as_deref(), Some("0xdeadbeef"));

		let empty: ClaimCalldata = serde_json::from_value(json!({})).unwrap();
		assert!(empty.to.is_none());
		assert!(empty.data.is_none());
	}
}
