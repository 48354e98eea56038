//! Eligibility checks and claim assembly.

use crate::types::{ClaimRequest, RewardToken};
use crate::{RewardsApi, RewardsError};
use alloy::primitives::{Address, Bytes, U256};
use harvester_types::format_units;
use std::sync::Arc;

/// The parts of one reward the claim flow needs.
#[derive(Debug, Clone)]
pub struct RewardEntry {
	/// Claimable amount, decimal string in base units, forwarded verbatim.
	pub amount: String,
	/// Merkle proofs for the claim.
	pub proofs: Vec<String>,
	/// The reward token.
	pub token: RewardToken,
}

/// Checks eligibility and requests claim calldata for one rewards chain.
pub struct RewardsClaimer {
	api: Arc<dyn RewardsApi>,
	chain_id: u64,
}

impl RewardsClaimer {
	pub fn new(api: Arc<dyn RewardsApi>, chain_id: u64) -> Self {
		Self { api, chain_id }
	}

	/// Looks up what the wallet can claim. `None` means nothing to do:
	/// either no rewards exist or they were already claimed.
	pub async fn fetch_eligibility(
		&self,
		address: Address,
		label: &str,
	) -> Result<Option<RewardEntry>, RewardsError> {
		let bundles = self.api.rewards(address, self.chain_id).await?;

		let Some(reward) = bundles.first().and_then(|bundle| bundle.rewards.first()) else {
			tracing::warn!(label, "No rewards found for this address");
			return Ok(None);
		};

		if reward.claimed != "0" {
			tracing::warn!(
				label,
				amount = %display_amount(&reward.claimed, reward.token.decimals),
				symbol = %reward.token.symbol,
				"Rewards already claimed"
			);
			return Ok(None);
		}

		tracing::info!(
			label,
			amount = %display_amount(&reward.amount, reward.token.decimals),
			symbol = %reward.token.symbol,
			"Wallet is eligible for rewards"
		);

		Ok(Some(RewardEntry {
			amount: reward.amount.clone(),
			proofs: reward.proofs.clone(),
			token: reward.token.clone(),
		}))
	}

	/// Asks the API to build the claim calldata for an eligible wallet.
	///
	/// The claim arguments are positional single-element arrays; the
	/// `distributor` field carries the reward token's checksummed address.
	pub async fn build_claim(
		&self,
		address: Address,
		entry: &RewardEntry,
	) -> Result<Bytes, RewardsError> {
		let wallet = address.to_string();
		let distributor = entry.token.address.to_string();

		let args = serde_json::json!([
			[wallet.clone()],
			[distributor.clone()],
			[entry.amount.clone()],
			[entry.proofs.clone()],
		]);
		let request = ClaimRequest {
			user_address: wallet,
			distributor,
			args,
			sponsor: false,
		};

		let response = self.api.claim_calldata(&request).await?;
		let data = response.data.ok_or_else(|| {
			RewardsError::InvalidClaim("response carries no calldata".to_string())
		})?;

		data.parse::<Bytes>()
			.map_err(|e| RewardsError::InvalidClaim(format!("calldata is not valid hex: {}", e)))
	}
}

/// Formats a base-unit decimal string for logs, falling back to the raw
/// string when it does not parse.
fn display_amount(amount: &str, decimals: u8) -> String {
	match amount.parse::<U256>() {
		Ok(value) => format_units(value, decimals),
		Err(_) => amount.to_string(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::types::{ClaimCalldata, RewardBundle};
	use alloy::primitives::address;
	use async_trait::async_trait;
	use serde_json::json;
	use std::sync::Mutex;

	const WALLET: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");

	struct ScriptedApi {
		bundles: Mutex<Option<Vec<RewardBundle>>>,
		calldata: Mutex<Option<ClaimCalldata>>,
		seen_claim: Mutex<Option<ClaimRequest>>,
	}

	impl ScriptedApi {
		fn with_rewards(bundles: serde_json::Value) -> Arc<Self> {
			Arc::new(Self {
				bundles: Mutex::new(Some(serde_json::from_value(bundles).unwrap())),
				calldata: Mutex::new(None),
				seen_claim: Mutex::new(None),
			})
		}

		fn with_claim(calldata: serde_json::Value) -> Arc<Self> {
			Arc::new(Self {
				bundles: Mutex::new(None),
				calldata: Mutex::new(Some(serde_json::from_value(calldata).unwrap())),
				seen_claim: Mutex::new(None),
			})
		}
	}

	#[async_trait]
	impl RewardsApi for ScriptedApi {
		async fn rewards(
			&self,
			_address: Address,
			_chain_id: u64,
		) -> Result<Vec<RewardBundle>, RewardsError> {
			Ok(self.bundles.lock().unwrap().take().unwrap())
		}

		async fn claim_calldata(
			&self,
			request: &ClaimRequest,
		) -> Result<ClaimCalldata, RewardsError> {
			*self.seen_claim.lock().unwrap() = Some(request.clone());
			Ok(self.calldata.lock().unwrap().take().unwrap())
		}
	}

	fn bundle(claimed: &str) -> serde_json::Value {
		json!([{
			"rewards": [{
				"amount": "2000000000000000000",
				"claimed": claimed,
				"pending": "0",
				"proofs": ["0xaa", "0xbb"],
				"token": {
					"address": "0x2826D136F5630adA89C1678b64A61620Aab77Aea",
					"symbol": "SWELL",
					"decimals": 18
				}
			}]
		}])
	}

	fn entry() -> RewardEntry {
		RewardEntry {
			amount: "2000000000000000000".to_string(),
			proofs: vec!["0xaa".to_string(), "0xbb".to_string()],
			token: serde_json::from_value(json!({
				"address": "0x2826D136F5630adA89C1678b64A61620Aab77Aea",
				"symbol": "SWELL",
				"decimals": 18
			}))
			.unwrap(),
		}
	}

	#[tokio::test]
	async fn unclaimed_reward_is_eligible() {
		let api = ScriptedApi::with_rewards(bundle("0"));
		let claimer = RewardsClaimer::new(api, 1923);

		let entry = claimer.fetch_eligibility(WALLET, "[1/1]").await.unwrap();
		let entry = entry.unwrap();
		assert_eq!(entry.amount, "2000000000000000000");
		assert_eq!(entry.proofs, vec!["0xaa", "0xbb"]);
	}

	#[tokio::test]
	async fn claimed_marker_disqualifies_regardless_of_amount() {
		let api = ScriptedApi::with_rewards(bundle("2000000000000000000"));
		let claimer = RewardsClaimer::new(api, 1923);

		let entry = claimer.fetch_eligibility(WALLET, "[1/1]").await.unwrap();
		assert!(entry.is_none());
	}

	#[tokio::test]
	async fn empty_bundles_yield_nothing() {
		let api = ScriptedApi::with_rewards(json!([]));
		let claimer = RewardsClaimer::new(api, 1923);

		let entry = claimer.fetch_eligibility(WALLET, "[1/1]").await.unwrap();
		assert!(entry.is_none());
	}

	#[tokio::test]
	async fn bundle_without_rewards_yields_nothing() {
		let api = ScriptedApi::with_rewards(json!([{ "rewards": [] }]));
		let claimer = RewardsClaimer::new(api, 1923);

		let entry = claimer.fetch_eligibility(WALLET, "[1/1]").await.unwrap();
		assert!(entry.is_none());
	}

	#[tokio::test]
	async fn claim_request_wire_shape() {
		let api = ScriptedApi::with_claim(json!({
			"to": "0x3Ef3D8bA38EBe18DB133cEc108f4D14CE00Dd9Ae",
			"from": "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266",
			"data": "0xdeadbeef"
		}));
		let claimer = RewardsClaimer::new(api.clone(), 1923);

		let calldata = claimer.build_claim(WALLET, &entry()).await.unwrap();
		assert_eq!(calldata, "0xdeadbeef".parse::<Bytes>().unwrap());

		let seen = api.seen_claim.lock().unwrap().clone().unwrap();
		assert_eq!(
			serde_json::to_value(&seen).unwrap(),
			json!({
				"userAddress": "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266",
				"distributor": "0x2826D136F5630adA89C1678b64A61620Aab77Aea",
				"args": [
					["0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"],
					["0x2826D136F5630adA89C1678b64A61620Aab77Aea"],
					["2000000000000000000"],
					[["0xaa", "0xbb"]]
				],
				"sponsor": false,
			})
		);
	}

	#[tokio::test]
	async fn claim_without_calldata_is_invalid() {
		let api = ScriptedApi::with_claim(json!({}));
		let claimer = RewardsClaimer::new(api, 1923);

		let err = claimer.build_claim(WALLET, &entry()).await.unwrap_err();
		assert!(matches!(err, RewardsError::InvalidClaim(_)));
	}

	#[test]
	fn display_amount_falls_back_to_raw_text() {
		assert_eq!(display_amount("2000000000000000000", 18), "2");
		assert_eq!(display_amount("not-a-number", 18), "not-a-number");
	}
}
