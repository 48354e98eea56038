//! Merkl HTTP API client.

use crate::types::{ClaimCalldata, ClaimRequest, RewardBundle};
use crate::{RewardsApi, RewardsError};
use alloy::primitives::Address;
use async_trait::async_trait;
use std::time::Duration;

/// Per-request timeout for all rewards calls.
const HTTP_TIMEOUT_SECS: u64 = 30;

/// Client for a Merkl-compatible rewards API.
///
/// Eligibility lives under `api_url`; the claim-calldata builder is a fixed
/// endpoint of its own (`claim_url`), not a path under the API base.
pub struct MerklApi {
	client: reqwest::Client,
	api_url: String,
	claim_url: String,
}

impl MerklApi {
	/// Creates a client, optionally routed through an HTTP proxy.
	pub fn new(api_url: &str, claim_url: &str, proxy: Option<&str>) -> Result<Self, RewardsError> {
		let mut builder =
			reqwest::Client::builder().timeout(Duration::from_secs(HTTP_TIMEOUT_SECS));

		if let Some(proxy_url) = proxy {
			let proxy = reqwest::Proxy::all(proxy_url)
				.map_err(|e| RewardsError::Api(format!("Invalid proxy URL: {}", e)))?;
			builder = builder.proxy(proxy);
		}

		let client = builder
			.build()
			.map_err(|e| RewardsError::Api(format!("Failed to build HTTP client: {}", e)))?;

		Ok(Self {
			client,
			api_url: api_url.trim_end_matches('/').to_string(),
			claim_url: claim_url.to_string(),
		})
	}

	async fn read_json<T: serde::de::DeserializeOwned>(
		response: reqwest::Response,
		context: &str,
	) -> Result<T, RewardsError> {
		if !response.status().is_success() {
			let status = response.status();
			let body = response.text().await.unwrap_or_default();
			return Err(RewardsError::Api(format!(
				"{} returned {}: {}",
				context, status, body
			)));
		}

		response
			.json()
			.await
			.map_err(|e| RewardsError::Api(format!("{} returned invalid JSON: {}", context, e)))
	}
}

#[async_trait]
impl RewardsApi for MerklApi {
	async fn rewards(
		&self,
		address: Address,
		chain_id: u64,
	) -> Result<Vec<RewardBundle>, RewardsError> {
		let url = format!("{}/users/{}/rewards", self.api_url, address);
		let response = self
			.client
			.get(&url)
			.query(&[("chainId", chain_id)])
			.send()
			.await
			.map_err(|e| RewardsError::Api(format!("GET {} failed: {}", url, e)))?;

		Self::read_json(response, "rewards").await
	}

	async fn claim_calldata(&self, request: &ClaimRequest) -> Result<ClaimCalldata, RewardsError> {
		let response = self
			.client
			.post(&self.claim_url)
			.json(request)
			.send()
			.await
			.map_err(|e| RewardsError::Api(format!("POST {} failed: {}", self.claim_url, e)))?;

		Self::read_json(response, "claim").await
	}
}
