//! Relay HTTP API client.

use crate::types::{DepositStatus, QuoteRequest, QuoteResponse, RequestsPage};
use crate::{BridgeApi, BridgeError};
use async_trait::async_trait;
use std::time::Duration;

/// Per-request timeout for all bridge calls.
const HTTP_TIMEOUT_SECS: u64 = 30;

/// Client for a Relay-compatible bridge API.
pub struct RelayApi {
	client: reqwest::Client,
	base_url: String,
}

impl RelayApi {
	/// Creates a client, optionally routed through an HTTP proxy.
	pub fn new(base_url: &str, proxy: Option<&str>) -> Result<Self, BridgeError> {
		let mut builder =
			reqwest::Client::builder().timeout(Duration::from_secs(HTTP_TIMEOUT_SECS));

		if let Some(proxy_url) = proxy {
			let proxy = reqwest::Proxy::all(proxy_url)
				.map_err(|e| BridgeError::Api(format!("Invalid proxy URL: {}", e)))?;
			builder = builder.proxy(proxy);
		}

		let client = builder
			.build()
			.map_err(|e| BridgeError::Api(format!("Failed to build HTTP client: {}", e)))?;

		Ok(Self {
			client,
			base_url: base_url.trim_end_matches('/').to_string(),
		})
	}

	async fn read_json<T: serde::de::DeserializeOwned>(
		response: reqwest::Response,
		context: &str,
	) -> Result<T, BridgeError> {
		if !response.status().is_success() {
			let status = response.status();
			let body = response.text().await.unwrap_or_default();
			return Err(BridgeError::Api(format!(
				"{} returned {}: {}",
				context, status, body
			)));
		}

		response
			.json()
			.await
			.map_err(|e| BridgeError::Api(format!("{} returned invalid JSON: {}", context, e)))
	}
}

#[async_trait]
impl BridgeApi for RelayApi {
	async fn quote(&self, request: &QuoteRequest) -> Result<QuoteResponse, BridgeError> {
		let url = format!("{}/quote", self.base_url);
		let response = self
			.client
			.post(&url)
			.json(request)
			.send()
			.await
			.map_err(|e| BridgeError::Api(format!("POST {} failed: {}", url, e)))?;

		Self::read_json(response, "quote").await
	}

	async fn deposit_status(&self, request_id: &str) -> Result<DepositStatus, BridgeError> {
		let url = format!("{}/intents/status", self.base_url);
		let response = self
			.client
			.get(&url)
			.query(&[("requestId", request_id)])
			.send()
			.await
			.map_err(|e| BridgeError::Api(format!("GET {} failed: {}", url, e)))?;

		Self::read_json(response, "intents/status").await
	}

	async fn execution_receipt(&self, request_id: &str) -> Result<RequestsPage, BridgeError> {
		let url = format!("{}/requests/v2", self.base_url);
		let response = self
			.client
			.get(&url)
			.query(&[("id", request_id)])
			.send()
			.await
			.map_err(|e| BridgeError::Api(format!("GET {} failed: {}", url, e)))?;

		Self::read_json(response, "requests/v2").await
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn trailing_slash_is_trimmed() {
		let api = RelayApi::new("https://api.relay.link/", None).unwrap();
		assert_eq!(api.base_url, "https://api.relay.link");
	}

	#[test]
	fn rejects_malformed_proxy() {
		let result = RelayApi::new("https://api.relay.link", Some("http://["));
		assert!(matches!(result, Err(BridgeError::Api(_))));
	}
}
