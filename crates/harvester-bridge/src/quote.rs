//! Refuel quote requests and validation.

use crate::types::{QuoteRequest, TxTemplate};
use crate::{BridgeApi, BridgeError};
use alloy::primitives::{Address, U256};
use harvester_types::Network;
use std::sync::Arc;

/// Referrer tag sent with every quote.
const REFERRER: &str = "relay.link/swap";
/// Zero address, the bridge's marker for the native currency.
const NATIVE_CURRENCY: &str = "0x0000000000000000000000000000000000000000";

/// A validated quote, flattened to the parts the refuel flow executes.
#[derive(Debug, Clone)]
pub struct RefuelQuote {
	/// Id the confirmation endpoints are polled with.
	pub request_id: String,
	/// Deposit transaction to submit on the origin chain.
	pub tx: TxTemplate,
}

/// Requests bridge quotes for native-currency refuels.
pub struct QuoteClient {
	api: Arc<dyn BridgeApi>,
}

impl QuoteClient {
	pub fn new(api: Arc<dyn BridgeApi>) -> Self {
		Self { api }
	}

	/// Quotes a native-to-native transfer that lands on the wallet's own
	/// address on the destination chain.
	///
	/// A response without steps, items, or a request id cannot be executed
	/// and is rejected as an invalid quote rather than retried, as is a
	/// deposit template aimed at a chain other than the origin.
	pub async fn refuel_quote(
		&self,
		user: Address,
		origin: &Network,
		destination: &Network,
		amount_wei: U256,
	) -> Result<RefuelQuote, BridgeError> {
		let request = QuoteRequest {
			user: user.to_string(),
			origin_chain_id: origin.chain_id,
			destination_chain_id: destination.chain_id,
			origin_currency: NATIVE_CURRENCY.to_string(),
			destination_currency: NATIVE_CURRENCY.to_string(),
			recipient: user.to_string(),
			trade_type: "EXACT_INPUT".to_string(),
			amount: amount_wei.to_string(),
			referrer: REFERRER.to_string(),
			use_external_liquidity: false,
			use_deposit_address: false,
		};

		let response = self.api.quote(&request).await?;

		let step = response
			.steps
			.first()
			.ok_or_else(|| BridgeError::InvalidQuote("quote has no steps".to_string()))?;
		let item = step
			.items
			.first()
			.ok_or_else(|| BridgeError::InvalidQuote("quote step has no items".to_string()))?;
		if let Some(chain_id) = item.data.chain_id {
			if chain_id != origin.chain_id {
				return Err(BridgeError::InvalidQuote(format!(
					"deposit targets chain {} instead of {}",
					chain_id, origin.chain_id
				)));
			}
		}
		let request_id = step
			.request_id
			.clone()
			.ok_or_else(|| BridgeError::InvalidQuote("quote step has no request id".to_string()))?;

		Ok(RefuelQuote {
			request_id,
			tx: item.data.clone(),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::types::{DepositStatus, QuoteResponse, QuoteStep, RequestsPage, StepItem};
	use alloy::primitives::address;
	use async_trait::async_trait;
	use std::sync::Mutex;

	struct ScriptedApi {
		response: Mutex<Option<QuoteResponse>>,
		seen: Mutex<Option<QuoteRequest>>,
	}

	impl ScriptedApi {
		fn returning(response: QuoteResponse) -> Arc<Self> {
			Arc::new(Self {
				response: Mutex::new(Some(response)),
				seen: Mutex::new(None),
			})
		}
	}

	#[async_trait]
	impl BridgeApi for ScriptedApi {
		async fn quote(&self, request: &QuoteRequest) -> Result<QuoteResponse, BridgeError> {
			*self.seen.lock().unwrap() = Some(request.clone());
			Ok(self.response.lock().unwrap().take().unwrap())
		}

		async fn deposit_status(&self, _request_id: &str) -> Result<DepositStatus, BridgeError> {
			unreachable!("not used by quote tests")
		}

		async fn execution_receipt(&self, _request_id: &str) -> Result<RequestsPage, BridgeError> {
			unreachable!("not used by quote tests")
		}
	}

	fn template() -> TxTemplate {
		serde_json::from_value(serde_json::json!({
			"to": "0xa5F565650890fBA1824Ee0F21EbBbF660a179934",
			"data": "0x01",
			"value": "55000000000000",
			"chainId": 10,
		}))
		.unwrap()
	}

	fn networks() -> (&'static Network, &'static Network) {
		(
			Network::by_name("optimism").unwrap(),
			Network::by_name("swell").unwrap(),
		)
	}

	const USER: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");

	#[tokio::test]
	async fn valid_quote_flattens_to_first_step() {
		let api = ScriptedApi::returning(QuoteResponse {
			steps: vec![QuoteStep {
				request_id: Some("0xreq".to_string()),
				items: vec![StepItem { data: template() }],
			}],
		});
		let client = QuoteClient::new(api.clone());
		let (origin, destination) = networks();

		let quote = client
			.refuel_quote(USER, origin, destination, U256::from(55_000_000_000_000u64))
			.await
			.unwrap();
		assert_eq!(quote.request_id, "0xreq");
		assert_eq!(quote.tx.value, "55000000000000");

		// Self-refuel in the bridge's native-currency encoding.
		let seen = api.seen.lock().unwrap().clone().unwrap();
		assert_eq!(seen.user, seen.recipient);
		assert_eq!(seen.origin_chain_id, 10);
		assert_eq!(seen.destination_chain_id, 1923);
		assert_eq!(seen.origin_currency, NATIVE_CURRENCY);
		assert_eq!(seen.destination_currency, NATIVE_CURRENCY);
		assert_eq!(seen.trade_type, "EXACT_INPUT");
		assert_eq!(seen.referrer, REFERRER);
		assert!(!seen.use_external_liquidity);
		assert!(!seen.use_deposit_address);
	}

	#[tokio::test]
	async fn quote_without_steps_is_invalid() {
		let api = ScriptedApi::returning(QuoteResponse { steps: vec![] });
		let client = QuoteClient::new(api);
		let (origin, destination) = networks();

		let err = client
			.refuel_quote(USER, origin, destination, U256::from(1u64))
			.await
			.unwrap_err();
		assert!(matches!(err, BridgeError::InvalidQuote(_)));
	}

	#[tokio::test]
	async fn quote_without_items_is_invalid() {
		let api = ScriptedApi::returning(QuoteResponse {
			steps: vec![QuoteStep {
				request_id: Some("0xreq".to_string()),
				items: vec![],
			}],
		});
		let client = QuoteClient::new(api);
		let (origin, destination) = networks();

		let err = client
			.refuel_quote(USER, origin, destination, U256::from(1u64))
			.await
			.unwrap_err();
		assert!(matches!(err, BridgeError::InvalidQuote(_)));
	}

	#[tokio::test]
	async fn deposit_on_the_wrong_chain_is_invalid() {
		let mut wrong = template();
		wrong.chain_id = Some(8453);
		let api = ScriptedApi::returning(QuoteResponse {
			steps: vec![QuoteStep {
				request_id: Some("0xreq".to_string()),
				items: vec![StepItem { data: wrong }],
			}],
		});
		let client = QuoteClient::new(api);
		let (origin, destination) = networks();

		let err = client
			.refuel_quote(USER, origin, destination, U256::from(1u64))
			.await
			.unwrap_err();
		match err {
			BridgeError::InvalidQuote(reason) => assert!(reason.contains("8453")),
			other => panic!("expected InvalidQuote, got {:?}", other),
		}
	}

	#[tokio::test]
	async fn quote_without_request_id_is_invalid() {
		let api = ScriptedApi::returning(QuoteResponse {
			steps: vec![QuoteStep {
				request_id: None,
				items: vec![StepItem { data: template() }],
			}],
		});
		let client = QuoteClient::new(api);
		let (origin, destination) = networks();

		let err = client
			.refuel_quote(USER, origin, destination, U256::from(1u64))
			.await
			.unwrap_err();
		match err {
			BridgeError::InvalidQuote(reason) => assert!(reason.contains("request id")),
			other => panic!("expected InvalidQuote, got {:?}", other),
		}
	}
}
