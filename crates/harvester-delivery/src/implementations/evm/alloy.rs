//! Alloy-backed chain access.
//!
//! One `AlloyChain` wraps one HTTP provider for one network. Fee sampling
//! follows the network's fee mode from the registry: EIP-1559 networks pay
//! the node's suggested priority fee on top of the latest base fee with no
//! added headroom, legacy networks pay the node's gas price.

use crate::{erc20, ChainInterface, DeliveryError};
use alloy::eips::BlockNumberOrTag;
use alloy::primitives::{Address, TxKind, B256, U256};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::{TransactionInput, TransactionRequest as RpcTransactionRequest};
use async_trait::async_trait;
use harvester_types::{GasFees, Network, TransactionReceipt, TransactionRequest};
use std::sync::Arc;
use std::time::Duration;

/// Seconds between receipt lookups while waiting for inclusion.
const RECEIPT_POLL_SECS: u64 = 5;

/// HTTP connection to one EVM network.
pub struct AlloyChain {
	network: &'static Network,
	provider: Arc<dyn Provider + Send + Sync>,
	receipt_timeout: Duration,
}

impl AlloyChain {
	/// Connects to a network over HTTP.
	pub fn connect(
		network: &'static Network,
		rpc_url: &str,
		receipt_timeout: Duration,
	) -> Result<Self, DeliveryError> {
		let url = rpc_url.parse().map_err(|e| {
			DeliveryError::Network(format!("Invalid RPC URL for {}: {}", network.name, e))
		})?;
		let provider = ProviderBuilder::new().connect_http(url);

		Ok(Self {
			network,
			provider: Arc::new(provider) as Arc<dyn Provider + Send + Sync>,
			receipt_timeout,
		})
	}

	/// Converts a canonical request into the node's wire format.
	fn to_rpc_request(&self, request: &TransactionRequest) -> RpcTransactionRequest {
		let mut rpc = RpcTransactionRequest {
			from: Some(request.from),
			to: Some(TxKind::Call(request.to)),
			value: Some(request.value),
			input: TransactionInput::new(request.input.clone()),
			nonce: Some(request.nonce),
			chain_id: Some(request.chain_id),
			..Default::default()
		};
		match request.fees {
			GasFees::Legacy { gas_price } => {
				rpc.gas_price = Some(gas_price);
			}
			GasFees::Eip1559 {
				max_fee_per_gas,
				max_priority_fee_per_gas,
			} => {
				rpc.max_fee_per_gas = Some(max_fee_per_gas);
				rpc.max_priority_fee_per_gas = Some(max_priority_fee_per_gas);
			}
		}
		rpc
	}
}

/// Combines a base fee and a priority fee into an exact-cost fee quote.
fn eip1559_fees(base_fee: u64, priority_fee: u128) -> GasFees {
	GasFees::Eip1559 {
		max_fee_per_gas: priority_fee + base_fee as u128,
		max_priority_fee_per_gas: priority_fee,
	}
}

#[async_trait]
impl ChainInterface for AlloyChain {
	fn network(&self) -> &'static Network {
		self.network
	}

	async fn native_balance(&self, address: Address) -> Result<U256, DeliveryError> {
		self.provider
			.get_balance(address)
			.await
			.map_err(|e| DeliveryError::Rpc(format!("Failed to get balance: {}", e)))
	}

	async fn token_balance(&self, token: Address, owner: Address) -> Result<U256, DeliveryError> {
		let call = RpcTransactionRequest {
			to: Some(TxKind::Call(token)),
			input: TransactionInput::new(erc20::balance_of_call(owner)),
			..Default::default()
		};

		let result = self
			.provider
			.call(call)
			.await
			.map_err(|e| DeliveryError::Rpc(format!("Failed to call balanceOf: {}", e)))?;

		erc20::decode_uint(&result)
			.ok_or_else(|| DeliveryError::Rpc("Invalid balanceOf response".to_string()))
	}

	async fn token_decimals(&self, token: Address) -> Result<u8, DeliveryError> {
		let call = RpcTransactionRequest {
			to: Some(TxKind::Call(token)),
			input: TransactionInput::new(erc20::decimals_call()),
			..Default::default()
		};

		let result = self
			.provider
			.call(call)
			.await
			.map_err(|e| DeliveryError::Rpc(format!("Failed to call decimals: {}", e)))?;

		erc20::decode_uint(&result)
			.and_then(|value| u8::try_from(value).ok())
			.ok_or_else(|| DeliveryError::Rpc("Invalid decimals response".to_string()))
	}

	async fn nonce(&self, address: Address) -> Result<u64, DeliveryError> {
		self.provider
			.get_transaction_count(address)
			.await
			.map_err(|e| DeliveryError::Rpc(format!("Failed to get nonce: {}", e)))
	}

	async fn gas_fees(&self) -> Result<GasFees, DeliveryError> {
		if !self.network.eip1559 {
			let gas_price = self
				.provider
				.get_gas_price()
				.await
				.map_err(|e| DeliveryError::Rpc(format!("Failed to get gas price: {}", e)))?;
			return Ok(GasFees::Legacy { gas_price });
		}

		let priority_fee = self
			.provider
			.get_max_priority_fee_per_gas()
			.await
			.map_err(|e| DeliveryError::Rpc(format!("Failed to get priority fee: {}", e)))?;

		let block = self
			.provider
			.get_block_by_number(BlockNumberOrTag::Latest)
			.await
			.map_err(|e| DeliveryError::Rpc(format!("Failed to get latest block: {}", e)))?
			.ok_or_else(|| DeliveryError::Rpc("Latest block unavailable".to_string()))?;

		let base_fee = block.header.base_fee_per_gas.ok_or_else(|| {
			DeliveryError::Rpc(format!("No base fee in latest block on {}", self.network.name))
		})?;

		Ok(eip1559_fees(base_fee, priority_fee))
	}

	async fn estimate_gas(&self, request: &TransactionRequest) -> Result<u64, DeliveryError> {
		self.provider
			.estimate_gas(self.to_rpc_request(request))
			.await
			.map_err(|e| DeliveryError::Rpc(format!("Failed to estimate gas: {}", e)))
	}

	async fn broadcast(&self, raw: &[u8]) -> Result<B256, DeliveryError> {
		let pending = self
			.provider
			.send_raw_transaction(raw)
			.await
			.map_err(|e| DeliveryError::Rpc(e.to_string()))?;

		Ok(*pending.tx_hash())
	}

	async fn wait_for_receipt(&self, hash: B256) -> Result<TransactionReceipt, DeliveryError> {
		let poll_interval = Duration::from_secs(RECEIPT_POLL_SECS);
		let start = tokio::time::Instant::now();

		loop {
			if start.elapsed() > self.receipt_timeout {
				return Err(DeliveryError::ReceiptTimeout(self.receipt_timeout.as_secs()));
			}

			match self.provider.get_transaction_receipt(hash).await {
				Ok(Some(receipt)) => {
					return Ok(TransactionReceipt {
						hash,
						block_number: receipt.block_number.unwrap_or(0),
						success: receipt.status(),
					});
				}
				Ok(None) => {
					// Not yet mined, wait and retry
					tokio::time::sleep(poll_interval).await;
				}
				Err(e) => {
					return Err(DeliveryError::Rpc(format!("Failed to get receipt: {}", e)));
				}
			}
		}
	}
}
