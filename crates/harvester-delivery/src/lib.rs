//! Chain access and transaction submission for the reward harvester.
//!
//! This module provides the read/write interface to EVM networks: balance and
//! nonce queries, fee sampling, gas estimation, raw broadcast, and receipt
//! polling. On top of it sits `TransactionExecutor`, which signs canonical
//! transaction records and folds every submission path into a single outcome
//! the orchestration layer can act on.

use alloy::primitives::{Address, Bytes, B256, U256};
use async_trait::async_trait;
use harvester_types::{GasFees, Network, TransactionReceipt, TransactionRequest};
use thiserror::Error;

pub mod erc20;
mod executor;

/// Re-export implementations
pub mod implementations {
	pub mod evm {
		pub mod alloy;
	}
}

pub use executor::TransactionExecutor;
pub use implementations::evm::alloy::AlloyChain;

/// Errors that can occur during chain operations.
#[derive(Debug, Error)]
pub enum DeliveryError {
	/// Error that occurs during network communication.
	#[error("Network error: {0}")]
	Network(String),
	/// Error returned by the node for a well-formed request.
	#[error("RPC error: {0}")]
	Rpc(String),
	/// Error that occurs when a broadcast transaction is never mined.
	#[error("No receipt after {0} seconds")]
	ReceiptTimeout(u64),
}

/// Trait defining read and write access to one EVM network.
///
/// Implementations hold a connection to a single chain; the orchestration
/// layer opens one per network it touches. The default `build_transaction`
/// encodes the assembly order every implementation must preserve.
#[async_trait]
pub trait ChainInterface: Send + Sync {
	/// The network this connection serves.
	fn network(&self) -> &'static Network;

	/// Native token balance of an address, in wei.
	async fn native_balance(&self, address: Address) -> Result<U256, DeliveryError>;

	/// ERC-20 balance of an owner, in the token's smallest unit.
	async fn token_balance(&self, token: Address, owner: Address) -> Result<U256, DeliveryError>;

	/// Decimal places of an ERC-20 token, read from the contract.
	async fn token_decimals(&self, token: Address) -> Result<u8, DeliveryError>;

	/// Next valid nonce for an address.
	async fn nonce(&self, address: Address) -> Result<u64, DeliveryError>;

	/// Current fee quote in the network's fee mode.
	///
	/// EIP-1559 networks return the node's suggested priority fee plus the
	/// latest block's base fee, with no added headroom. Legacy networks
	/// return the node's gas price.
	async fn gas_fees(&self) -> Result<GasFees, DeliveryError>;

	/// Gas units the node expects the request to consume.
	async fn estimate_gas(&self, request: &TransactionRequest) -> Result<u64, DeliveryError>;

	/// Submits a signed payload and returns the node-reported hash.
	async fn broadcast(&self, raw: &[u8]) -> Result<B256, DeliveryError>;

	/// Blocks until the transaction is mined or the receipt timeout passes.
	async fn wait_for_receipt(&self, hash: B256) -> Result<TransactionReceipt, DeliveryError>;

	/// Assembles a ready-to-sign transaction record.
	///
	/// Fetches the nonce and fee quote first, then estimates gas against the
	/// request with those fields already populated, so the node prices the
	/// call exactly as it will be submitted.
	async fn build_transaction(
		&self,
		from: Address,
		to: Address,
		value: U256,
		input: Bytes,
	) -> Result<TransactionRequest, DeliveryError> {
		let nonce = self.nonce(from).await?;
		let fees = self.gas_fees().await?;

		let mut request = TransactionRequest {
			chain_id: self.network().chain_id,
			from,
			to,
			value,
			input,
			nonce,
			gas_limit: 0,
			fees,
		};
		request.gas_limit = self.estimate_gas(&request).await?;

		Ok(request)
	}
}
