//! Signed transaction submission with outcome classification.

use crate::{ChainInterface, DeliveryError};
use alloy::primitives::B256;
use harvester_account::Signer;
use harvester_types::{TransactionOutcome, TransactionRequest};
use std::sync::Arc;

/// Signs canonical transaction records and submits them through one chain
/// connection, resolving every path to a [`TransactionOutcome`].
///
/// The executor never returns an error for a submission: signing failures,
/// node rejections, reverts, and receipt timeouts all become outcomes, and
/// callers decide what each one means for the surrounding flow.
pub struct TransactionExecutor {
	chain: Arc<dyn ChainInterface>,
	signer: Signer,
}

impl TransactionExecutor {
	/// Creates an executor for one wallet on one chain.
	pub fn new(chain: Arc<dyn ChainInterface>, signer: Signer) -> Self {
		Self { chain, signer }
	}

	/// Signs and broadcasts a transaction, then waits for its receipt.
	///
	/// `label` names the operation in logs, e.g. `"[2/10] claim"`.
	pub async fn submit(&self, request: &TransactionRequest, label: &str) -> TransactionOutcome {
		let signed = match self.signer.sign_transaction(request) {
			Ok(signed) => signed,
			Err(e) => {
				tracing::error!(label, error = %e, "Failed to sign transaction");
				return TransactionOutcome::Failed(e.to_string());
			}
		};

		let hash = match self.chain.broadcast(&signed.raw).await {
			Ok(hash) => hash,
			Err(e) => return classify_broadcast_error(&e.to_string(), signed.hash, label),
		};

		tracing::info!(
			label,
			tx = %self.chain.network().explorer_tx_url(&hash),
			"Transaction broadcast"
		);

		match self.chain.wait_for_receipt(hash).await {
			Ok(receipt) if receipt.success => {
				tracing::info!(label, block = receipt.block_number, "Transaction confirmed");
				TransactionOutcome::Confirmed(hash)
			}
			Ok(_) => {
				tracing::error!(
					label,
					tx = %self.chain.network().explorer_tx_url(&hash),
					"Transaction reverted"
				);
				TransactionOutcome::Failed(format!("reverted on chain: {}", hash))
			}
			Err(DeliveryError::ReceiptTimeout(secs)) => {
				tracing::error!(label, timeout_secs = secs, "No receipt before timeout");
				TransactionOutcome::RpcRejected(format!("no receipt after {} seconds", secs))
			}
			Err(e) => {
				tracing::error!(label, error = %e, "Receipt lookup failed");
				TransactionOutcome::RpcRejected(e.to_string())
			}
		}
	}
}

/// Maps a broadcast rejection to an outcome by the node's error text.
///
/// "already known" means an identical payload is in the mempool, so the
/// locally computed hash still identifies the pending transaction.
fn classify_broadcast_error(message: &str, local_hash: B256, label: &str) -> TransactionOutcome {
	let lowered = message.to_lowercase();
	if lowered.contains("insufficient funds") {
		tracing::error!(label, error = message, "Broadcast rejected: insufficient funds");
		TransactionOutcome::Failed(message.to_string())
	} else if lowered.contains("already known") {
		tracing::warn!(label, tx_hash = %local_hash, "Transaction already in the mempool");
		TransactionOutcome::AlreadyPending(Some(local_hash))
	} else {
		tracing::error!(label, error = message, "Broadcast rejected by node");
		TransactionOutcome::RpcRejected(message.to_string())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy::primitives::{address, b256, Address, Bytes, U256};
	use async_trait::async_trait;
	use harvester_types::{GasFees, Network, SecretString, TransactionReceipt};
	use std::sync::Mutex;

	const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
	const HASH: B256 = b256!("1111111111111111111111111111111111111111111111111111111111111111");

	struct ScriptedChain {
		broadcast_result: Mutex<Option<Result<B256, DeliveryError>>>,
		receipt_result: Mutex<Option<Result<TransactionReceipt, DeliveryError>>>,
		receipt_calls: Mutex<usize>,
	}

	impl ScriptedChain {
		fn new(
			broadcast: Result<B256, DeliveryError>,
			receipt: Option<Result<TransactionReceipt, DeliveryError>>,
		) -> Arc<Self> {
			Arc::new(Self {
				broadcast_result: Mutex::new(Some(broadcast)),
				receipt_result: Mutex::new(receipt),
				receipt_calls: Mutex::new(0),
			})
		}
	}

	#[async_trait]
	impl ChainInterface for ScriptedChain {
		fn network(&self) -> &'static Network {
			Network::by_name("swell").unwrap()
		}

		async fn native_balance(&self, _address: Address) -> Result<U256, DeliveryError> {
			Ok(U256::ZERO)
		}

		async fn token_balance(
			&self,
			_token: Address,
			_owner: Address,
		) -> Result<U256, DeliveryError> {
			Ok(U256::ZERO)
		}

		async fn token_decimals(&self, _token: Address) -> Result<u8, DeliveryError> {
			Ok(18)
		}

		async fn nonce(&self, _address: Address) -> Result<u64, DeliveryError> {
			Ok(0)
		}

		async fn gas_fees(&self) -> Result<GasFees, DeliveryError> {
			Ok(GasFees::Legacy { gas_price: 1 })
		}

		async fn estimate_gas(&self, _request: &TransactionRequest) -> Result<u64, DeliveryError> {
			Ok(21_000)
		}

		async fn broadcast(&self, _raw: &[u8]) -> Result<B256, DeliveryError> {
			self.broadcast_result.lock().unwrap().take().unwrap()
		}

		async fn wait_for_receipt(&self, _hash: B256) -> Result<TransactionReceipt, DeliveryError> {
			*self.receipt_calls.lock().unwrap() += 1;
			self.receipt_result.lock().unwrap().take().unwrap()
		}
	}

	fn signer() -> Signer {
		Signer::from_key(&SecretString::from(DEV_KEY)).unwrap()
	}

	fn request() -> TransactionRequest {
		TransactionRequest {
			chain_id: 1923,
			from: address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266"),
			to: address!("3Ef3D8bA38EBe18DB133cEc108f4D14CE00Dd9Ae"),
			value: U256::ZERO,
			input: Bytes::new(),
			nonce: 3,
			gas_limit: 90_000,
			fees: GasFees::Eip1559 {
				max_fee_per_gas: 1_200_000_000,
				max_priority_fee_per_gas: 1_000_000_000,
			},
		}
	}

	fn ok_receipt(success: bool) -> Result<TransactionReceipt, DeliveryError> {
		Ok(TransactionReceipt {
			hash: HASH,
			block_number: 812,
			success,
		})
	}

	#[tokio::test]
	async fn successful_receipt_confirms() {
		let chain = ScriptedChain::new(Ok(HASH), Some(ok_receipt(true)));
		let executor = TransactionExecutor::new(chain, signer());

		let outcome = executor.submit(&request(), "test claim").await;
		assert_eq!(outcome, TransactionOutcome::Confirmed(HASH));
		assert!(outcome.is_success());
	}

	#[tokio::test]
	async fn reverted_receipt_fails() {
		let chain = ScriptedChain::new(Ok(HASH), Some(ok_receipt(false)));
		let executor = TransactionExecutor::new(chain, signer());

		let outcome = executor.submit(&request(), "test claim").await;
		assert!(matches!(outcome, TransactionOutcome::Failed(_)));
	}

	#[tokio::test]
	async fn insufficient_funds_fails_without_receipt_lookup() {
		let chain = ScriptedChain::new(
			Err(DeliveryError::Rpc(
				"Insufficient funds for gas * price + value".to_string(),
			)),
			None,
		);
		let executor = TransactionExecutor::new(chain.clone(), signer());

		let outcome = executor.submit(&request(), "test claim").await;
		assert!(matches!(outcome, TransactionOutcome::Failed(_)));
		assert_eq!(*chain.receipt_calls.lock().unwrap(), 0);
	}

	#[tokio::test]
	async fn already_known_reports_local_hash() {
		let chain = ScriptedChain::new(
			Err(DeliveryError::Rpc("already known".to_string())),
			None,
		);
		let executor = TransactionExecutor::new(chain, signer());

		let outcome = executor.submit(&request(), "test claim").await;
		let expected = signer().sign_transaction(&request()).unwrap().hash;
		assert_eq!(outcome, TransactionOutcome::AlreadyPending(Some(expected)));
		assert!(outcome.is_success());
	}

	#[tokio::test]
	async fn unrecognized_rejection_is_rpc_rejected() {
		let chain = ScriptedChain::new(
			Err(DeliveryError::Rpc("nonce too low".to_string())),
			None,
		);
		let executor = TransactionExecutor::new(chain, signer());

		let outcome = executor.submit(&request(), "test claim").await;
		assert!(matches!(outcome, TransactionOutcome::RpcRejected(_)));
	}

	#[tokio::test]
	async fn receipt_timeout_is_rpc_rejected_not_failed() {
		let chain = ScriptedChain::new(Ok(HASH), Some(Err(DeliveryError::ReceiptTimeout(400))));
		let executor = TransactionExecutor::new(chain, signer());

		let outcome = executor.submit(&request(), "test claim").await;
		match outcome {
			TransactionOutcome::RpcRejected(reason) => {
				assert!(reason.contains("400 seconds"));
			}
			other => panic!("expected RpcRejected, got {:?}", other),
		}
	}
}
