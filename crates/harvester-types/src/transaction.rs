//! Canonical transaction records and submission outcomes.
//!
//! `TransactionRequest` is the pre-signing record every component agrees on.
//! Fee fields are a tagged enum rather than a bag of options: a request is
//! either legacy-priced or EIP-1559-priced, never both, never neither.

use alloy::primitives::{Address, Bytes, B256, U256};

/// Fee fields for one transaction, in exactly one fee mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GasFees {
	/// Pre-EIP-1559 pricing.
	Legacy {
		/// Gas price in wei.
		gas_price: u128,
	},
	/// EIP-1559 dynamic-fee pricing.
	Eip1559 {
		/// Fee cap in wei. Computed as priority fee plus latest base fee.
		max_fee_per_gas: u128,
		/// Tip in wei, as suggested by the node.
		max_priority_fee_per_gas: u128,
	},
}

/// A fully assembled transaction, ready to sign.
#[derive(Debug, Clone)]
pub struct TransactionRequest {
	/// Target chain id.
	pub chain_id: u64,
	/// Sender address.
	pub from: Address,
	/// Recipient contract or wallet.
	pub to: Address,
	/// Native value in wei.
	pub value: U256,
	/// Calldata.
	pub input: Bytes,
	/// Sender nonce.
	pub nonce: u64,
	/// Gas limit. Estimated after the fee fields are populated.
	pub gas_limit: u64,
	/// Fee fields in the network's fee mode.
	pub fees: GasFees,
}

/// Receipt facts the harvester cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionReceipt {
	/// Transaction hash.
	pub hash: B256,
	/// Block the transaction landed in.
	pub block_number: u64,
	/// Whether execution succeeded.
	pub success: bool,
}

/// What became of one submission attempt.
///
/// Produced exactly once per attempt by the executor. `Failed` is terminal
/// and never retried; `AlreadyPending` means the node already knew the
/// transaction, which callers treat as a soft success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionOutcome {
	/// Receipt arrived and execution succeeded.
	Confirmed(B256),
	/// The node reported the transaction as already known. The hash is the
	/// locally computed hash of the signed payload when available.
	AlreadyPending(Option<B256>),
	/// Terminal failure: an on-chain revert or an "insufficient funds"
	/// rejection at broadcast time.
	Failed(String),
	/// Any other RPC-level rejection, including a receipt that never
	/// arrived within the wait budget.
	RpcRejected(String),
}

impl TransactionOutcome {
	/// True when the submission needs no further action from the caller.
	pub fn is_success(&self) -> bool {
		matches!(
			self,
			TransactionOutcome::Confirmed(_) | TransactionOutcome::AlreadyPending(_)
		)
	}

	/// The failure reason, for outcomes that carry one.
	pub fn failure_reason(&self) -> Option<&str> {
		match self {
			TransactionOutcome::Failed(reason) | TransactionOutcome::RpcRejected(reason) => {
				Some(reason)
			}
			_ => None,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy::primitives::B256;

	#[test]
	fn outcome_success_classification() {
		assert!(TransactionOutcome::Confirmed(B256::ZERO).is_success());
		assert!(TransactionOutcome::AlreadyPending(None).is_success());
		assert!(TransactionOutcome::AlreadyPending(Some(B256::ZERO)).is_success());
		assert!(!TransactionOutcome::Failed("reverted".into()).is_success());
		assert!(!TransactionOutcome::RpcRejected("nonce too low".into()).is_success());
	}

	#[test]
	fn failure_reason_only_on_failures() {
		assert_eq!(
			TransactionOutcome::Failed("reverted".into()).failure_reason(),
			Some("reverted")
		);
		assert_eq!(
			TransactionOutcome::RpcRejected("underpriced".into()).failure_reason(),
			Some("underpriced")
		);
		assert_eq!(TransactionOutcome::Confirmed(B256::ZERO).failure_reason(), None);
	}
}
