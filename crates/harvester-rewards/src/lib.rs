//! Rewards API access: eligibility lookups and claim calldata.
//!
//! The distributor's API (Merkl-style) both reports what each wallet can
//! claim and builds the claim transaction's calldata server-side; the
//! harvester never encodes a Merkle claim itself. The HTTP surface sits
//! behind the `RewardsApi` trait so eligibility and claim assembly can be
//! tested against scripted responses.

use alloy::primitives::Address;
use async_trait::async_trait;
use thiserror::Error;

pub mod claimer;
pub mod types;

/// Re-export implementations
pub mod implementations {
	pub mod merkl;
}

pub use claimer::{RewardEntry, RewardsClaimer};
pub use implementations::merkl::MerklApi;
pub use types::{ClaimCalldata, ClaimRequest, RewardBundle, RewardRecord, RewardToken};

/// Errors that can occur during rewards operations.
#[derive(Debug, Error)]
pub enum RewardsError {
	/// Error returned by the rewards HTTP API or the transport.
	#[error("Rewards API error: {0}")]
	Api(String),
	/// Error that occurs when a claim response cannot be turned into a
	/// transaction.
	#[error("Invalid claim response: {0}")]
	InvalidClaim(String),
}

/// Trait defining the rewards endpoints the harvester consumes.
#[async_trait]
pub trait RewardsApi: Send + Sync {
	/// Per-chain reward bundles for one wallet.
	async fn rewards(
		&self,
		address: Address,
		chain_id: u64,
	) -> Result<Vec<RewardBundle>, RewardsError>;

	/// Server-built calldata for one claim.
	async fn claim_calldata(&self, request: &ClaimRequest) -> Result<ClaimCalldata, RewardsError>;
}
