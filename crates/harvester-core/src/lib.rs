//! Batch orchestration for the reward harvester.
//!
//! This crate drives a complete run: it walks the wallet list in order,
//! executes the selected action for each wallet behind an error boundary,
//! and paces the run with randomized delays. The claim flow stitches the
//! other services together: eligibility lookup, an optional cross-chain gas
//! refuel, the claim transaction itself, and optional token forwarding.

use harvester_account::AccountError;
use harvester_bridge::BridgeError;
use harvester_delivery::DeliveryError;
use harvester_rewards::RewardsError;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

mod runner;
mod utils;

pub use runner::Runner;

/// What the run does for each wallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
	/// Claim rewards, refueling gas on the claim chain first when needed.
	Claim,
	/// Report eligibility without sending any transaction.
	Check,
}

impl FromStr for Action {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().as_str() {
			"claim" => Ok(Action::Claim),
			"check" => Ok(Action::Check),
			other => Err(format!("unknown action '{}', expected claim or check", other)),
		}
	}
}

impl fmt::Display for Action {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Action::Claim => write!(f, "claim"),
			Action::Check => write!(f, "check"),
		}
	}
}

/// Errors that can occur while running wallet actions.
#[derive(Debug, Error)]
pub enum RunError {
	/// Error that occurs when loading a wallet key.
	#[error("Account error: {0}")]
	Account(#[from] AccountError),
	/// Error from the chain the action runs against.
	#[error("Delivery error: {0}")]
	Delivery(#[from] DeliveryError),
	/// Error from the bridge API.
	#[error("Bridge error: {0}")]
	Bridge(#[from] BridgeError),
	/// Error from the rewards API.
	#[error("Rewards error: {0}")]
	Rewards(#[from] RewardsError),
	/// Error that occurs when a submitted transaction does not land.
	#[error("Transaction failed: {0}")]
	Transaction(String),
	/// Error that occurs when no source chain can fund a refuel.
	#[error("No source chain with sufficient balance")]
	NoSourceChain,
	/// Error that occurs when configuration references an unknown network.
	#[error("Configuration error: {0}")]
	Config(String),
}
