//! Bridge API access for cross-chain refuels.
//!
//! The harvester moves small amounts of native currency between chains
//! through a Relay-style bridge: request a quote, submit the deposit
//! transaction the quote carries, then poll two endpoints until the bridge
//! confirms the deposit and indexes the transfer. The HTTP surface sits
//! behind the `BridgeApi` trait so the quote client and the poller can be
//! exercised against scripted responses.

use async_trait::async_trait;
use thiserror::Error;

pub mod poller;
pub mod quote;
pub mod types;

/// Re-export implementations
pub mod implementations {
	pub mod relay;
}

pub use implementations::relay::RelayApi;
pub use poller::ConfirmationPoller;
pub use quote::{QuoteClient, RefuelQuote};
pub use types::{DepositStatus, QuoteRequest, QuoteResponse, RequestsPage, TxTemplate};

/// Errors that can occur during bridge operations.
#[derive(Debug, Error)]
pub enum BridgeError {
	/// Error returned by the bridge HTTP API or the transport.
	#[error("Bridge API error: {0}")]
	Api(String),
	/// Error that occurs when a quote response cannot be executed. Terminal:
	/// a malformed quote never becomes usable by retrying.
	#[error("Invalid quote: {0}")]
	InvalidQuote(String),
	/// Error that occurs when a polling loop runs out of attempts.
	#[error("No confirmation from {endpoint} after {attempts} attempts")]
	Exhausted {
		endpoint: &'static str,
		attempts: u32,
	},
}

/// Trait defining the bridge HTTP endpoints the harvester consumes.
#[async_trait]
pub trait BridgeApi: Send + Sync {
	/// Requests an executable quote for a transfer.
	async fn quote(&self, request: &QuoteRequest) -> Result<QuoteResponse, BridgeError>;

	/// Reads the deposit status for a quoted transfer.
	async fn deposit_status(&self, request_id: &str) -> Result<DepositStatus, BridgeError>;

	/// Reads the indexed execution record for a quoted transfer.
	async fn execution_receipt(&self, request_id: &str) -> Result<RequestsPage, BridgeError>;
}
