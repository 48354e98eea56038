//! Bounded confirmation polling for bridge transfers.
//!
//! Two sequential loops follow every deposit: the status loop waits for the
//! bridge to acknowledge the deposit, the receipt loop waits for the indexed
//! transfer record. Both are plain bounded loops over classified responses;
//! running out of attempts is an error, not an exception path.

use crate::{BridgeApi, BridgeError, DepositStatus};
use std::sync::Arc;
use std::time::Duration;

/// Classification of one deposit-status response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
	/// The bridge reported the deposit as successful.
	Ready,
	/// Any other reported status. Worth another attempt.
	Pending,
	/// The response carried no status field at all. Retrying cannot produce
	/// one, so the loop completes, loudly.
	UnknownShape,
}

/// Classifies one deposit-status response.
pub fn classify_deposit(status: &DepositStatus) -> PollOutcome {
	match status.status.as_deref() {
		Some("success") => PollOutcome::Ready,
		Some(_) => PollOutcome::Pending,
		None => PollOutcome::UnknownShape,
	}
}

/// Polls the bridge's confirmation endpoints with a fixed attempt budget.
pub struct ConfirmationPoller {
	api: Arc<dyn BridgeApi>,
	attempts: u32,
	interval: Duration,
}

impl ConfirmationPoller {
	pub fn new(api: Arc<dyn BridgeApi>, attempts: u32, interval: Duration) -> Self {
		Self {
			api,
			attempts,
			interval,
		}
	}

	/// Waits until the bridge reports the deposit as successful.
	pub async fn await_deposit(&self, request_id: &str) -> Result<(), BridgeError> {
		for attempt in 1..=self.attempts {
			let status = self.api.deposit_status(request_id).await?;
			match classify_deposit(&status) {
				PollOutcome::Ready => {
					tracing::debug!(request_id, attempt, "Bridge confirmed the deposit");
					return Ok(());
				}
				PollOutcome::UnknownShape => {
					tracing::warn!(
						request_id,
						"Deposit status response has no status field; treating as complete"
					);
					return Ok(());
				}
				PollOutcome::Pending => {
					tracing::debug!(
						request_id,
						attempt,
						max_attempts = self.attempts,
						"Deposit still pending"
					);
					if attempt < self.attempts {
						tokio::time::sleep(self.interval).await;
					}
				}
			}
		}

		Err(BridgeError::Exhausted {
			endpoint: "intents/status",
			attempts: self.attempts,
		})
	}

	/// Waits until the bridge indexes the transfer, returning the bridged
	/// USD value when the record carries one.
	pub async fn await_receipt(&self, request_id: &str) -> Result<Option<String>, BridgeError> {
		for attempt in 1..=self.attempts {
			let page = self.api.execution_receipt(request_id).await?;
			if let Some(entry) = page.requests.first() {
				tracing::debug!(request_id, attempt, "Bridge indexed the transfer");
				let amount_usd = entry
					.data
					.as_ref()
					.and_then(|d| d.metadata.as_ref())
					.and_then(|m| m.currency_out.as_ref())
					.and_then(|c| c.amount_usd.clone());
				return Ok(amount_usd);
			}

			tracing::debug!(
				request_id,
				attempt,
				max_attempts = self.attempts,
				"Transfer not indexed yet"
			);
			if attempt < self.attempts {
				tokio::time::sleep(self.interval).await;
			}
		}

		Err(BridgeError::Exhausted {
			endpoint: "requests/v2",
			attempts: self.attempts,
		})
	}
}
