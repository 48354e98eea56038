//! Wallet account data for one run of the harvester.

use crate::SecretString;
use alloy::primitives::Address;

/// One wallet in the batch, paired with its optional proxy and recipient.
///
/// The signing address is always derived from the key by the account crate;
/// it is deliberately not stored here so the two can never disagree.
#[derive(Debug, Clone)]
pub struct Account {
	/// Position label in the run, `[3/20]` style. Stable for the whole run
	/// and prefixed to every log line about this wallet.
	pub label: String,
	/// The wallet's private key. Never logged, never serialized.
	pub private_key: SecretString,
	/// Proxy URL for off-chain API calls, when proxies are enabled.
	pub proxy: Option<String>,
	/// Destination for claimed tokens, when forwarding is enabled.
	pub recipient: Option<Address>,
}
