//! Configuration for the reward harvester.
//!
//! Configuration is a single TOML file. Environment variable references of
//! the form `${VAR}` or `${VAR:-default}` are resolved before parsing, and
//! the whole structure is validated afterwards so a bad file fails fast with
//! a specific message instead of half-working mid-run.

use alloy::primitives::Address;
use harvester_types::Network;
use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error that occurs during file I/O operations.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	/// Error that occurs when parsing TOML configuration.
	#[error("Configuration error: {0}")]
	Parse(String),
	/// Error that occurs when configuration validation fails.
	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		// Extract just the message without the input dump
		ConfigError::Parse(err.message().to_string())
	}
}

/// Main configuration structure for the harvester.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	/// Run-wide toggles and pacing.
	#[serde(default)]
	pub general: GeneralConfig,
	/// Location of the wallet input files.
	#[serde(default)]
	pub inputs: InputsConfig,
	/// RPC endpoints keyed by registry network name.
	pub networks: HashMap<String, NetworkEndpoint>,
	/// Transaction submission settings.
	#[serde(default)]
	pub delivery: DeliveryConfig,
	/// Bridge API settings for gas refuels.
	#[serde(default)]
	pub bridge: BridgeConfig,
	/// Rewards API and claim settings.
	pub rewards: RewardsConfig,
	/// Gas refuel thresholds and source chains.
	pub refuel: RefuelConfig,
}

/// Run-wide toggles and pacing.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneralConfig {
	/// Randomize wallet order each run.
	#[serde(default)]
	pub shuffle_accounts: bool,
	/// Route off-chain API calls through per-wallet proxies.
	#[serde(default)]
	pub use_proxies: bool,
	/// Shorten addresses in log lines.
	#[serde(default = "default_true")]
	pub truncate_addresses: bool,
	/// Uniform pause between wallets, `[min, max]` seconds.
	#[serde(default = "default_delay_range")]
	pub wallet_delay_secs: [u64; 2],
	/// Uniform pause between intra-wallet actions, `[min, max]` seconds.
	#[serde(default = "default_delay_range")]
	pub action_delay_secs: [u64; 2],
}

impl Default for GeneralConfig {
	fn default() -> Self {
		Self {
			shuffle_accounts: false,
			use_proxies: false,
			truncate_addresses: default_true(),
			wallet_delay_secs: default_delay_range(),
			action_delay_secs: default_delay_range(),
		}
	}
}

/// Location of the wallet input files.
#[derive(Debug, Clone, Deserialize)]
pub struct InputsConfig {
	/// Directory holding `keys.txt`, `proxies.txt` and `recipients.txt`.
	#[serde(default = "default_inputs_directory")]
	pub directory: PathBuf,
}

impl Default for InputsConfig {
	fn default() -> Self {
		Self {
			directory: default_inputs_directory(),
		}
	}
}

/// RPC endpoint for one configured network.
#[derive(Debug, Clone, Deserialize)]
pub struct NetworkEndpoint {
	/// HTTP JSON-RPC URL.
	pub rpc_url: String,
}

/// Transaction submission settings.
#[derive(Debug, Clone, Deserialize)]
pub struct DeliveryConfig {
	/// How long to wait for a receipt before giving up on a submission.
	#[serde(default = "default_receipt_timeout_secs")]
	pub receipt_timeout_secs: u64,
}

impl Default for DeliveryConfig {
	fn default() -> Self {
		Self {
			receipt_timeout_secs: default_receipt_timeout_secs(),
		}
	}
}

/// Bridge API settings for gas refuels.
#[derive(Debug, Clone, Deserialize)]
pub struct BridgeConfig {
	/// Base URL of the bridge API.
	#[serde(default = "default_bridge_api_url")]
	pub api_url: String,
	/// Attempt budget for each confirmation polling loop.
	#[serde(default = "default_poll_attempts")]
	pub poll_attempts: u32,
	/// Fixed wait between polling attempts, in seconds.
	#[serde(default = "default_poll_interval_secs")]
	pub poll_interval_secs: u64,
}

impl Default for BridgeConfig {
	fn default() -> Self {
		Self {
			api_url: default_bridge_api_url(),
			poll_attempts: default_poll_attempts(),
			poll_interval_secs: default_poll_interval_secs(),
		}
	}
}

/// Rewards API and claim settings.
#[derive(Debug, Clone, Deserialize)]
pub struct RewardsConfig {
	/// Registry name of the network rewards are claimed on.
	pub chain: String,
	/// Base URL of the rewards API.
	#[serde(default = "default_rewards_api_url")]
	pub api_url: String,
	/// Endpoint that builds claim calldata server-side.
	#[serde(default = "default_claim_url")]
	pub claim_url: String,
	/// Distributor contract the claim transaction is sent to.
	pub distributor: Address,
	/// Reward token contract, used for balance reads and forwarding.
	pub token: Address,
	/// Forward claimed tokens to each wallet's recipient after claiming.
	#[serde(default)]
	pub forward_to_recipient: bool,
}

/// Gas refuel thresholds and source chains.
#[derive(Debug, Clone, Deserialize)]
pub struct RefuelConfig {
	/// Claim-chain native balance below which a refuel runs first, in ETH.
	pub min_balance: f64,
	/// Candidate source networks, tried in shuffled order.
	pub source_chains: Vec<String>,
	/// Bridged amount range `[min, max]`, in ETH.
	pub amount: [f64; 2],
}

fn default_true() -> bool {
	true
}

fn default_delay_range() -> [u64; 2] {
	[10, 20]
}

fn default_inputs_directory() -> PathBuf {
	PathBuf::from("input_data")
}

fn default_receipt_timeout_secs() -> u64 {
	400
}

fn default_bridge_api_url() -> String {
	"https://api.relay.link".to_string()
}

fn default_poll_attempts() -> u32 {
	10
}

fn default_poll_interval_secs() -> u64 {
	10
}

fn default_rewards_api_url() -> String {
	"https://api.merkl.xyz/v4".to_string()
}

fn default_claim_url() -> String {
	"https://app.merkl.xyz/transaction/claim".to_string()
}

/// Resolves environment variables in a string.
///
/// Replaces `${VAR_NAME}` with the value of the environment variable
/// VAR_NAME. Supports default values with `${VAR_NAME:-default_value}`.
/// Input strings are limited to 1MB to prevent ReDoS attacks.
pub(crate) fn resolve_env_vars(input: &str) -> Result<String, ConfigError> {
	const MAX_INPUT_SIZE: usize = 1024 * 1024; // 1MB
	if input.len() > MAX_INPUT_SIZE {
		return Err(ConfigError::Validation(format!(
			"Configuration file too large: {} bytes (max: {} bytes)",
			input.len(),
			MAX_INPUT_SIZE
		)));
	}

	let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]{0,127})(?::-([^}]{0,256}))?\}")
		.map_err(|e| ConfigError::Parse(format!("Regex error: {}", e)))?;

	let mut result = input.to_string();
	let mut replacements = Vec::new();

	for cap in re.captures_iter(input) {
		let full_match = cap.get(0).unwrap();
		let var_name = cap.get(1).unwrap().as_str();
		let default_value = cap.get(2).map(|m| m.as_str());

		let value = match std::env::var(var_name) {
			Ok(v) => v,
			Err(_) => {
				if let Some(default) = default_value {
					default.to_string()
				} else {
					return Err(ConfigError::Validation(format!(
						"Environment variable '{}' not found",
						var_name
					)));
				}
			}
		};

		replacements.push((full_match.start(), full_match.end(), value));
	}

	// Apply replacements in reverse order to maintain positions
	for (start, end, value) in replacements.iter().rev() {
		result.replace_range(start..end, value);
	}

	Ok(result)
}

impl Config {
	/// Loads and validates configuration from a file.
	pub async fn from_file(path: &str) -> Result<Self, ConfigError> {
		let raw = tokio::fs::read_to_string(path).await?;
		raw.parse()
	}

	/// Validates the configuration as a whole.
	///
	/// Every rule yields its own message so a bad file points straight at
	/// the offending line.
	fn validate(&self) -> Result<(), ConfigError> {
		if self.networks.is_empty() {
			return Err(ConfigError::Validation(
				"At least one network must be configured".into(),
			));
		}
		for (name, endpoint) in &self.networks {
			if Network::by_name(name).is_none() {
				return Err(ConfigError::Validation(format!(
					"Unknown network '{}' in [networks]",
					name
				)));
			}
			if endpoint.rpc_url.is_empty() {
				return Err(ConfigError::Validation(format!(
					"Network '{}' must have an rpc_url",
					name
				)));
			}
		}

		if !self.networks.contains_key(&self.rewards.chain) {
			return Err(ConfigError::Validation(format!(
				"Rewards chain '{}' is not configured in [networks]",
				self.rewards.chain
			)));
		}
		if self.rewards.api_url.is_empty() || self.rewards.claim_url.is_empty() {
			return Err(ConfigError::Validation(
				"Rewards api_url and claim_url cannot be empty".into(),
			));
		}

		if self.bridge.api_url.is_empty() {
			return Err(ConfigError::Validation(
				"Bridge api_url cannot be empty".into(),
			));
		}
		if self.bridge.poll_attempts == 0 {
			return Err(ConfigError::Validation(
				"Bridge poll_attempts must be at least 1".into(),
			));
		}

		if self.delivery.receipt_timeout_secs == 0 {
			return Err(ConfigError::Validation(
				"Delivery receipt_timeout_secs must be greater than 0".into(),
			));
		}

		for name in &self.refuel.source_chains {
			if !self.networks.contains_key(name) {
				return Err(ConfigError::Validation(format!(
					"Refuel source chain '{}' is not configured in [networks]",
					name
				)));
			}
			if name == &self.rewards.chain {
				return Err(ConfigError::Validation(format!(
					"Refuel source chain '{}' cannot be the rewards chain",
					name
				)));
			}
		}
		if self.refuel.min_balance <= 0.0 {
			return Err(ConfigError::Validation(
				"Refuel min_balance must be positive".into(),
			));
		}
		if self.refuel.amount[0] <= 0.0 || self.refuel.amount[0] > self.refuel.amount[1] {
			return Err(ConfigError::Validation(
				"Refuel amount range must be positive and ordered [min, max]".into(),
			));
		}

		if self.general.wallet_delay_secs[0] > self.general.wallet_delay_secs[1] {
			return Err(ConfigError::Validation(
				"wallet_delay_secs must be ordered [min, max]".into(),
			));
		}
		if self.general.action_delay_secs[0] > self.general.action_delay_secs[1] {
			return Err(ConfigError::Validation(
				"action_delay_secs must be ordered [min, max]".into(),
			));
		}

		Ok(())
	}
}

/// Parses configuration from a TOML string.
///
/// Environment variables are resolved first and the result is validated.
impl FromStr for Config {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let resolved = resolve_env_vars(s)?;
		let config: Config = toml::from_str(&resolved)?;
		config.validate()?;
		Ok(config)
	}
}
