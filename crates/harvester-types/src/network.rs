//! Static registry of the EVM networks the harvester can talk to.
//!
//! A `Network` carries the chain-level facts that never change per run:
//! chain id, explorer base URL, native currency and fee-market capability.
//! RPC endpoints are configuration, not registry data, so they live in the
//! config crate and are joined to a `Network` by name.

use alloy::primitives::B256;

/// Immutable descriptor of one EVM network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Network {
	/// Registry name, also the key used in configuration.
	pub name: &'static str,
	/// Numeric chain id used in transactions and bridge quotes.
	pub chain_id: u64,
	/// Block explorer base URL, without a trailing slash.
	pub explorer: &'static str,
	/// Native currency symbol.
	pub symbol: &'static str,
	/// Whether the network prices transactions with EIP-1559 fee fields.
	pub eip1559: bool,
}

/// All networks known to the harvester.
pub const NETWORKS: &[Network] = &[
	Network {
		name: "ethereum",
		chain_id: 1,
		explorer: "https://etherscan.io",
		symbol: "ETH",
		eip1559: true,
	},
	Network {
		name: "optimism",
		chain_id: 10,
		explorer: "https://optimistic.etherscan.io",
		symbol: "ETH",
		eip1559: true,
	},
	Network {
		name: "base",
		chain_id: 8453,
		explorer: "https://basescan.org",
		symbol: "ETH",
		eip1559: true,
	},
	Network {
		name: "arbitrum",
		chain_id: 42161,
		explorer: "https://arbiscan.io",
		symbol: "ETH",
		eip1559: true,
	},
	Network {
		name: "linea",
		chain_id: 59144,
		explorer: "https://lineascan.build",
		symbol: "ETH",
		eip1559: true,
	},
	Network {
		name: "swell",
		chain_id: 1923,
		explorer: "https://explorer.swellnetwork.io",
		symbol: "ETH",
		eip1559: true,
	},
];

impl Network {
	/// Looks up a network by its registry name.
	pub fn by_name(name: &str) -> Option<&'static Network> {
		NETWORKS.iter().find(|network| network.name == name)
	}

	/// Looks up a network by chain id.
	pub fn by_chain_id(chain_id: u64) -> Option<&'static Network> {
		NETWORKS.iter().find(|network| network.chain_id == chain_id)
	}

	/// Renders the explorer link for a transaction hash.
	pub fn explorer_tx_url(&self, hash: &B256) -> String {
		format!("{}/tx/{}", self.explorer, hash)
	}
}
