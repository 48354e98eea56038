//! Common types for the reward harvester.
//!
//! This crate defines the core data types shared by every other component:
//! the network registry, wallet accounts, canonical transaction records and
//! their outcomes, and the zeroizing wrapper used for private keys.

/// Wallet account data loaded from the input files.
pub mod account;
/// Static registry of supported EVM networks.
pub mod network;
/// Secure string type for private keys.
pub mod secret_string;
/// Canonical transaction records, fee modes and submission outcomes.
pub mod transaction;
/// Formatting and unit-conversion helpers.
pub mod utils;

// Re-export all types for convenient access
pub use account::Account;
pub use network::Network;
pub use secret_string::SecretString;
pub use transaction::{GasFees, TransactionOutcome, TransactionReceipt, TransactionRequest};
pub use utils::{display_address, format_eth, format_units, truncate_address, wei_from_eth};
