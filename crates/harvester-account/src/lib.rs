//! Local key signing for the reward harvester.
//!
//! `Signer` holds one wallet's secp256k1 key in memory and turns canonical
//! transaction records into raw signed payloads. Signing is pure and
//! synchronous: no I/O, no chain access, and the key never leaves this
//! crate. The raw bytes go to the delivery crate for broadcasting.

use alloy::consensus::{SignableTransaction, TxEip1559, TxEnvelope, TxLegacy};
use alloy::eips::eip2718::Encodable2718;
use alloy::eips::eip2930::AccessList;
use alloy::primitives::{Address, TxKind, B256};
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::SignerSync;
use harvester_types::{GasFees, SecretString, TransactionRequest};
use thiserror::Error;

/// Errors that can occur during signing operations.
#[derive(Debug, Error)]
pub enum AccountError {
	/// Error that occurs when a private key is invalid or malformed.
	#[error("Invalid key: {0}")]
	InvalidKey(String),
	/// Error that occurs when a signing operation fails.
	#[error("Signing failed: {0}")]
	SigningFailed(String),
}

/// A signed transaction ready for broadcast.
#[derive(Debug, Clone)]
pub struct SignedTransaction {
	/// EIP-2718 encoded payload for `eth_sendRawTransaction`.
	pub raw: Vec<u8>,
	/// Hash of the signed payload, known before the node sees it.
	pub hash: B256,
}

/// Signs transactions and messages with one wallet's private key.
#[derive(Clone)]
pub struct Signer {
	inner: PrivateKeySigner,
}

impl Signer {
	/// Parses a private key. Accepts hex with or without the 0x prefix.
	pub fn from_key(key: &SecretString) -> Result<Self, AccountError> {
		let inner = key
			.with_exposed(|k| k.trim().parse::<PrivateKeySigner>())
			.map_err(|e| AccountError::InvalidKey(e.to_string()))?;
		Ok(Self { inner })
	}

	/// The address derived from the key.
	pub fn address(&self) -> Address {
		self.inner.address()
	}

	/// Signs a canonical transaction record.
	///
	/// The request's fee mode decides the envelope type: EIP-1559 fees yield
	/// a type-2 transaction, legacy fees an untyped one.
	pub fn sign_transaction(
		&self,
		request: &TransactionRequest,
	) -> Result<SignedTransaction, AccountError> {
		match request.fees {
			GasFees::Eip1559 {
				max_fee_per_gas,
				max_priority_fee_per_gas,
			} => {
				let tx = TxEip1559 {
					chain_id: request.chain_id,
					nonce: request.nonce,
					gas_limit: request.gas_limit,
					max_fee_per_gas,
					max_priority_fee_per_gas,
					to: TxKind::Call(request.to),
					value: request.value,
					access_list: AccessList::default(),
					input: request.input.clone(),
				};
				let signature = self
					.inner
					.sign_hash_sync(&tx.signature_hash())
					.map_err(|e| AccountError::SigningFailed(e.to_string()))?;
				let signed = tx.into_signed(signature);
				let hash = *signed.hash();
				Ok(SignedTransaction {
					raw: TxEnvelope::Eip1559(signed).encoded_2718(),
					hash,
				})
			}
			GasFees::Legacy { gas_price } => {
				let tx = TxLegacy {
					chain_id: Some(request.chain_id),
					nonce: request.nonce,
					gas_price,
					gas_limit: request.gas_limit,
					to: TxKind::Call(request.to),
					value: request.value,
					input: request.input.clone(),
				};
				let signature = self
					.inner
					.sign_hash_sync(&tx.signature_hash())
					.map_err(|e| AccountError::SigningFailed(e.to_string()))?;
				let signed = tx.into_signed(signature);
				let hash = *signed.hash();
				Ok(SignedTransaction {
					raw: TxEnvelope::Legacy(signed).encoded_2718(),
					hash,
				})
			}
		}
	}

	/// Signs an EIP-191 personal message, returning the 0x-hex signature.
	pub fn sign_message(&self, message: &str) -> Result<String, AccountError> {
		let signature = self
			.inner
			.sign_message_sync(message.as_bytes())
			.map_err(|e| AccountError::SigningFailed(e.to_string()))?;
		Ok(format!("0x{}", hex::encode(signature.as_bytes())))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy::primitives::{address, Bytes, U256};

	// Well-known development key, not a live wallet.
	const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

	fn dev_signer() -> Signer {
		Signer::from_key(&SecretString::from(DEV_KEY)).unwrap()
	}

	fn eip1559_request() -> TransactionRequest {
		TransactionRequest {
			chain_id: 1923,
			from: address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266"),
			to: address!("3Ef3D8bA38EBe18DB133cEc108f4D14CE00Dd9Ae"),
			value: U256::ZERO,
			input: Bytes::from(vec![0xde, 0xad, 0xbe, 0xef]),
			nonce: 7,
			gas_limit: 120_000,
			fees: GasFees::Eip1559 {
				max_fee_per_gas: 1_500_000_525,
				max_priority_fee_per_gas: 1_500_000_000,
			},
		}
	}

	#[test]
	fn derives_the_expected_address() {
		let signer = dev_signer();
		assert_eq!(
			signer.address(),
			address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266")
		);
	}

	#[test]
	fn rejects_garbage_keys() {
		let result = Signer::from_key(&SecretString::from("not-a-key"));
		assert!(matches!(result, Err(AccountError::InvalidKey(_))));
	}

	#[test]
	fn key_accepted_without_prefix() {
		let bare = DEV_KEY.trim_start_matches("0x");
		let signer = Signer::from_key(&SecretString::from(bare)).unwrap();
		assert_eq!(signer.address(), dev_signer().address());
	}

	#[test]
	fn eip1559_payload_is_type_two() {
		let signed = dev_signer().sign_transaction(&eip1559_request()).unwrap();
		assert_eq!(signed.raw[0], 0x02);
	}

	#[test]
	fn legacy_payload_is_untyped_rlp() {
		let mut request = eip1559_request();
		request.fees = GasFees::Legacy {
			gas_price: 2_000_000_000,
		};
		let signed = dev_signer().sign_transaction(&request).unwrap();
		// Untyped transactions start with an RLP list prefix, not a type byte.
		assert!(signed.raw[0] >= 0xc0);
	}

	#[test]
	fn signing_is_deterministic() {
		let signer = dev_signer();
		let first = signer.sign_transaction(&eip1559_request()).unwrap();
		let second = signer.sign_transaction(&eip1559_request()).unwrap();
		assert_eq!(first.raw, second.raw);
		assert_eq!(first.hash, second.hash);
	}

	#[test]
	fn message_signature_shape() {
		let signature = dev_signer().sign_message("harvester login").unwrap();
		assert!(signature.starts_with("0x"));
		// 65 signature bytes as hex, plus the prefix.
		assert_eq!(signature.len(), 132);
	}
}
