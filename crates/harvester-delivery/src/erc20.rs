//! Minimal ERC-20 calldata helpers.
//!
//! The harvester only reads balances and moves tokens, so the calldata is
//! assembled by hand instead of pulling in a full ABI layer.

use alloy::primitives::{Address, Bytes, U256};

// balanceOf(address) selector is 0x70a08231
const BALANCE_OF: [u8; 4] = [0x70, 0xa0, 0x82, 0x31];
// transfer(address,uint256) selector is 0xa9059cbb
const TRANSFER: [u8; 4] = [0xa9, 0x05, 0x9c, 0xbb];
// decimals() selector is 0x313ce567
const DECIMALS: [u8; 4] = [0x31, 0x3c, 0xe5, 0x67];

/// Calldata for `decimals()`.
pub fn decimals_call() -> Bytes {
	DECIMALS.to_vec().into()
}

/// Calldata for `balanceOf(owner)`.
pub fn balance_of_call(owner: Address) -> Bytes {
	let mut data = Vec::with_capacity(36);
	data.extend_from_slice(&BALANCE_OF);
	data.extend_from_slice(&[0; 12]); // Pad address to 32 bytes
	data.extend_from_slice(owner.as_slice());
	data.into()
}

/// Calldata for `transfer(recipient, amount)`.
pub fn transfer_call(recipient: Address, amount: U256) -> Bytes {
	let mut data = Vec::with_capacity(68);
	data.extend_from_slice(&TRANSFER);
	data.extend_from_slice(&[0; 12]);
	data.extend_from_slice(recipient.as_slice());
	data.extend_from_slice(&amount.to_be_bytes::<32>());
	data.into()
}

/// Reads a single uint256 return value from a call result.
pub fn decode_uint(data: &[u8]) -> Option<U256> {
	if data.len() < 32 {
		return None;
	}
	Some(U256::from_be_slice(&data[..32]))
}
