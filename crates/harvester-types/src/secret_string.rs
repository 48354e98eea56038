//! Secure string type for private keys.
//!
//! `SecretString` wraps sensitive string data so that it is zeroed on drop
//! and cannot leak through `Debug`/`Display` formatting. Every private key
//! read from the input files lives in one of these until it is parsed into
//! a signer.

use std::fmt;
use zeroize::Zeroizing;

/// A string that zeroes its memory on drop and redacts itself in output.
#[derive(Clone)]
pub struct SecretString(Zeroizing<String>);

impl SecretString {
	/// Wraps an owned string.
	pub fn new(s: String) -> Self {
		Self(Zeroizing::new(s))
	}

	/// Hands the secret to a closure without letting it escape this scope.
	///
	/// The closure result must not carry the secret; callers use this to
	/// parse the key into a signer or to derive non-sensitive values.
	pub fn with_exposed<F, R>(&self, f: F) -> R
	where
		F: FnOnce(&str) -> R,
	{
		f(&self.0)
	}
}

impl fmt::Debug for SecretString {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "SecretString(***REDACTED***)")
	}
}

impl fmt::Display for SecretString {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "***REDACTED***")
	}
}

impl From<String> for SecretString {
	fn from(s: String) -> Self {
		Self::new(s)
	}
}

impl From<&str> for SecretString {
	fn from(s: &str) -> Self {
		Self::new(s.to_string())
	}
}
