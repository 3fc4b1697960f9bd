//! Wallet-side types for the pay system.
//!
//! The core never inspects signature internals; a signature is an opaque
//! byte blob produced by the wallet provider and forwarded verbatim to
//! the contract.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::utils::with_0x_prefix;

/// Opaque signature bytes returned by a wallet provider.
///
/// Stored as raw bytes to stay agnostic of the signature scheme; for the
/// EVM wallet implementation this is a 65-byte EIP-191 signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature(pub Vec<u8>);

impl Signature {
	/// The raw signature bytes, as passed to the contract call.
	pub fn as_bytes(&self) -> &[u8] {
		&self.0
	}
}

impl fmt::Display for Signature {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", with_0x_prefix(&hex::encode(&self.0)))
	}
}
