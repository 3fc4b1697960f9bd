//! Nonce modes and resolved nonce records.
//!
//! A payment's nonce is either the account's next on-chain counter,
//! fetched fresh before signing, or a caller-chosen value that allows
//! several payments to be authorized concurrently. The record keeps the
//! mode alongside the value so downstream code can tell which replay
//! rule applies.

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

/// How the nonce for a payment was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NonceMode {
	/// The account's monotonic counter, read from chain state
	/// immediately before signing. Valid for exactly one successful
	/// submission; the chain rejects reuse.
	Sync,
	/// A caller-chosen value with no chain round-trip. The caller is
	/// responsible for uniqueness per account.
	Async,
}

/// A resolved nonce together with the mode that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NonceRecord {
	/// The resolution mode.
	pub mode: NonceMode,
	/// The nonce value signed into the payment.
	pub value: U256,
}
