//! Chain-side types for the pay system.
//!
//! Submission reports its outcome as a transaction hash; anything richer
//! (receipts, confirmations) is outside this system's contract with the
//! chain client.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::utils::with_0x_prefix;

/// Blockchain transaction hash returned by a successful submission.
///
/// Stored as raw bytes to support different hash widths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionHash(pub Vec<u8>);

impl fmt::Display for TransactionHash {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", with_0x_prefix(&hex::encode(&self.0)))
	}
}
