//! Payment data model for the EVVM pay system.
//!
//! This module defines the types a payment moves through on its way to the
//! chain: the validated [`PaymentIntent`], the recipient addressing rule,
//! and the final signed [`PaymentAuthorization`].

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use crate::wallet::Signature;

/// Urgency tier signed into a payment.
///
/// The tier affects relayer incentive, not consensus validity. It is
/// serialized into the canonical message as the literal `"true"` (high)
/// or `"false"` (low).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
	/// High priority, conventionally paired with asynchronous nonces.
	High,
	/// Low priority, conventionally paired with synchronous nonces.
	Low,
}

impl Priority {
	/// The boolean flag form used in the canonical message and the
	/// contract call.
	pub fn as_flag(&self) -> bool {
		matches!(self, Priority::High)
	}
}

/// Payment recipient addressing.
///
/// The contract takes two recipient fields, `to_address` and
/// `to_identity`, of which exactly one must be populated. Modeling the
/// recipient as an enum makes that mutual exclusion hold by
/// construction: the unpopulated field is always the canonical zero
/// value for its type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recipient {
	/// A raw hex account address.
	Address(Address),
	/// A human-readable identity, resolved to an address by the ledger.
	Identity(String),
}

impl Recipient {
	/// The `to_address` contract field: the address itself, or the zero
	/// address when the recipient is an identity.
	pub fn to_address(&self) -> Address {
		match self {
			Recipient::Address(address) => *address,
			Recipient::Identity(_) => Address::ZERO,
		}
	}

	/// The `to_identity` contract field: the identity string, or empty
	/// when the recipient is a raw address.
	pub fn to_identity(&self) -> &str {
		match self {
			Recipient::Address(_) => "",
			Recipient::Identity(name) => name,
		}
	}
}

/// A validated payment intent, ready to be canonicalized and signed.
///
/// All numeric fields are already parsed; building an intent from raw
/// caller input is the payload builder's job in `pay-core`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentIntent {
	/// Identifier of the EVVM deployment this payment targets. Signed
	/// into every message to prevent cross-deployment replay.
	pub evvm_id: u64,
	/// The payment recipient.
	pub to: Recipient,
	/// Token contract address of the asset being paid.
	pub token: Address,
	/// Amount of the token to transfer.
	pub amount: U256,
	/// Priority fee offered to the executing relayer.
	pub priority_fee: U256,
	/// Resolved nonce value. Its meaning depends on the nonce mode the
	/// caller chose; see [`crate::nonce::NonceRecord`].
	pub nonce: U256,
	/// Urgency tier signed into the message.
	pub priority: Priority,
	/// Address allowed to execute this authorization on-chain. The zero
	/// address means any relayer may execute it.
	pub executor: Address,
}

/// A fully signed payment authorization.
///
/// Created once the wallet has signed the canonical message, and
/// consumed exactly once by submission. Fields are never mutated after
/// creation; a failed submission requires a fresh authorization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentAuthorization {
	/// The signer's account address.
	pub from: Address,
	/// The intent that was signed.
	pub intent: PaymentIntent,
	/// Signature over the canonical message for the intent.
	pub signature: Signature,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_recipient_address_fields() {
		let address: Address = "0x5FbDB2315678afecb367f032d93F642f64180aa3"
			.parse()
			.unwrap();
		let recipient = Recipient::Address(address);

		assert_eq!(recipient.to_address(), address);
		assert_eq!(recipient.to_identity(), "");
	}

	#[test]
	fn test_recipient_identity_fields() {
		let recipient = Recipient::Identity("alice".to_string());

		assert_eq!(recipient.to_address(), Address::ZERO);
		assert_eq!(recipient.to_identity(), "alice");
	}

	#[test]
	fn test_priority_flag() {
		assert!(Priority::High.as_flag());
		assert!(!Priority::Low.as_flag());
	}
}
