//! Canonical message construction for EVVM payment signatures.
//!
//! The string built here is what the wallet signs and what the contract
//! reconstructs to verify the signature, so rendering must match the
//! contract byte-for-byte: addresses in lowercase hex, integers in plain
//! base-10, the priority flag as the literal `true`/`false`, all fields
//! joined with commas in a fixed order.
//!
//! Construction is pure: no I/O, and identical intents always yield
//! identical strings.

use std::fmt;

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::payment::{PaymentIntent, Recipient};
use crate::utils::with_0x_prefix;

/// Errors that can occur while preparing canonical message fields.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MessageError {
	/// A caller-supplied numeric field could not be interpreted as a
	/// plain base-10 integer.
	#[error("malformed {field}: {reason}")]
	MalformedField {
		/// Name of the offending field.
		field: &'static str,
		/// Why the value was rejected.
		reason: String,
	},
}

/// The deterministic string a wallet signs to authorize one payment.
///
/// Built once per signing attempt and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalMessage(String);

impl CanonicalMessage {
	/// The message text.
	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// The message bytes handed to the wallet for EIP-191 signing.
	pub fn as_bytes(&self) -> &[u8] {
		self.0.as_bytes()
	}
}

impl fmt::Display for CanonicalMessage {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// Builds the canonical `pay` message for a payment intent.
///
/// Field order is fixed by the contract:
/// `evvmID,pay,recipient,token,amount,priorityFee,nonce,priority,executor`.
pub fn pay_message(intent: &PaymentIntent) -> CanonicalMessage {
	let inputs = format!(
		"{},{},{},{},{},{},{}",
		recipient_field(&intent.to),
		address_field(&intent.token),
		intent.amount,
		intent.priority_fee,
		intent.nonce,
		if intent.priority.as_flag() {
			"true"
		} else {
			"false"
		},
		address_field(&intent.executor),
	);

	CanonicalMessage(join_message(intent.evvm_id, "pay", &inputs))
}

/// `<evvmID>,<function>,<inputs>` envelope shared by every EVVM
/// signature variant.
fn join_message(evvm_id: u64, function: &str, inputs: &str) -> String {
	format!("{},{},{}", evvm_id, function, inputs)
}

/// Renders an address in the form the contract hashes: `0x` plus
/// lowercase hex, no EIP-55 checksum casing.
fn address_field(address: &Address) -> String {
	with_0x_prefix(&hex::encode(address.as_slice()))
}

/// The recipient field: lowercase hex for addresses, identity strings
/// passed through unchanged (identities are case-sensitive).
fn recipient_field(recipient: &Recipient) -> String {
	match recipient {
		Recipient::Address(address) => address_field(address),
		Recipient::Identity(name) => name.clone(),
	}
}

/// Parses a caller-supplied base-10 integer field.
///
/// Accepts only plain digit strings, matching the canonical rendering
/// rules: no sign, no separators, nothing but ASCII digits. Rejections
/// are explicit rather than coerced to zero.
pub fn parse_decimal(field: &'static str, value: &str) -> Result<U256, MessageError> {
	let value = value.trim();

	if value.is_empty() {
		return Err(MessageError::MalformedField {
			field,
			reason: "empty value".to_string(),
		});
	}

	if !value.bytes().all(|b| b.is_ascii_digit()) {
		return Err(MessageError::MalformedField {
			field,
			reason: format!("'{}' is not an unsigned base-10 integer", value),
		});
	}

	U256::from_str_radix(value, 10).map_err(|_| MessageError::MalformedField {
		field,
		reason: format!("'{}' exceeds 256 bits", value),
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::payment::Priority;

	fn sample_intent() -> PaymentIntent {
		PaymentIntent {
			evvm_id: 1,
			to: Recipient::Address(
				"0xABcdEF0123456789abCDef0123456789AbCdEf01"
					.parse()
					.unwrap(),
			),
			token: "0x00000000000000000000000000000000000000AA"
				.parse()
				.unwrap(),
			amount: U256::from(1000u64),
			priority_fee: U256::from(10u64),
			nonce: U256::from(5u64),
			priority: Priority::Low,
			executor: Address::ZERO,
		}
	}

	#[test]
	fn test_pay_message_exact_rendering() {
		let message = pay_message(&sample_intent());

		assert_eq!(
			message.as_str(),
			"1,pay,0xabcdef0123456789abcdef0123456789abcdef01,\
			 0x00000000000000000000000000000000000000aa,\
			 1000,10,5,false,0x0000000000000000000000000000000000000000"
		);
	}

	#[test]
	fn test_pay_message_is_deterministic() {
		let intent = sample_intent();
		assert_eq!(pay_message(&intent), pay_message(&intent));
	}

	#[test]
	fn test_addresses_are_lowercased_regardless_of_input_casing() {
		let intent = sample_intent();
		let message = pay_message(&intent);

		assert!(message
			.as_str()
			.contains("0xabcdef0123456789abcdef0123456789abcdef01"));
		assert!(!message.as_str().contains("0xABcdEF"));
	}

	#[test]
	fn test_identity_recipient_passes_through_unchanged() {
		let mut intent = sample_intent();
		intent.to = Recipient::Identity("Alice".to_string());

		let message = pay_message(&intent);
		let recipient = message.as_str().split(',').nth(2).unwrap();

		assert_eq!(recipient, "Alice");
	}

	#[test]
	fn test_priority_flag_renders_as_boolean_literal() {
		let mut intent = sample_intent();

		intent.priority = Priority::High;
		assert!(pay_message(&intent).as_str().contains(",true,"));

		intent.priority = Priority::Low;
		assert!(pay_message(&intent).as_str().contains(",false,"));
	}

	#[test]
	fn test_parse_decimal_accepts_plain_digits() {
		assert_eq!(parse_decimal("amount", "1000").unwrap(), U256::from(1000u64));
		assert_eq!(parse_decimal("amount", "0").unwrap(), U256::ZERO);
		assert_eq!(
			parse_decimal("amount", " 42 ").unwrap(),
			U256::from(42u64)
		);
	}

	#[test]
	fn test_parse_decimal_rejects_malformed_values() {
		for bad in ["", "-1", "+1", "1_000", "1,000", "0x10", "ten", "1.5"] {
			let result = parse_decimal("amount", bad);
			assert!(
				matches!(
					result,
					Err(MessageError::MalformedField { field: "amount", .. })
				),
				"expected rejection for {:?}",
				bad
			);
		}
	}

	#[test]
	fn test_parse_decimal_rejects_overflow() {
		// 2^256, one past the largest representable value.
		let too_big =
			"115792089237316195423570985008687907853269984665640564039457584007913129639936";
		assert!(parse_decimal("amount", too_big).is_err());
	}
}
