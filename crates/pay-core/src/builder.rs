//! Payment payload building.
//!
//! Turns raw caller-supplied field values into a validated
//! [`PaymentIntent`], enforcing the recipient addressing rule and
//! rejecting malformed numeric input instead of coercing it. Input is
//! an explicit structured record; the builder never reaches into UI
//! state or keyed lookups.

use alloy_primitives::{Address, U256};
use pay_types::{
	parse_decimal, MessageError, NonceRecord, PaymentAuthorization, PaymentIntent, Priority,
	Recipient, Signature,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while building a payment payload.
///
/// All of these are detected locally, before any network or wallet
/// call, and are never retried automatically.
#[derive(Debug, Error)]
pub enum BuildError {
	/// The recipient field is empty, or looks like a hex address but
	/// does not parse as one.
	#[error("Invalid recipient: {0}")]
	InvalidRecipient(String),
	/// The amount is not a plain non-negative base-10 integer.
	#[error("Invalid amount: {0}")]
	InvalidAmount(String),
	/// The priority fee is not a plain non-negative base-10 integer.
	#[error("Invalid priority fee: {0}")]
	InvalidFee(String),
	/// The executor field does not parse as a hex address.
	#[error("Invalid executor: {0}")]
	InvalidExecutor(String),
	/// Some other field failed canonical parsing.
	#[error(transparent)]
	MalformedField(#[from] MessageError),
}

/// How the nonce for a payment request should be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoncePolicy {
	/// Fetch the account's next counter from the chain immediately
	/// before signing.
	Sync,
	/// Use the caller-supplied value (raw base-10 digits); no chain
	/// round-trip. The caller owns uniqueness.
	Async(String),
}

/// Raw field values for one payment, as collected by the caller.
///
/// Numeric fields stay strings here on purpose: validation happens in
/// [`validate_request`] with explicit errors, not at the collection
/// site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayRequest {
	/// Recipient: a `0x` hex address or a human-readable identity.
	pub to: String,
	/// Token contract address of the asset being paid.
	pub token: String,
	/// Amount as a base-10 string.
	pub amount: String,
	/// Priority fee as a base-10 string.
	pub priority_fee: String,
	/// Nonce resolution policy.
	pub nonce: NoncePolicy,
	/// Urgency tier to sign into the message.
	pub priority: Priority,
	/// Delegated executor address, if any. `None` (or empty) means any
	/// relayer may execute the authorization.
	pub executor: Option<String>,
}

/// Classifies a raw recipient string.
///
/// Empty input is rejected. A `0x`-prefixed string must parse as a
/// 20-byte hex address; anything else is treated as an identity and
/// passed through unchanged. A `0x`-prefixed string that is not a valid
/// address is rejected rather than reclassified as an identity, because
/// the canonicalizer's lowercasing rule keys on the prefix and would
/// silently alter what gets signed.
pub fn parse_recipient(to: &str) -> Result<Recipient, BuildError> {
	let to = to.trim();

	if to.is_empty() {
		return Err(BuildError::InvalidRecipient(
			"recipient must not be empty".to_string(),
		));
	}

	if to.starts_with("0x") || to.starts_with("0X") {
		to.parse::<Address>()
			.map(Recipient::Address)
			.map_err(|e| {
				BuildError::InvalidRecipient(format!("'{}' is not a valid address: {}", to, e))
			})
	} else {
		Ok(Recipient::Identity(to.to_string()))
	}
}

/// Payment fields that have passed local validation and are waiting on
/// a resolved nonce.
///
/// Produced by [`validate_request`] before any wallet or chain call;
/// [`into_intent`](ValidatedPayment::into_intent) fills in the nonce
/// once resolution has happened.
#[derive(Debug, Clone)]
pub struct ValidatedPayment {
	to: Recipient,
	token: Address,
	amount: U256,
	priority_fee: U256,
	priority: Priority,
	executor: Address,
}

impl ValidatedPayment {
	/// Completes the intent with the deployment id and resolved nonce.
	pub fn into_intent(self, evvm_id: u64, nonce: NonceRecord) -> PaymentIntent {
		PaymentIntent {
			evvm_id,
			to: self.to,
			token: self.token,
			amount: self.amount,
			priority_fee: self.priority_fee,
			nonce: nonce.value,
			priority: self.priority,
			executor: self.executor,
		}
	}
}

/// Validates every raw field of a request. Purely local: no wallet or
/// chain round-trip happens before this returns, so malformed input is
/// rejected without touching the network.
pub fn validate_request(request: &PayRequest) -> Result<ValidatedPayment, BuildError> {
	let to = parse_recipient(&request.to)?;

	let token: Address = request.token.trim().parse().map_err(|e| {
		MessageError::MalformedField {
			field: "token",
			reason: format!("'{}' is not a valid address: {}", request.token, e),
		}
	})?;

	let amount = parse_decimal("amount", &request.amount)
		.map_err(|e| BuildError::InvalidAmount(e.to_string()))?;

	let priority_fee = parse_decimal("priorityFee", &request.priority_fee)
		.map_err(|e| BuildError::InvalidFee(e.to_string()))?;

	// No delegated executor means the zero address: any relayer may
	// execute the signed authorization.
	let executor = match request.executor.as_deref().map(str::trim) {
		None | Some("") => Address::ZERO,
		Some(raw) => raw.parse().map_err(|e| {
			BuildError::InvalidExecutor(format!("'{}' is not a valid address: {}", raw, e))
		})?,
	};

	Ok(ValidatedPayment {
		to,
		token,
		amount,
		priority_fee,
		priority: request.priority,
		executor,
	})
}

/// Builds a validated payment intent from raw fields and a resolved
/// nonce, in one step.
pub fn build_intent(
	evvm_id: u64,
	request: &PayRequest,
	nonce: NonceRecord,
) -> Result<PaymentIntent, BuildError> {
	Ok(validate_request(request)?.into_intent(evvm_id, nonce))
}

/// Assembles the final signed authorization. Pure field composition;
/// nothing is mutated or recomputed here.
pub fn build_authorization(
	from: Address,
	intent: PaymentIntent,
	signature: Signature,
) -> PaymentAuthorization {
	PaymentAuthorization {
		from,
		intent,
		signature,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy_primitives::U256;
	use pay_types::NonceMode;

	fn sample_request() -> PayRequest {
		PayRequest {
			to: "0x5FbDB2315678afecb367f032d93F642f64180aa3".to_string(),
			token: "0x00000000000000000000000000000000000000AA".to_string(),
			amount: "1000".to_string(),
			priority_fee: "10".to_string(),
			nonce: NoncePolicy::Sync,
			priority: Priority::Low,
			executor: None,
		}
	}

	fn sample_nonce() -> NonceRecord {
		NonceRecord {
			mode: NonceMode::Sync,
			value: U256::from(5u64),
		}
	}

	#[test]
	fn test_address_recipient_populates_address_field_only() {
		let intent = build_intent(1, &sample_request(), sample_nonce()).unwrap();

		assert_ne!(intent.to.to_address(), Address::ZERO);
		assert_eq!(intent.to.to_identity(), "");
	}

	#[test]
	fn test_identity_recipient_populates_identity_field_only() {
		let mut request = sample_request();
		request.to = "alice".to_string();

		let intent = build_intent(1, &request, sample_nonce()).unwrap();

		assert_eq!(intent.to.to_address(), Address::ZERO);
		assert_eq!(intent.to.to_identity(), "alice");
	}

	#[test]
	fn test_empty_recipient_is_rejected() {
		assert!(matches!(
			parse_recipient("  "),
			Err(BuildError::InvalidRecipient(_))
		));
	}

	#[test]
	fn test_malformed_hex_recipient_is_rejected_not_reclassified() {
		assert!(matches!(
			parse_recipient("0xnot-an-address"),
			Err(BuildError::InvalidRecipient(_))
		));
		assert!(matches!(
			parse_recipient("0x1234"),
			Err(BuildError::InvalidRecipient(_))
		));
	}

	#[test]
	fn test_invalid_amount_and_fee_do_not_default_to_zero() {
		let mut request = sample_request();
		request.amount = "12.5".to_string();
		assert!(matches!(
			build_intent(1, &request, sample_nonce()),
			Err(BuildError::InvalidAmount(_))
		));

		let mut request = sample_request();
		request.priority_fee = "-1".to_string();
		assert!(matches!(
			build_intent(1, &request, sample_nonce()),
			Err(BuildError::InvalidFee(_))
		));
	}

	#[test]
	fn test_executor_defaults_to_zero_address() {
		let intent = build_intent(1, &sample_request(), sample_nonce()).unwrap();
		assert_eq!(intent.executor, Address::ZERO);

		let mut request = sample_request();
		request.executor = Some("".to_string());
		let intent = build_intent(1, &request, sample_nonce()).unwrap();
		assert_eq!(intent.executor, Address::ZERO);
	}

	#[test]
	fn test_explicit_executor_is_kept() {
		let mut request = sample_request();
		request.executor = Some("0x00000000000000000000000000000000000000bb".to_string());

		let intent = build_intent(1, &request, sample_nonce()).unwrap();
		assert_eq!(
			intent.executor,
			"0x00000000000000000000000000000000000000bb"
				.parse::<Address>()
				.unwrap()
		);
	}

	#[test]
	fn test_bad_executor_is_rejected() {
		let mut request = sample_request();
		request.executor = Some("relayer-one".to_string());

		assert!(matches!(
			build_intent(1, &request, sample_nonce()),
			Err(BuildError::InvalidExecutor(_))
		));
	}

	#[test]
	fn test_resolved_nonce_value_is_recorded() {
		let intent = build_intent(1, &sample_request(), sample_nonce()).unwrap();
		assert_eq!(intent.nonce, U256::from(5u64));
	}
}
