//! Wallet provider boundary for the EVVM pay system.
//!
//! The wallet holds the key material and performs the actual signing;
//! this crate defines the interface the payment flow talks to and a
//! service wrapper around it. The core never touches private keys: it
//! hands a canonical message to the wallet and gets signature bytes
//! back, or a distinct outcome when the user declines.

use std::time::Duration;

use alloy_primitives::Address;
use async_trait::async_trait;
use pay_types::{CanonicalMessage, Signature};
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod local;
}

/// Delay between wallet account discovery attempts.
const DISCOVERY_RETRY_DELAY: Duration = Duration::from_millis(300);

/// Default number of account discovery attempts before giving up.
const DEFAULT_DISCOVERY_ATTEMPTS: u32 = 3;

/// Errors that can occur during wallet operations.
#[derive(Debug, Error)]
pub enum WalletError {
	/// No wallet account is available, after bounded discovery retries.
	#[error("Wallet unavailable: {0}")]
	Unavailable(String),
	/// The user declined the signature request. Terminal for the
	/// authorization attempt; never conflated with transport failure.
	#[error("Signature request declined by user")]
	Declined,
	/// The signing operation itself failed.
	#[error("Signing failed: {0}")]
	SigningFailed(String),
	/// The configured key material is invalid or malformed.
	#[error("Invalid key: {0}")]
	InvalidKey(String),
}

/// Trait defining the interface for wallet providers.
///
/// Implementations hold the key material. A call to `sign_message` may
/// suspend for an unbounded, user-dependent duration (interactive
/// confirmation); callers that need a timeout or cancellation wrap the
/// call themselves.
#[async_trait]
pub trait WalletInterface: Send + Sync {
	/// Returns the currently connected account address.
	async fn address(&self) -> Result<Address, WalletError>;

	/// Signs an arbitrary message (EIP-191) with the connected account.
	///
	/// A user rejection surfaces as [`WalletError::Declined`], distinct
	/// from [`WalletError::SigningFailed`].
	async fn sign_message(&self, message: &[u8]) -> Result<Signature, WalletError>;
}

/// Service that manages wallet operations.
///
/// Wraps a wallet implementation, adding bounded retry for account
/// discovery. Signature requests are delegated as-is: they are never
/// retried, and payload fields are never touched here.
pub struct WalletService {
	/// The underlying wallet implementation.
	implementation: Box<dyn WalletInterface>,
	/// Number of account discovery attempts before surfacing failure.
	discovery_attempts: u32,
}

impl WalletService {
	/// Creates a new WalletService with the default discovery retry
	/// policy.
	pub fn new(implementation: Box<dyn WalletInterface>) -> Self {
		Self::with_discovery_attempts(implementation, DEFAULT_DISCOVERY_ATTEMPTS)
	}

	/// Creates a new WalletService with an explicit number of account
	/// discovery attempts (minimum one).
	pub fn with_discovery_attempts(
		implementation: Box<dyn WalletInterface>,
		discovery_attempts: u32,
	) -> Self {
		Self {
			implementation,
			discovery_attempts: discovery_attempts.max(1),
		}
	}

	/// Retrieves the connected account address, retrying discovery a
	/// bounded number of times before surfacing `Unavailable`.
	pub async fn connected_account(&self) -> Result<Address, WalletError> {
		let mut last_error = "no wallet account connected".to_string();

		for attempt in 1..=self.discovery_attempts {
			match self.implementation.address().await {
				Ok(address) => return Ok(address),
				Err(e) => {
					tracing::debug!(
						attempt,
						error = %e,
						"Wallet account discovery failed"
					);
					last_error = e.to_string();
				}
			}

			if attempt < self.discovery_attempts {
				tokio::time::sleep(DISCOVERY_RETRY_DELAY).await;
			}
		}

		Err(WalletError::Unavailable(last_error))
	}

	/// Requests a signature over a canonical message.
	///
	/// One shot: a decline or failure is returned to the caller, who
	/// must restart the flow from payload construction.
	pub async fn request_signature(
		&self,
		message: &CanonicalMessage,
	) -> Result<Signature, WalletError> {
		self.implementation.sign_message(message.as_bytes()).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::sync::atomic::{AtomicU32, Ordering};

	/// Wallet stub whose `address` fails a fixed number of times before
	/// succeeding, recording how often it was asked.
	struct FlakyWallet {
		failures_before_success: u32,
		calls: AtomicU32,
	}

	#[async_trait]
	impl WalletInterface for FlakyWallet {
		async fn address(&self) -> Result<Address, WalletError> {
			let call = self.calls.fetch_add(1, Ordering::SeqCst);
			if call < self.failures_before_success {
				Err(WalletError::Unavailable("not connected yet".to_string()))
			} else {
				Ok(Address::ZERO)
			}
		}

		async fn sign_message(&self, _message: &[u8]) -> Result<Signature, WalletError> {
			Err(WalletError::Declined)
		}
	}

	#[tokio::test(start_paused = true)]
	async fn test_account_discovery_retries_then_succeeds() {
		let service = WalletService::new(Box::new(FlakyWallet {
			failures_before_success: 2,
			calls: AtomicU32::new(0),
		}));

		let address = service.connected_account().await.unwrap();
		assert_eq!(address, Address::ZERO);
	}

	#[tokio::test(start_paused = true)]
	async fn test_account_discovery_is_bounded() {
		let wallet = Box::new(FlakyWallet {
			failures_before_success: u32::MAX,
			calls: AtomicU32::new(0),
		});
		let service = WalletService::with_discovery_attempts(wallet, 2);

		let result = service.connected_account().await;
		assert!(matches!(result, Err(WalletError::Unavailable(_))));
	}

	#[tokio::test]
	async fn test_decline_passes_through_unchanged() {
		let service = WalletService::new(Box::new(FlakyWallet {
			failures_before_success: 0,
			calls: AtomicU32::new(0),
		}));

		let message = {
			use pay_types::{pay_message, PaymentIntent, Priority, Recipient};
			pay_message(&PaymentIntent {
				evvm_id: 1,
				to: Recipient::Identity("alice".to_string()),
				token: Address::ZERO,
				amount: alloy_primitives::U256::from(1u64),
				priority_fee: alloy_primitives::U256::ZERO,
				nonce: alloy_primitives::U256::ZERO,
				priority: Priority::Low,
				executor: Address::ZERO,
			})
		};

		let result = service.request_signature(&message).await;
		assert!(matches!(result, Err(WalletError::Declined)));
	}
}
