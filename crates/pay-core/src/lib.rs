//! Core payment flow for the EVVM pay system.
//!
//! This crate orchestrates one payment authorization from raw caller
//! input to a submitted transaction: payload building, nonce
//! resolution, canonical message construction, the wallet signature
//! request, and finally submission through the chain client. One
//! authorization is assembled at a time; a single-slot in-flight guard
//! rejects a second attempt while one is pending, and both the signing
//! request and the submission accept a cancellation token so a hung
//! external call can be abandoned.

use std::future::Future;
use std::sync::Arc;

use alloy_primitives::Address;
use pay_chain::ChainService;
use pay_types::{pay_message, PaymentAuthorization, Priority, TransactionHash};
use pay_wallet::{WalletError, WalletService};
use thiserror::Error;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

pub mod builder;
pub mod nonce;

pub use builder::{BuildError, NoncePolicy, PayRequest};
pub use nonce::{NonceError, NonceManager};

/// Errors that can occur during the payment flow.
#[derive(Debug, Error)]
pub enum PaymentError {
	/// Payload validation failed before any network or wallet call.
	#[error(transparent)]
	Build(#[from] BuildError),
	/// No wallet account was available.
	#[error("Wallet unavailable: {0}")]
	WalletUnavailable(String),
	/// The user declined the signature request. Terminal for this
	/// attempt; the flow must be restarted from payload construction.
	#[error("Signature declined by user")]
	SignatureDeclined,
	/// Signing failed for a reason other than user rejection.
	#[error("Signing failed: {0}")]
	SigningFailed(String),
	/// The synchronous nonce read failed.
	#[error("Chain query failed: {0}")]
	ChainQueryFailed(String),
	/// On-chain submission failed. Carries the underlying transport or
	/// revert detail; retrying is an explicit caller action.
	#[error("Submission failed: {0}")]
	SubmissionFailed(String),
	/// Another authorization is already being assembled.
	#[error("Another authorization is already in flight")]
	AuthorizationInFlight,
	/// The operation was cancelled by the caller.
	#[error("Operation cancelled")]
	Cancelled,
}

impl From<NonceError> for PaymentError {
	fn from(err: NonceError) -> Self {
		match err {
			NonceError::ChainQueryFailed(e) => PaymentError::ChainQueryFailed(e),
		}
	}
}

/// Orchestrates payment authorization and submission.
///
/// Owns the wallet and chain services plus the deployment identity
/// (EVVM id and contract address). There is no shared mutable state
/// across attempts: every `authorize` re-reads the wallet account
/// (once per attempt) and, in synchronous mode, re-queries the nonce.
pub struct PaymentFlow {
	/// Wallet service for account discovery and signing.
	wallet: Arc<WalletService>,
	/// Chain service for nonce reads and submission.
	chain: Arc<ChainService>,
	/// Nonce resolution.
	nonces: NonceManager,
	/// Identifier of the targeted EVVM deployment.
	evvm_id: u64,
	/// Address of the EVVM contract.
	evvm_address: Address,
	/// Single-slot guard: at most one authorization in flight.
	in_flight: Mutex<()>,
}

impl PaymentFlow {
	/// Creates a new PaymentFlow for one EVVM deployment.
	pub fn new(
		wallet: Arc<WalletService>,
		chain: Arc<ChainService>,
		evvm_id: u64,
		evvm_address: Address,
	) -> Self {
		let nonces = NonceManager::new(Arc::clone(&chain), evvm_address);

		Self {
			wallet,
			chain,
			nonces,
			evvm_id,
			evvm_address,
			in_flight: Mutex::new(()),
		}
	}

	/// Assembles and signs one payment authorization.
	///
	/// Fails fast with [`PaymentError::AuthorizationInFlight`] if
	/// another authorization is being assembled. A declined signature
	/// surfaces as [`PaymentError::SignatureDeclined`] and nothing is
	/// submitted; the caller restarts from payload construction (the
	/// nonce is re-resolved on the next attempt if synchronous).
	pub async fn authorize(
		&self,
		request: PayRequest,
		cancel: &CancellationToken,
	) -> Result<PaymentAuthorization, PaymentError> {
		let _guard = self
			.in_flight
			.try_lock()
			.map_err(|_| PaymentError::AuthorizationInFlight)?;

		// Protocol convention, not an invariant: low priority is meant
		// for sync nonces, high for async. Recorded as-is either way.
		match (&request.nonce, request.priority) {
			(NoncePolicy::Sync, Priority::High) | (NoncePolicy::Async(_), Priority::Low) => {
				tracing::warn!(
					"Priority tier deviates from the conventional nonce-mode pairing"
				);
			}
			_ => {}
		}

		// All local validation runs before the first wallet or chain
		// round-trip: malformed input never costs a network call.
		let payment = builder::validate_request(&request)?;
		let caller_nonce = match &request.nonce {
			NoncePolicy::Sync => None,
			NoncePolicy::Async(raw) => {
				Some(pay_types::parse_decimal("nonce", raw).map_err(BuildError::from)?)
			}
		};

		// One account discovery per attempt; the same account feeds both
		// the sync nonce read and the authorization's `from` field.
		let from = cancellable(cancel, self.wallet.connected_account())
			.await?
			.map_err(|e| PaymentError::WalletUnavailable(e.to_string()))?;

		let nonce = match caller_nonce {
			None => cancellable(cancel, self.nonces.resolve_sync(from)).await??,
			Some(value) => self.nonces.resolve_async(value),
		};

		let intent = payment.into_intent(self.evvm_id, nonce);
		let message = pay_message(&intent);
		tracing::debug!(message = %message, "Built canonical pay message");

		let signature = match cancellable(cancel, self.wallet.request_signature(&message)).await?
		{
			Ok(signature) => signature,
			Err(WalletError::Declined) => return Err(PaymentError::SignatureDeclined),
			Err(e) => return Err(PaymentError::SigningFailed(e.to_string())),
		};

		tracing::info!(from = %from, "Payment authorization signed");

		Ok(builder::build_authorization(from, intent, signature))
	}

	/// Submits a signed authorization for on-chain execution.
	///
	/// Consumes the authorization: submission is attempted exactly
	/// once, and a failure is terminal for this authorization. Blind
	/// retries are unsafe on both nonce modes, so re-submission means a
	/// fresh authorization and an explicit caller decision.
	pub async fn submit(
		&self,
		authorization: PaymentAuthorization,
		cancel: &CancellationToken,
	) -> Result<TransactionHash, PaymentError> {
		let result = cancellable(
			cancel,
			self.chain.submit_pay(&authorization, self.evvm_address),
		)
		.await?;

		match result {
			Ok(tx_hash) => {
				tracing::info!(tx_hash = %tx_hash, "Payment executed");
				Ok(tx_hash)
			}
			Err(e) => {
				tracing::error!(error = %e, "Payment submission failed");
				Err(PaymentError::SubmissionFailed(e.to_string()))
			}
		}
	}
}

/// Races a future against the cancellation token.
async fn cancellable<F, T>(cancel: &CancellationToken, future: F) -> Result<T, PaymentError>
where
	F: Future<Output = T>,
{
	tokio::select! {
		_ = cancel.cancelled() => Err(PaymentError::Cancelled),
		result = future => Ok(result),
	}
}
