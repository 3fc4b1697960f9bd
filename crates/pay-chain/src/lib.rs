//! Chain client boundary for the EVVM pay system.
//!
//! This crate defines the read and write surface the payment flow needs
//! from the ledger: fetching an account's next synchronous nonce, and
//! submitting a signed payment authorization for execution. The chain
//! is an opaque RPC boundary; every call either succeeds or surfaces
//! the underlying transport or revert detail, and nothing here retries.

use alloy_primitives::{Address, U256};
use async_trait::async_trait;
use pay_types::{PaymentAuthorization, TransactionHash};
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod evm {
		pub mod alloy;
	}
}

/// Errors that can occur during chain operations.
#[derive(Debug, Error)]
pub enum ChainError {
	/// A read call against the chain failed.
	#[error("Chain query failed: {0}")]
	QueryFailed(String),
	/// Submission of a signed payment failed. Carries the underlying
	/// transport or revert reason verbatim.
	#[error("Submission failed: {0}")]
	SubmissionFailed(String),
	/// Network-level error unrelated to a specific call.
	#[error("Network error: {0}")]
	Network(String),
}

/// Trait defining the interface for chain client implementations.
///
/// On-chain writes are not idempotent: a repeated submission with a
/// synchronous nonce is rejected by the chain, and one with an
/// asynchronous nonce would duplicate the payment. Implementations must
/// therefore submit exactly once per call and leave retries to an
/// explicit caller decision.
#[async_trait]
pub trait ChainInterface: Send + Sync {
	/// Reads the account's next expected synchronous nonce from the
	/// EVVM contract (`getNextCurrentSyncNonce`).
	async fn next_sync_nonce(
		&self,
		contract: Address,
		account: Address,
	) -> Result<U256, ChainError>;

	/// Submits a signed payment authorization to the EVVM contract's
	/// `pay` entrypoint and returns the transaction hash.
	async fn submit_pay(
		&self,
		authorization: &PaymentAuthorization,
		contract: Address,
	) -> Result<TransactionHash, ChainError>;
}

/// Service that manages chain access.
///
/// Thin wrapper around a chain implementation; the payment flow owns
/// one of these instead of the concrete provider type.
pub struct ChainService {
	/// The underlying chain implementation.
	implementation: Box<dyn ChainInterface>,
}

impl ChainService {
	/// Creates a new ChainService with the specified implementation.
	pub fn new(implementation: Box<dyn ChainInterface>) -> Self {
		Self { implementation }
	}

	/// Reads the next synchronous nonce for an account. Always hits the
	/// chain; results are never cached.
	pub async fn next_sync_nonce(
		&self,
		contract: Address,
		account: Address,
	) -> Result<U256, ChainError> {
		self.implementation.next_sync_nonce(contract, account).await
	}

	/// Submits a signed payment authorization, exactly once.
	pub async fn submit_pay(
		&self,
		authorization: &PaymentAuthorization,
		contract: Address,
	) -> Result<TransactionHash, ChainError> {
		self.implementation
			.submit_pay(authorization, contract)
			.await
	}
}
