//! Nonce resolution for payment authorizations.
//!
//! Two modes, selected explicitly by the caller: synchronous resolution
//! reads the account's next counter from the chain immediately before
//! signing, asynchronous resolution takes a caller-chosen value and
//! performs no round-trip. Nothing is ever cached between resolutions;
//! a stale synchronous nonce is rejected chain-side, so serving a
//! remembered value would only manufacture failures.
//!
//! Account discovery is the flow's job: the account is resolved once
//! per authorization attempt and passed in here, so synchronous
//! resolution never triggers a second wallet round-trip.

use std::sync::Arc;

use alloy_primitives::{Address, U256};
use pay_chain::ChainService;
use pay_types::{NonceMode, NonceRecord};
use thiserror::Error;

/// Errors that can occur during nonce resolution.
#[derive(Debug, Error)]
pub enum NonceError {
	/// The chain read failed. Surfaced without retry; whether to
	/// re-trigger is the caller's decision.
	#[error("Chain query failed: {0}")]
	ChainQueryFailed(String),
}

/// Resolves the nonce field for payment intents.
pub struct NonceManager {
	/// Chain service for the synchronous counter read.
	chain: Arc<ChainService>,
	/// EVVM contract that owns the nonce counters.
	contract: Address,
}

impl NonceManager {
	/// Creates a new NonceManager for one EVVM deployment.
	pub fn new(chain: Arc<ChainService>, contract: Address) -> Self {
		Self { chain, contract }
	}

	/// Resolves a synchronous nonce: the given account's next expected
	/// counter, fetched fresh from the chain on every call.
	///
	/// The returned value is valid for exactly one successful
	/// submission. Reuse is rejected by chain-side validation, which is
	/// why this method never serves a cached value.
	pub async fn resolve_sync(&self, account: Address) -> Result<NonceRecord, NonceError> {
		let value = self
			.chain
			.next_sync_nonce(self.contract, account)
			.await
			.map_err(|e| NonceError::ChainQueryFailed(e.to_string()))?;

		tracing::debug!(account = %account, nonce = %value, "Resolved sync nonce");

		Ok(NonceRecord {
			mode: NonceMode::Sync,
			value,
		})
	}

	/// Resolves an asynchronous nonce from a caller-chosen value.
	///
	/// No chain round-trip; the caller is responsible for uniqueness
	/// per account. This is what allows several payments to be
	/// authorized concurrently without contending on a shared counter.
	pub fn resolve_async(&self, value: U256) -> NonceRecord {
		NonceRecord {
			mode: NonceMode::Async,
			value,
		}
	}
}
