//! Alloy-based EVM chain client implementation.
//!
//! Talks to an EVVM deployment over HTTP JSON-RPC using the Alloy
//! provider stack: `eth_call` for the synchronous nonce read and a
//! wallet-signed transaction for the `pay` write.

use std::sync::Arc;

use alloy_network::EthereumWallet;
use alloy_primitives::{Address, U256};
use alloy_provider::{Provider, ProviderBuilder};
use alloy_rpc_types::TransactionRequest;
use alloy_signer::Signer;
use alloy_signer_local::PrivateKeySigner;
use alloy_sol_types::{sol, SolCall};
use alloy_transport_http::Http;
use async_trait::async_trait;
use pay_types::{with_0x_prefix, without_0x_prefix, PaymentAuthorization, SecretString, TransactionHash};

use crate::{ChainError, ChainInterface};

// Solidity surface of the EVVM contract used by this system.
sol! {
	interface IEvvm {
		function pay(address from, address to_address, string to_identity, address token, uint256 amount, uint256 priorityFee, uint256 nonce, bool priority, address executor, bytes signature) external;
		function getNextCurrentSyncNonce(address account) external view returns (uint256);
	}
}

/// Alloy-based EVM chain client.
///
/// Holds a single provider for the configured network. The provider's
/// wallet signs and submits the `pay` transaction; the payment
/// authorization itself is already signed by the user's wallet and is
/// carried inside the calldata.
pub struct AlloyChain {
	/// Alloy provider for the configured network.
	provider: Arc<dyn Provider<Http<reqwest::Client>> + Send + Sync>,
}

impl AlloyChain {
	/// Creates a new AlloyChain for one RPC endpoint.
	pub fn new(
		rpc_url: &str,
		chain_id: u64,
		signer: PrivateKeySigner,
	) -> Result<Self, ChainError> {
		let url = rpc_url
			.parse()
			.map_err(|e| ChainError::Network(format!("Invalid RPC URL: {}", e)))?;

		let chain_signer = signer.with_chain_id(Some(chain_id));
		let wallet = EthereumWallet::from(chain_signer);

		let provider = ProviderBuilder::new()
			.with_recommended_fillers()
			.wallet(wallet)
			.on_http(url);

		Ok(Self {
			provider: Arc::new(provider) as Arc<dyn Provider<Http<reqwest::Client>> + Send + Sync>,
		})
	}
}

#[async_trait]
impl ChainInterface for AlloyChain {
	async fn next_sync_nonce(
		&self,
		contract: Address,
		account: Address,
	) -> Result<U256, ChainError> {
		let call_data = IEvvm::getNextCurrentSyncNonceCall { account }.abi_encode();

		let call_result = self
			.provider
			.call(
				&TransactionRequest::default()
					.to(contract)
					.input(call_data.into()),
			)
			.await
			.map_err(|e| {
				ChainError::QueryFailed(format!("Failed to call getNextCurrentSyncNonce: {}", e))
			})?;

		if call_result.len() < 32 {
			return Err(ChainError::QueryFailed(
				"Invalid getNextCurrentSyncNonce response".to_string(),
			));
		}

		Ok(U256::from_be_slice(&call_result[..32]))
	}

	async fn submit_pay(
		&self,
		authorization: &PaymentAuthorization,
		contract: Address,
	) -> Result<TransactionHash, ChainError> {
		let intent = &authorization.intent;

		// Fixed positional argument order expected by the contract.
		let call_data = IEvvm::payCall {
			from: authorization.from,
			to_address: intent.to.to_address(),
			to_identity: intent.to.to_identity().to_string(),
			token: intent.token,
			amount: intent.amount,
			priorityFee: intent.priority_fee,
			nonce: intent.nonce,
			priority: intent.priority.as_flag(),
			executor: intent.executor,
			signature: authorization.signature.as_bytes().to_vec().into(),
		}
		.abi_encode();

		let pending_tx = self
			.provider
			.send_transaction(
				TransactionRequest::default()
					.to(contract)
					.input(call_data.into()),
			)
			.await
			.map_err(|e| ChainError::SubmissionFailed(e.to_string()))?;

		let tx_hash = *pending_tx.tx_hash();
		tracing::info!(
			tx_hash = %with_0x_prefix(&hex::encode(tx_hash.0)),
			"Submitted pay transaction"
		);

		Ok(TransactionHash(tx_hash.0.to_vec()))
	}
}

/// Factory function to create an alloy-backed chain client.
///
/// Parses the submitter private key and configures an HTTP provider for
/// the given network.
pub fn create_chain(
	rpc_url: &str,
	chain_id: u64,
	private_key: &SecretString,
) -> Result<Box<dyn ChainInterface>, ChainError> {
	let signer: PrivateKeySigner = without_0x_prefix(private_key.expose_secret())
		.parse()
		.map_err(|e| ChainError::Network(format!("Invalid private key: {}", e)))?;

	Ok(Box::new(AlloyChain::new(rpc_url, chain_id, signer)?))
}
