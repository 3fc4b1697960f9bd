//! Local private-key wallet implementation.
//!
//! Signs with an in-process key parsed from configuration. A local key
//! has no interactive confirmation step, so it never produces
//! [`WalletError::Declined`]; that variant exists for interactive
//! wallet implementations behind the same interface.

use alloy_primitives::Address;
use alloy_signer::Signer;
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;
use pay_types::{without_0x_prefix, SecretString, Signature};

use crate::{WalletError, WalletInterface};

/// Wallet backed by a local private key.
pub struct LocalWallet {
	/// The in-process signer.
	signer: PrivateKeySigner,
}

impl LocalWallet {
	/// Creates a local wallet from a hex-encoded private key.
	pub fn new(private_key: &SecretString) -> Result<Self, WalletError> {
		let signer: PrivateKeySigner = without_0x_prefix(private_key.expose_secret())
			.parse()
			.map_err(|e| WalletError::InvalidKey(format!("failed to parse private key: {}", e)))?;

		Ok(Self { signer })
	}
}

#[async_trait]
impl WalletInterface for LocalWallet {
	async fn address(&self) -> Result<Address, WalletError> {
		Ok(self.signer.address())
	}

	async fn sign_message(&self, message: &[u8]) -> Result<Signature, WalletError> {
		let signature = self
			.signer
			.sign_message(message)
			.await
			.map_err(|e| WalletError::SigningFailed(e.to_string()))?;

		Ok(Signature(signature.as_bytes().to_vec()))
	}
}

/// Factory function to create a local wallet from configuration.
pub fn create_wallet(private_key: &SecretString) -> Result<Box<dyn WalletInterface>, WalletError> {
	Ok(Box::new(LocalWallet::new(private_key)?))
}

#[cfg(test)]
mod tests {
	use super::*;

	// Well-known anvil test key; never use outside tests.
	const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

	#[tokio::test]
	async fn test_address_matches_key() {
		let wallet = LocalWallet::new(&SecretString::from(TEST_KEY)).unwrap();
		let address = wallet.address().await.unwrap();

		assert_eq!(
			address,
			"0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
				.parse::<Address>()
				.unwrap()
		);
	}

	#[tokio::test]
	async fn test_sign_message_returns_65_byte_signature() {
		let wallet = LocalWallet::new(&SecretString::from(TEST_KEY)).unwrap();
		let signature = wallet.sign_message(b"1,pay,alice").await.unwrap();

		assert_eq!(signature.as_bytes().len(), 65);
	}

	#[test]
	fn test_invalid_key_is_rejected() {
		let result = LocalWallet::new(&SecretString::from("not-a-key"));
		assert!(matches!(result, Err(WalletError::InvalidKey(_))));
	}
}
