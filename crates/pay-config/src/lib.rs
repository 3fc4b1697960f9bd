//! Configuration module for the EVVM pay system.
//!
//! Loads the service configuration from a TOML file and validates it
//! before any component is built: the targeted EVVM deployment, the
//! network endpoint, and the wallet key. Validation failures are
//! reported with the offending field so a bad file fails fast instead
//! of surfacing later as an RPC or signing error.

use std::path::Path;

use alloy_primitives::Address;
use pay_types::SecretString;
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error that occurs during file I/O operations.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	/// Error that occurs when parsing TOML configuration.
	#[error("Configuration error: {0}")]
	Parse(String),
	/// Error that occurs when configuration validation fails.
	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		// Extract just the message without the input dump
		ConfigError::Parse(err.message().to_string())
	}
}

/// Main configuration structure for the pay service.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	/// The EVVM deployment payments are signed for.
	pub evvm: EvvmConfig,
	/// The network the chain client talks to.
	pub network: NetworkConfig,
	/// Wallet configuration.
	pub wallet: WalletConfig,
}

/// The EVVM deployment payments target.
#[derive(Debug, Clone, Deserialize)]
pub struct EvvmConfig {
	/// Deployment identifier, signed into every canonical message.
	pub id: u64,
	/// EVVM contract address.
	pub address: String,
}

/// Network endpoint configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct NetworkConfig {
	/// HTTP JSON-RPC endpoint.
	pub rpc_url: String,
	/// Chain ID of the network.
	pub chain_id: u64,
}

/// Wallet configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct WalletConfig {
	/// Hex-encoded private key. Redacted in logs and serialization.
	pub private_key: SecretString,
	/// Account discovery attempts before surfacing failure.
	#[serde(default = "default_discovery_attempts")]
	pub discovery_attempts: u32,
}

/// Returns the default number of wallet account discovery attempts.
fn default_discovery_attempts() -> u32 {
	3
}

impl Config {
	/// Loads and validates configuration from a TOML file.
	pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
		let content = std::fs::read_to_string(path)?;
		Self::from_toml_str(&content)
	}

	/// Parses and validates configuration from a TOML string.
	pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
		let config: Config = toml::from_str(content)?;
		config.validate()?;
		Ok(config)
	}

	/// Validates field contents beyond what deserialization checks.
	fn validate(&self) -> Result<(), ConfigError> {
		self.evvm.address.parse::<Address>().map_err(|e| {
			ConfigError::Validation(format!(
				"evvm.address '{}' is not a valid address: {}",
				self.evvm.address, e
			))
		})?;

		if !self.network.rpc_url.starts_with("http://")
			&& !self.network.rpc_url.starts_with("https://")
		{
			return Err(ConfigError::Validation(
				"network.rpc_url must be an http(s) URL".to_string(),
			));
		}

		if self.network.chain_id == 0 {
			return Err(ConfigError::Validation(
				"network.chain_id must be non-zero".to_string(),
			));
		}

		if self.wallet.private_key.is_empty() {
			return Err(ConfigError::Validation(
				"wallet.private_key must not be empty".to_string(),
			));
		}

		if self.wallet.discovery_attempts == 0 {
			return Err(ConfigError::Validation(
				"wallet.discovery_attempts must be at least 1".to_string(),
			));
		}

		Ok(())
	}

	/// The EVVM contract address as a parsed address.
	///
	/// Validation has already checked the field, so this only fails if
	/// the config was constructed without going through `validate`.
	pub fn evvm_address(&self) -> Result<Address, ConfigError> {
		self.evvm.address.parse::<Address>().map_err(|e| {
			ConfigError::Validation(format!("evvm.address is not a valid address: {}", e))
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;

	const VALID_CONFIG: &str = r#"
		[evvm]
		id = 1
		address = "0x00000000000000000000000000000000000000ee"

		[network]
		rpc_url = "http://localhost:8545"
		chain_id = 31337

		[wallet]
		private_key = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80"
	"#;

	#[test]
	fn test_valid_config_parses() {
		let config = Config::from_toml_str(VALID_CONFIG).unwrap();

		assert_eq!(config.evvm.id, 1);
		assert_eq!(config.network.chain_id, 31337);
		// Default applies when the field is omitted.
		assert_eq!(config.wallet.discovery_attempts, 3);
		assert!(!config.wallet.private_key.is_empty());
	}

	#[test]
	fn test_config_loads_from_file() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		file.write_all(VALID_CONFIG.as_bytes()).unwrap();

		let config = Config::from_file(file.path()).unwrap();
		assert_eq!(config.evvm.id, 1);
	}

	#[test]
	fn test_invalid_evvm_address_is_rejected() {
		let content = VALID_CONFIG.replace(
			"0x00000000000000000000000000000000000000ee",
			"not-an-address",
		);

		let result = Config::from_toml_str(&content);
		assert!(matches!(result, Err(ConfigError::Validation(_))));
	}

	#[test]
	fn test_non_http_rpc_url_is_rejected() {
		let content = VALID_CONFIG.replace("http://localhost:8545", "ws://localhost:8545");

		let result = Config::from_toml_str(&content);
		assert!(matches!(result, Err(ConfigError::Validation(_))));
	}

	#[test]
	fn test_missing_section_is_a_parse_error() {
		let content = VALID_CONFIG.replace("[wallet]", "[other]");

		let result = Config::from_toml_str(&content);
		assert!(matches!(result, Err(ConfigError::Parse(_))));
	}

	#[test]
	fn test_private_key_is_redacted_in_debug() {
		let config = Config::from_toml_str(VALID_CONFIG).unwrap();
		let debug_str = format!("{:?}", config);

		assert!(!debug_str.contains("ac0974be"));
		assert!(debug_str.contains("REDACTED"));
	}
}
