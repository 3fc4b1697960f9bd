//! Common types for the EVVM pay system.
//!
//! This crate defines the data model shared by every component of the
//! payment flow: payment intents and authorizations, nonce records,
//! canonical message construction, and small utilities. It is the one
//! place where the shape of a payment is decided, so the other crates
//! stay consistent with each other and with the on-chain contract.

/// Chain-side types: transaction hashes returned by submission.
pub mod chain;
/// Canonical message construction for payment signatures.
pub mod message;
/// Nonce modes and resolved nonce records.
pub mod nonce;
/// Payment intents, recipients, and signed authorizations.
pub mod payment;
/// Secure string type for private keys.
pub mod secret_string;
/// Hex string helpers.
pub mod utils;
/// Wallet-side types: opaque signatures.
pub mod wallet;

// Re-export all types for convenient access
pub use chain::*;
pub use message::*;
pub use nonce::*;
pub use payment::*;
pub use secret_string::SecretString;
pub use utils::{with_0x_prefix, without_0x_prefix};
pub use wallet::*;
