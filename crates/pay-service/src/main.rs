//! Main entry point for the EVVM pay service.
//!
//! This binary signs and (optionally) submits one EVVM payment per
//! invocation: it loads configuration, wires the local wallet and the
//! alloy chain client into a payment flow, and maps Ctrl-C to
//! cancellation of whichever external call is in flight.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use pay_chain::{implementations::evm::alloy::create_chain, ChainService};
use pay_config::Config;
use pay_core::{NoncePolicy, PayRequest, PaymentFlow};
use pay_types::Priority;
use pay_wallet::{implementations::local::create_wallet, WalletService};
use tokio_util::sync::CancellationToken;

/// Command-line arguments for the pay service.
#[derive(Parser, Debug)]
#[command(author, version, about = "Sign and submit EVVM payments", long_about = None)]
struct Args {
	/// Path to configuration file
	#[arg(short, long, default_value = "config.toml")]
	config: PathBuf,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "info")]
	log_level: String,

	/// Recipient: a 0x hex address or a human-readable identity
	#[arg(long)]
	to: String,

	/// Token contract address of the asset being paid
	#[arg(long)]
	token: String,

	/// Amount to pay, base-10
	#[arg(long)]
	amount: String,

	/// Priority fee for the executing relayer, base-10
	#[arg(long, default_value = "0")]
	priority_fee: String,

	/// Caller-chosen async nonce. Omit to fetch the account's next
	/// sync nonce from the chain instead.
	#[arg(long)]
	nonce: Option<String>,

	/// Priority tier (high | low). Defaults to the conventional pairing
	/// for the chosen nonce mode.
	#[arg(long)]
	priority: Option<String>,

	/// Delegated executor address; omit to allow any relayer
	#[arg(long)]
	executor: Option<String>,

	/// Sign and print the authorization without submitting it
	#[arg(long)]
	no_submit: bool,
}

/// Main entry point for the pay service.
///
/// This function:
/// 1. Parses command-line arguments
/// 2. Initializes logging infrastructure
/// 3. Loads configuration from file
/// 4. Builds the payment flow with the local wallet and alloy chain
/// 5. Authorizes and optionally submits one payment
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	// Initialize tracing with env filter
	use tracing_subscriber::{fmt, EnvFilter};

	let default_directive = args.log_level.to_string();
	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

	fmt().with_env_filter(env_filter).with_target(true).init();

	// Load configuration
	let config = Config::from_file(&args.config)?;
	tracing::info!(
		evvm_id = config.evvm.id,
		chain_id = config.network.chain_id,
		"Loaded configuration"
	);

	// Wire concrete implementations into the flow
	let wallet = WalletService::with_discovery_attempts(
		create_wallet(&config.wallet.private_key)?,
		config.wallet.discovery_attempts,
	);
	let chain = ChainService::new(create_chain(
		&config.network.rpc_url,
		config.network.chain_id,
		&config.wallet.private_key,
	)?);
	let flow = PaymentFlow::new(
		Arc::new(wallet),
		Arc::new(chain),
		config.evvm.id,
		config.evvm_address()?,
	);

	// Ctrl-C cancels whichever wallet or chain call is in flight
	let cancel = CancellationToken::new();
	{
		let cancel = cancel.clone();
		tokio::spawn(async move {
			if tokio::signal::ctrl_c().await.is_ok() {
				tracing::warn!("Interrupt received, cancelling");
				cancel.cancel();
			}
		});
	}

	let priority = match args.priority.as_deref() {
		Some("high") => Priority::High,
		Some("low") => Priority::Low,
		Some(other) => {
			return Err(format!("invalid priority '{}', expected high or low", other).into())
		}
		// Conventional pairing: async nonce -> high, sync nonce -> low.
		None => {
			if args.nonce.is_some() {
				Priority::High
			} else {
				Priority::Low
			}
		}
	};

	let request = PayRequest {
		to: args.to,
		token: args.token,
		amount: args.amount,
		priority_fee: args.priority_fee,
		nonce: match args.nonce {
			Some(value) => NoncePolicy::Async(value),
			None => NoncePolicy::Sync,
		},
		priority,
		executor: args.executor,
	};

	let authorization = flow.authorize(request, &cancel).await?;
	println!("{}", serde_json::to_string_pretty(&authorization)?);

	if args.no_submit {
		tracing::info!("Submission skipped (--no-submit)");
		return Ok(());
	}

	let tx_hash = flow.submit(authorization, &cancel).await?;
	println!("submitted: {}", tx_hash);

	Ok(())
}
