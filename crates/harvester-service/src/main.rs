//! Main entry point for the reward harvester.
//!
//! The binary loads configuration and the wallet input files, then hands
//! the batch to the core runner. One process is one run: it walks the
//! wallet list once for the selected action and exits.

use clap::Parser;
use harvester_config::Config;
use harvester_core::{Action, Runner};
use std::path::PathBuf;
use std::sync::Arc;

mod inputs;

/// Command-line arguments for the harvester.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Path to configuration file
	#[arg(short, long, default_value = "config.toml")]
	config: PathBuf,

	/// What to do for each wallet (claim, check)
	#[arg(short, long, default_value = "claim")]
	action: Action,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "info")]
	log_level: String,
}

/// Main entry point for the harvester.
///
/// This function:
/// 1. Parses command-line arguments
/// 2. Initializes logging infrastructure
/// 3. Loads configuration and the wallet input files
/// 4. Runs the selected action across every wallet
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	// Initialize tracing with env filter
	use tracing_subscriber::{fmt, EnvFilter};

	let default_directive = args.log_level.to_string();
	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

	fmt().with_env_filter(env_filter).with_target(false).init();

	let config = Config::from_file(args.config.to_str().unwrap()).await?;
	let accounts = inputs::load_accounts(&config)?;
	tracing::info!(wallets = accounts.len(), action = %args.action, "Starting run");

	Runner::new(Arc::new(config)).run(&accounts, args.action).await;

	Ok(())
}
