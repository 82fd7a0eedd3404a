//! Horizon command line.
//!
//! Reads the user configuration, opens the JSON storage file the highlight
//! engine persists to and runs one maintenance command against it. No other
//! context is notified of the changes; running contexts pick them up on their
//! next read.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use horizon_config::Config;
use horizon_messaging::NullMessenger;
use horizon_store::{FileStorage, HighlightStore, StoreOptions};

mod cli;
mod commands;

use cli::Cli;

/// Environment variable holding a tracing filter directive.
const LOG_ENV: &str = "HORIZON_LOG";

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
	let args = Cli::parse();
	setup_tracing(args.verbose);

	let config = match &args.config {
		Some(path) => Config::load(path).with_context(|| format!("loading {}", path.display()))?,
		None => Config::load_or_default(Config::default_path()?)?,
	};
	let path = match args.storage {
		Some(path) => path,
		None => config.storage_path()?,
	};
	tracing::debug!(path = %path.display(), "cli.storage");

	let options = StoreOptions {
		pending_max_age: config.pending.max_age(),
		fallback_appearance: config.appearance.appearance(),
	};
	let store = HighlightStore::new(Arc::new(FileStorage::new(path)), Arc::new(NullMessenger)).with_options(options);

	let mut stdout = std::io::stdout().lock();
	commands::execute(&store, args.command, &mut stdout).await
}

fn setup_tracing(verbose: bool) {
	use tracing_subscriber::EnvFilter;

	let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
		if verbose {
			EnvFilter::new("horizon=debug")
		} else {
			EnvFilter::new("horizon=info")
		}
	});

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.init();
}
