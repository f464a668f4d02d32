//! Space status CLI
//!
//! Command-line entry point for the hackerspace status indicator.

use std::path::PathBuf;

use clap::Parser;
use spacestatus::{load_config, Config};
use tracing::Level;

#[derive(Parser)]
#[command(name = "spacestatus")]
#[command(about = "Shows whether the hackerspace is open and notifies when that changes")]
#[command(version)]
struct Args {
    /// Do not show notifications (can be re-enabled from the menu)
    #[arg(short, long)]
    silent: bool,

    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: Level,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(
        "Parsed command line arguments: silent={}, config={:?}, log_level={:?}",
        args.silent,
        args.config,
        args.log_level
    );

    let mut config = if let Some(config_path) = &args.config {
        tracing::debug!("Loading configuration from {:?}", config_path);
        load_config(config_path)?
    } else {
        tracing::debug!("Using default configuration");
        Config::default()
    };

    if args.silent {
        config.notifications.enabled = false;
    }

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(spacestatus::run(config))?;
    // a pending stdin read cannot be cancelled, don't wait for it
    runtime.shutdown_background();

    Ok(())
}
