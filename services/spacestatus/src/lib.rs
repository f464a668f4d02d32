//! Space status indicator
//!
//! Polls a hackerspace status endpoint, shows whether the space is open or
//! closed, and notifies when that changes.

pub mod config;
pub mod controller;
pub mod engine;
pub mod error;
pub mod io;
pub mod menu;
#[cfg(target_os = "linux")]
pub mod network;
pub mod notifier;
pub mod parser;
pub mod presentation;
pub mod status;

pub use config::{load_config, Config, WireFormat};
pub use error::{Result, SpaceStatusError};
pub use status::{Status, StatusSnapshot};

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::controller::StatusController;
use crate::engine::Engine;
use crate::io::{HttpClient, ReqwestHttpClient};
use crate::notifier::{DesktopNotifier, Notifier};
use crate::presentation::{ConsolePresentation, Presentation};

/// Run the indicator with the given configuration until quit or Ctrl-C
pub async fn run(config: Config) -> Result<()> {
    config.validate()?;
    let http: Arc<dyn HttpClient> = Arc::new(ReqwestHttpClient::with_timeout(config.timeout)?);
    let presentation: Arc<dyn Presentation> = Arc::new(ConsolePresentation::new());
    let notifier: Arc<dyn Notifier> = Arc::new(DesktopNotifier::new(&config.notifications));
    let cancel = CancellationToken::new();

    let controller = StatusController::new(&config, presentation, notifier);
    let engine = Engine::new(&config, controller, http, cancel.clone());
    let handle = engine.handle();

    // Setup shutdown handler
    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Shutdown signal received");
                cancel_for_signal.cancel();
            }
            Err(e) => tracing::warn!("Failed to listen for ctrl-c: {}", e),
        }
    });

    tracing::info!("{}", menu::HELP);
    tokio::spawn(menu::read_stdin(handle.clone(), cancel.clone()));

    #[cfg(target_os = "linux")]
    {
        if config.watch_network {
            let cancel_for_network = cancel.clone();
            let handle_for_network = handle.clone();
            tokio::spawn(async move {
                if let Err(e) = network::watch(handle_for_network, cancel_for_network).await {
                    tracing::warn!("Not watching network state: {}", e);
                }
            });
        }
    }

    tracing::info!(
        "Space status indicator started (notifications {})",
        if config.notifications.enabled {
            "on"
        } else {
            "off"
        }
    );

    let controller = engine.run().await;

    tracing::info!(
        "Space status indicator stopped, last status {}",
        controller.status()
    );
    Ok(())
}
