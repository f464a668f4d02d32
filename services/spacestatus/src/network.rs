//! NetworkManager connectivity watcher
//!
//! Requests a status update whenever NetworkManager reports that the machine
//! reached global connectivity, so the indicator does not sit on a stale
//! "undefined" until the next poll after a suspend or a Wi-Fi roam.

use futures_util::StreamExt;
use tokio_util::sync::CancellationToken;

use crate::engine::EngineHandle;

/// `NM_STATE_CONNECTED_GLOBAL`
const NM_STATE_CONNECTED_GLOBAL: u32 = 70;

#[zbus::proxy(
    interface = "org.freedesktop.NetworkManager",
    default_service = "org.freedesktop.NetworkManager",
    default_path = "/org/freedesktop/NetworkManager"
)]
trait NetworkManager {
    #[zbus(signal)]
    fn state_changed(&self, state: u32) -> zbus::Result<()>;
}

/// Human readable name of a NetworkManager state
pub fn describe_state(state: u32) -> &'static str {
    match state {
        0 => "unknown",
        10 => "asleep",
        20 => "disconnected",
        30 => "disconnecting",
        40 => "connecting",
        50 => "connected (local)",
        60 => "connected (site)",
        NM_STATE_CONNECTED_GLOBAL => "connected (global)",
        _ => "invalid state",
    }
}

pub fn is_connected(state: u32) -> bool {
    state == NM_STATE_CONNECTED_GLOBAL
}

fn network_error(e: zbus::Error) -> crate::SpaceStatusError {
    crate::SpaceStatusError::Network(e.to_string())
}

/// Listen for NetworkManager state changes until cancelled
pub async fn watch(handle: EngineHandle, cancel: CancellationToken) -> crate::Result<()> {
    let connection = zbus::Connection::system().await.map_err(network_error)?;
    let proxy = NetworkManagerProxy::new(&connection)
        .await
        .map_err(network_error)?;
    let mut changes = proxy.receive_state_changed().await.map_err(network_error)?;

    tracing::debug!("Watching NetworkManager state changes");

    loop {
        let signal = tokio::select! {
            _ = cancel.cancelled() => break,
            signal = changes.next() => signal,
        };

        let Some(signal) = signal else {
            tracing::debug!("NetworkManager signal stream ended");
            break;
        };

        match signal.args() {
            Ok(args) => {
                let state = *args.state();
                tracing::debug!("Network state changed to {}", describe_state(state));
                if is_connected(state) {
                    handle.request_update();
                }
            }
            Err(e) => tracing::debug!("Malformed StateChanged signal: {}", e),
        }
    }

    Ok(())
}
