//! Console menu: the tray menu's actions typed on stdin

use std::str::FromStr;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;

use crate::engine::EngineHandle;

pub const HELP: &str = "Commands: [u]pdate status, toggle [n]otifications, [q]uit";

/// One menu entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Update,
    ToggleNotifications,
    Quit,
}

impl FromStr for MenuAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "u" | "update" => Ok(MenuAction::Update),
            "n" | "notifications" => Ok(MenuAction::ToggleNotifications),
            "q" | "quit" | "exit" => Ok(MenuAction::Quit),
            other => Err(format!("Unknown command '{}'", other)),
        }
    }
}

impl MenuAction {
    pub fn dispatch(self, handle: &EngineHandle) {
        match self {
            MenuAction::Update => handle.request_update(),
            MenuAction::ToggleNotifications => handle.toggle_notifications(),
            MenuAction::Quit => handle.quit(),
        }
    }
}

/// Read commands from stdin until EOF or cancellation
pub async fn read_stdin(handle: EngineHandle, cancel: CancellationToken) {
    read_commands(BufReader::new(tokio::io::stdin()), handle, cancel).await;
}

/// Read one command per line from `reader` and forward it to the engine
pub async fn read_commands<R>(reader: R, handle: EngineHandle, cancel: CancellationToken)
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    loop {
        let line = tokio::select! {
            _ = cancel.cancelled() => break,
            line = lines.next_line() => line,
        };

        match line {
            Ok(Some(line)) if line.trim().is_empty() => {}
            Ok(Some(line)) => match line.parse::<MenuAction>() {
                Ok(action) => {
                    tracing::debug!("Menu action: {:?}", action);
                    action.dispatch(&handle);
                }
                Err(e) => tracing::warn!("{}. {}", e, HELP),
            },
            Ok(None) => {
                tracing::debug!("Command input closed");
                break;
            }
            Err(e) => {
                tracing::warn!("Failed to read command input: {}", e);
                break;
            }
        }
    }
}
