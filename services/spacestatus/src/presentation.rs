//! Presentation of the current status: icon, tooltip and on-screen messages

use std::io::Write;
use std::sync::Mutex;

use crate::status::Status;

/// Which icon to show for a status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconVariant {
    Open,
    Closed,
    Undefined,
}

impl From<Status> for IconVariant {
    fn from(status: Status) -> Self {
        match status {
            Status::Open => IconVariant::Open,
            Status::Closed => IconVariant::Closed,
            Status::Undefined => IconVariant::Undefined,
        }
    }
}

/// Renders what the controller knows. Holds no business logic.
pub trait Presentation: Send + Sync + std::fmt::Debug {
    fn set_icon(&self, variant: IconVariant);

    fn set_tooltip(&self, text: &str);

    /// Mark a request as running; the manual update action is unavailable meanwhile
    fn set_updating(&self, updating: bool);

    /// Simple on-screen message, used when no rich notification could be shown
    fn show_message(&self, summary: &str, body: &str);

    fn supports_messages(&self) -> bool {
        true
    }
}

#[derive(Debug, Default)]
struct ConsoleState {
    icon: Option<IconVariant>,
    tooltip: String,
    updating: bool,
}

/// Prints status changes and fallback messages to stdout
#[derive(Debug, Default)]
pub struct ConsolePresentation {
    state: Mutex<ConsoleState>,
}

impl ConsolePresentation {
    pub fn new() -> Self {
        Self::default()
    }

    fn print(&self, text: &str) {
        let mut stdout = std::io::stdout().lock();
        if let Err(e) = writeln!(stdout, "{}", text) {
            tracing::debug!("Failed to write to stdout: {}", e);
        }
    }
}

impl Presentation for ConsolePresentation {
    fn set_icon(&self, variant: IconVariant) {
        let Ok(mut state) = self.state.lock() else {
            return;
        };
        if state.icon != Some(variant) {
            tracing::debug!("Icon changed to {:?}", variant);
            state.icon = Some(variant);
        }
    }

    fn set_tooltip(&self, text: &str) {
        let changed = match self.state.lock() {
            Ok(mut state) if state.tooltip != text => {
                state.tooltip = text.to_string();
                true
            }
            _ => false,
        };
        if changed {
            self.print(text);
        }
    }

    fn set_updating(&self, updating: bool) {
        if let Ok(mut state) = self.state.lock() {
            state.updating = updating;
        }
        if updating {
            tracing::debug!("Updating…");
        }
    }

    fn show_message(&self, summary: &str, body: &str) {
        self.print(&format!("*** {}: {}", summary, body));
    }
}
