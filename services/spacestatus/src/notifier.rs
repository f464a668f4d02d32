//! Rich desktop notifications

use std::time::Duration;

use async_trait::async_trait;

use crate::config::{IconConfig, NotificationConfig};
use crate::presentation::IconVariant;

/// Trait for showing a rich notification.
///
/// `Ok` means the notification was delivered. Any error means it was not, and
/// the caller may fall back to a simpler channel.
#[async_trait]
pub trait Notifier: Send + Sync + std::fmt::Debug {
    async fn show(&self, summary: &str, body: &str, icon: IconVariant) -> crate::Result<()>;
}

/// Freedesktop (or platform native) notifications through notify-rust
#[derive(Debug, Clone)]
pub struct DesktopNotifier {
    app_name: String,
    timeout: Duration,
    icons: IconConfig,
}

impl DesktopNotifier {
    pub fn new(config: &NotificationConfig) -> Self {
        tracing::debug!(
            "Created DesktopNotifier for '{}' with timeout {:?}",
            config.app_name,
            config.timeout
        );
        Self {
            app_name: config.app_name.clone(),
            timeout: config.timeout,
            icons: config.icons.clone(),
        }
    }

    fn build(&self, summary: &str, body: &str, icon: IconVariant) -> notify_rust::Notification {
        let millis = u32::try_from(self.timeout.as_millis()).unwrap_or(u32::MAX);
        let mut notification = notify_rust::Notification::new();
        notification
            .appname(&self.app_name)
            .summary(summary)
            .body(body)
            .icon(self.icons.name_for(icon))
            .timeout(notify_rust::Timeout::Milliseconds(millis));
        notification
    }
}

#[async_trait]
impl Notifier for DesktopNotifier {
    async fn show(&self, summary: &str, body: &str, icon: IconVariant) -> crate::Result<()> {
        let notification = self.build(summary, body, icon);
        tracing::debug!("Sending desktop notification: '{}'", summary);

        tokio::task::spawn_blocking(move || notification.show().map(|_| ()))
            .await
            .map_err(|e| {
                crate::SpaceStatusError::Notifier(format!("Notification task failed: {}", e))
            })?
            .map_err(|e| crate::SpaceStatusError::Notifier(e.to_string()))
    }
}
