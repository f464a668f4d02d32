//! Configuration types for the space status indicator

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::presentation::IconVariant;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Status endpoint to poll
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default)]
    pub format: WireFormat,
    #[serde(default = "default_poll_interval", with = "humantime_serde")]
    pub poll_interval: Duration,
    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,
    /// Name used in notification bodies, e.g. "The Stratumsphere has just opened!"
    #[serde(default = "default_space_name")]
    pub space_name: String,
    #[serde(default)]
    pub notifications: NotificationConfig,
    /// Request an update when NetworkManager reports connectivity (Linux only)
    #[serde(default = "default_true")]
    pub watch_network: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: default_url(),
            format: WireFormat::default(),
            poll_interval: default_poll_interval(),
            timeout: default_timeout(),
            space_name: default_space_name(),
            notifications: NotificationConfig::default(),
            watch_network: true,
        }
    }
}

/// Payload format served by the status endpoint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WireFormat {
    /// `IsOpen: true` / `Since: <ISO-8601>` lines
    #[default]
    Line,
    /// JSON object with `open` and `state.lastchange`
    Structured,
}

/// Desktop notification settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_app_name")]
    pub app_name: String,
    #[serde(default = "default_notification_timeout", with = "humantime_serde")]
    pub timeout: Duration,
    #[serde(default)]
    pub icons: IconConfig,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            app_name: default_app_name(),
            timeout: default_notification_timeout(),
            icons: IconConfig::default(),
        }
    }
}

/// Freedesktop icon names shown alongside notifications
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IconConfig {
    #[serde(default = "default_open_icon")]
    pub open: String,
    #[serde(default = "default_closed_icon")]
    pub closed: String,
    #[serde(default = "default_undefined_icon")]
    pub undefined: String,
}

impl IconConfig {
    pub fn name_for(&self, variant: IconVariant) -> &str {
        match variant {
            IconVariant::Open => &self.open,
            IconVariant::Closed => &self.closed,
            IconVariant::Undefined => &self.undefined,
        }
    }
}

impl Default for IconConfig {
    fn default() -> Self {
        Self {
            open: default_open_icon(),
            closed: default_closed_icon(),
            undefined: default_undefined_icon(),
        }
    }
}

fn default_url() -> String {
    "http://rohieb.name/stratum0/status.txt".to_string()
}

fn default_poll_interval() -> Duration {
    Duration::from_secs(5 * 60)
}

fn default_timeout() -> Duration {
    Duration::from_secs(60)
}

fn default_space_name() -> String {
    "Stratumsphere".to_string()
}

fn default_app_name() -> String {
    "spacestatus".to_string()
}

fn default_notification_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_open_icon() -> String {
    "emblem-default".to_string()
}

fn default_closed_icon() -> String {
    "emblem-unreadable".to_string()
}

fn default_undefined_icon() -> String {
    "dialog-question".to_string()
}

fn default_true() -> bool {
    true
}

/// Load configuration from a JSON file
pub fn load_config(path: &Path) -> crate::Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        crate::SpaceStatusError::Config(format!("Failed to read config file {:?}: {}", path, e))
    })?;
    let config: Config = serde_json::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

impl Config {
    /// Check the polling durations.
    ///
    /// Every tick supersedes the outstanding request, so a timeout that is not
    /// shorter than the poll interval could keep any request from resolving.
    pub fn validate(&self) -> crate::Result<()> {
        if self.timeout.is_zero() || self.poll_interval.is_zero() {
            return Err(crate::SpaceStatusError::Config(
                "poll_interval and timeout must be greater than zero".to_string(),
            ));
        }
        if self.timeout >= self.poll_interval {
            return Err(crate::SpaceStatusError::Config(format!(
                "timeout ({:?}) must be shorter than poll_interval ({:?})",
                self.timeout, self.poll_interval
            )));
        }
        Ok(())
    }
}
