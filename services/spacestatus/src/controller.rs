//! The status state machine: applies fetch results, decides about
//! notifications and drives the presentation.
//!
//! Every request gets an epoch. A request is resolved by whichever of its
//! completions (success, failure, timeout) reaches the controller first;
//! everything arriving later for that epoch, or for an older one, is dropped.

use std::sync::Arc;

use chrono::{DateTime, Local, Utc};
use tokio_util::sync::CancellationToken;

use crate::config::{Config, WireFormat};
use crate::notifier::Notifier;
use crate::parser;
use crate::presentation::{IconVariant, Presentation};
use crate::status::{Status, StatusSnapshot};

/// Handle for one outstanding request
#[derive(Debug, Clone)]
pub struct RequestTicket {
    pub epoch: u64,
    /// Cancelled as soon as the request is resolved or superseded
    pub watchdog: CancellationToken,
}

/// What `refresh` did about notifying the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationOutcome {
    /// Nothing worth notifying, or notifications are off
    Skipped,
    /// The rich notification was delivered
    Delivered,
    /// The rich notification failed and the on-screen message was shown
    FellBack,
    /// Neither channel was available
    Dropped,
}

pub struct StatusController {
    format: WireFormat,
    space_name: String,
    snapshot: StatusSnapshot,
    epoch: u64,
    outstanding: Option<RequestTicket>,
    notifications_enabled: bool,
    has_completed_first_update: bool,
    presentation: Arc<dyn Presentation>,
    notifier: Arc<dyn Notifier>,
}

impl std::fmt::Debug for StatusController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusController")
            .field("snapshot", &self.snapshot)
            .field("epoch", &self.epoch)
            .field("notifications_enabled", &self.notifications_enabled)
            .finish()
    }
}

impl StatusController {
    pub fn new(
        config: &Config,
        presentation: Arc<dyn Presentation>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        presentation.set_icon(IconVariant::Undefined);
        Self {
            format: config.format,
            space_name: config.space_name.clone(),
            snapshot: StatusSnapshot::default(),
            epoch: 0,
            outstanding: None,
            notifications_enabled: config.notifications.enabled,
            has_completed_first_update: false,
            presentation,
            notifier,
        }
    }

    pub fn snapshot(&self) -> &StatusSnapshot {
        &self.snapshot
    }

    pub fn status(&self) -> Status {
        self.snapshot.current
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Whether a request is waiting for its success, failure or timeout
    pub fn is_updating(&self) -> bool {
        self.outstanding.is_some()
    }

    pub fn notifications_enabled(&self) -> bool {
        self.notifications_enabled
    }

    pub fn set_notifications_enabled(&mut self, enabled: bool) {
        self.notifications_enabled = enabled;
    }

    /// Start a new request epoch. Any earlier outstanding epoch becomes stale.
    pub fn begin_request(&mut self) -> RequestTicket {
        if let Some(previous) = self.outstanding.take() {
            tracing::debug!("Request {} superseded before it resolved", previous.epoch);
            previous.watchdog.cancel();
        }

        self.epoch += 1;
        let ticket = RequestTicket {
            epoch: self.epoch,
            watchdog: CancellationToken::new(),
        };
        self.outstanding = Some(ticket.clone());
        self.presentation.set_updating(true);

        tracing::debug!("Updating status (request {})", ticket.epoch);
        ticket
    }

    /// First completion for the outstanding epoch wins
    fn resolve(&mut self, epoch: u64) -> bool {
        match &self.outstanding {
            Some(ticket) if ticket.epoch == epoch => {
                ticket.watchdog.cancel();
                self.outstanding = None;
                true
            }
            _ => {
                tracing::debug!(
                    "Dropping stale completion for request {} (current {})",
                    epoch,
                    self.epoch
                );
                false
            }
        }
    }

    /// Handle a payload for `epoch`. Returns false if the completion was stale.
    pub async fn on_fetch_success(&mut self, epoch: u64, payload: &[u8]) -> bool {
        if !self.resolve(epoch) {
            return false;
        }
        let parsed = parser::parse(self.format, payload);
        tracing::debug!("Request {} parsed as {:?}", epoch, parsed);
        self.apply_status(parsed.status, parsed.since, true);
        self.refresh().await;
        true
    }

    /// Handle a transport failure for `epoch`. Returns false if the completion was stale.
    pub async fn on_fetch_failure(&mut self, epoch: u64, error: &crate::SpaceStatusError) -> bool {
        if !self.resolve(epoch) {
            return false;
        }
        tracing::warn!("Request {} failed: {}", epoch, error);
        self.apply_status(Status::Undefined, None, false);
        self.refresh().await;
        true
    }

    /// Handle the watchdog firing for `epoch`. Returns false if the request
    /// already resolved or was superseded.
    pub async fn on_fetch_timeout(&mut self, epoch: u64) -> bool {
        if !self.resolve(epoch) {
            return false;
        }
        tracing::warn!("Request {} timed out", epoch);
        self.apply_status(Status::Undefined, None, false);
        self.refresh().await;
        true
    }

    /// Record a new status. `from_response` marks a real answer from the endpoint.
    pub fn apply_status(
        &mut self,
        status: Status,
        since: Option<DateTime<Utc>>,
        from_response: bool,
    ) {
        let updated_at = from_response.then(Utc::now);
        self.snapshot.apply(status, since, updated_at);

        if self.snapshot.current != self.snapshot.previous {
            tracing::info!(
                "Status changed: {} -> {}",
                self.snapshot.previous,
                self.snapshot.current
            );
        }
    }

    /// Whether the latest applied status should be announced
    pub fn is_notification_due(&self) -> bool {
        self.notifications_enabled
            && self.has_completed_first_update
            && self.snapshot.is_notable_transition()
    }

    /// Push the current status to the presentation and notify if due
    pub async fn refresh(&mut self) -> NotificationOutcome {
        let status = self.snapshot.current;
        let icon = IconVariant::from(status);

        self.presentation.set_updating(false);
        self.presentation.set_icon(icon);
        self.presentation.set_tooltip(&self.tooltip_text());

        let outcome = if self.is_notification_due() {
            self.notify(status, icon).await
        } else {
            NotificationOutcome::Skipped
        };

        self.has_completed_first_update = true;
        outcome
    }

    async fn notify(&self, status: Status, icon: IconVariant) -> NotificationOutcome {
        let summary = status_text(status);
        let body = self.announcement(status);

        match self.notifier.show(summary, &body, icon).await {
            Ok(()) => {
                tracing::debug!("Notification delivered: {}", summary);
                NotificationOutcome::Delivered
            }
            Err(e) => {
                tracing::debug!("Rich notification not delivered: {}", e);
                if self.presentation.supports_messages() {
                    self.presentation.show_message(summary, &body);
                    NotificationOutcome::FellBack
                } else {
                    tracing::warn!("No way to show a notification on this system");
                    NotificationOutcome::Dropped
                }
            }
        }
    }

    fn announcement(&self, status: Status) -> String {
        match status {
            Status::Open => format!("The {} has just opened!", self.space_name),
            Status::Closed => format!("The {} has just closed.", self.space_name),
            Status::Undefined => String::new(),
        }
    }

    pub fn tooltip_text(&self) -> String {
        format!(
            "{}\nStatus since: {}\nLast update: {}",
            status_text(self.snapshot.current),
            format_time(self.snapshot.since),
            format_time(self.snapshot.last_update)
        )
    }
}

pub fn status_text(status: Status) -> &'static str {
    match status {
        Status::Open => "Space is open",
        Status::Closed => "Space is closed",
        Status::Undefined => "Could not determine opening status",
    }
}

fn format_time(time: Option<DateTime<Utc>>) -> String {
    match time {
        Some(time) => time
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M")
            .to_string(),
        None => "unknown".to_string(),
    }
}
