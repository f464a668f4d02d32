//! Engine: the single event loop owning the status controller
//!
//! Timer ticks, menu actions and network events all arrive here. Fetches and
//! their timeout watchdogs run as separate tasks and report back through the
//! same channel, so the controller is only ever touched from this loop.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::controller::StatusController;
use crate::io::{fetch_payload, HttpClient};

/// Events processed by the engine loop
#[derive(Debug)]
pub enum Event {
    /// Manual "update status" action or network coming back
    UpdateRequested,
    ToggleNotifications,
    SetNotifications(bool),
    Quit,
    FetchFinished {
        epoch: u64,
        result: crate::Result<Vec<u8>>,
    },
    FetchTimedOut {
        epoch: u64,
    },
}

/// Cloneable sender for feeding events into a running engine
#[derive(Debug, Clone)]
pub struct EngineHandle {
    tx: mpsc::UnboundedSender<Event>,
}

impl EngineHandle {
    pub fn request_update(&self) {
        self.send(Event::UpdateRequested);
    }

    pub fn toggle_notifications(&self) {
        self.send(Event::ToggleNotifications);
    }

    pub fn set_notifications(&self, enabled: bool) {
        self.send(Event::SetNotifications(enabled));
    }

    pub fn quit(&self) {
        self.send(Event::Quit);
    }

    fn send(&self, event: Event) {
        if self.tx.send(event).is_err() {
            tracing::debug!("Engine is no longer running, event dropped");
        }
    }
}

/// The engine polls the endpoint and routes completions to the controller
pub struct Engine {
    controller: StatusController,
    http: Arc<dyn HttpClient>,
    url: String,
    poll_interval: Duration,
    timeout: Duration,
    tx: mpsc::UnboundedSender<Event>,
    rx: mpsc::UnboundedReceiver<Event>,
    cancel: CancellationToken,
}

impl Engine {
    pub fn new(
        config: &Config,
        controller: StatusController,
        http: Arc<dyn HttpClient>,
        cancel: CancellationToken,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            controller,
            http,
            url: config.url.clone(),
            poll_interval: config.poll_interval,
            timeout: config.timeout,
            tx,
            rx,
            cancel,
        }
    }

    pub fn handle(&self) -> EngineHandle {
        EngineHandle {
            tx: self.tx.clone(),
        }
    }

    pub fn controller(&self) -> &StatusController {
        &self.controller
    }

    /// Poll until the cancellation token is triggered. The first poll happens
    /// immediately. Returns the controller for inspection.
    pub async fn run(mut self) -> StatusController {
        let mut ticker = tokio::time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(
            "Polling {} every {:?} (timeout {:?})",
            self.url,
            self.poll_interval,
            self.timeout
        );

        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    tracing::debug!("Engine loop cancelled");
                    break;
                }
                _ = ticker.tick() => self.request_update(),
                Some(event) = self.rx.recv() => self.handle_event(event).await,
            }
        }

        self.controller
    }

    async fn handle_event(&mut self, event: Event) {
        match event {
            Event::UpdateRequested => {
                if self.controller.is_updating() {
                    tracing::debug!("Update already in progress, ignoring request");
                } else {
                    self.request_update();
                }
            }
            Event::ToggleNotifications => {
                let enabled = !self.controller.notifications_enabled();
                self.set_notifications(enabled);
            }
            Event::SetNotifications(enabled) => self.set_notifications(enabled),
            Event::Quit => {
                tracing::info!("Quit requested");
                self.cancel.cancel();
            }
            Event::FetchFinished { epoch, result } => match result {
                Ok(payload) => {
                    self.controller.on_fetch_success(epoch, &payload).await;
                }
                Err(e) => {
                    self.controller.on_fetch_failure(epoch, &e).await;
                }
            },
            Event::FetchTimedOut { epoch } => {
                self.controller.on_fetch_timeout(epoch).await;
            }
        }
    }

    fn set_notifications(&mut self, enabled: bool) {
        tracing::info!(
            "Notifications {}",
            if enabled { "enabled" } else { "disabled" }
        );
        self.controller.set_notifications_enabled(enabled);
    }

    /// Start a request: spawn the fetch and arm its watchdog
    fn request_update(&mut self) {
        let ticket = self.controller.begin_request();
        let epoch = ticket.epoch;

        let http = Arc::clone(&self.http);
        let url = self.url.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = fetch_payload(http.as_ref(), &url).await;
            let _ = tx.send(Event::FetchFinished { epoch, result });
        });

        let tx = self.tx.clone();
        let timeout = self.timeout;
        tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(timeout) => {
                    let _ = tx.send(Event::FetchTimedOut { epoch });
                }
                _ = ticket.watchdog.cancelled() => {}
            }
        });
    }
}
