//! BDD test world for the space status indicator

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use cucumber::World;
use spacestatus::controller::{RequestTicket, StatusController};
use spacestatus::notifier::Notifier;
use spacestatus::parser::ParsedStatus;
use spacestatus::presentation::{IconVariant, Presentation};
use spacestatus::Config;

/// A presentation that records what it was asked to show
#[derive(Debug, Default)]
pub struct RecordingPresentation {
    pub tooltips: Mutex<Vec<String>>,
    pub messages: Mutex<Vec<(String, String)>>,
}

impl Presentation for RecordingPresentation {
    fn set_icon(&self, _variant: IconVariant) {}

    fn set_tooltip(&self, text: &str) {
        self.tooltips.lock().unwrap().push(text.to_string());
    }

    fn set_updating(&self, _updating: bool) {}

    fn show_message(&self, summary: &str, body: &str) {
        self.messages
            .lock()
            .unwrap()
            .push((summary.to_string(), body.to_string()));
    }
}

/// A notifier that records attempts and delivers or refuses
#[derive(Debug)]
pub struct RecordingNotifier {
    pub deliver: bool,
    pub attempts: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn new(deliver: bool) -> Self {
        Self {
            deliver,
            attempts: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn show(
        &self,
        summary: &str,
        _body: &str,
        _icon: IconVariant,
    ) -> spacestatus::Result<()> {
        self.attempts.lock().unwrap().push(summary.to_string());
        if self.deliver {
            Ok(())
        } else {
            Err(spacestatus::SpaceStatusError::Notifier(
                "no notification daemon".to_string(),
            ))
        }
    }
}

#[derive(Debug, Default, World)]
pub struct SpaceStatusWorld {
    // Parser testing
    pub parsed: Option<ParsedStatus>,

    // Controller testing
    pub controller: Option<StatusController>,
    pub presentation: Option<Arc<RecordingPresentation>>,
    pub notifier: Option<Arc<RecordingNotifier>>,
    pub ticket: Option<RequestTicket>,
    pub first_ticket: Option<RequestTicket>,
    pub last_resolution: Option<bool>,
}

impl SpaceStatusWorld {
    pub fn build_controller(&mut self, config: &Config, deliver: bool) {
        let presentation = Arc::new(RecordingPresentation::default());
        let notifier = Arc::new(RecordingNotifier::new(deliver));
        self.controller = Some(StatusController::new(
            config,
            Arc::clone(&presentation) as Arc<dyn Presentation>,
            Arc::clone(&notifier) as Arc<dyn Notifier>,
        ));
        self.presentation = Some(presentation);
        self.notifier = Some(notifier);
    }

    pub fn controller(&mut self) -> &mut StatusController {
        self.controller.as_mut().expect("controller not set")
    }

    pub fn notification_attempts(&self) -> usize {
        self.notifier
            .as_ref()
            .expect("notifier not set")
            .attempts
            .lock()
            .unwrap()
            .len()
    }

    pub fn fallback_messages(&self) -> usize {
        self.presentation
            .as_ref()
            .expect("presentation not set")
            .messages
            .lock()
            .unwrap()
            .len()
    }
}
