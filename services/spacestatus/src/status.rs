//! Opening status and the snapshot the controller keeps of it

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The opening status of the space
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Nothing is known, either because no answer arrived yet or because the
    /// last request failed. Never reported by the server itself.
    #[default]
    Undefined,
    Open,
    Closed,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Undefined => write!(f, "Undefined"),
            Status::Open => write!(f, "Open"),
            Status::Closed => write!(f, "Closed"),
        }
    }
}

/// What the controller knows about the space at a given moment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusSnapshot {
    pub current: Status,
    pub previous: Status,
    /// Last known status right before the most recent loss of track
    pub previous_known: Status,
    /// Server-reported time the current status began
    pub since: Option<DateTime<Utc>>,
    /// Local time of the last successful fetch
    pub last_update: Option<DateTime<Utc>>,
}

impl StatusSnapshot {
    /// Shift `current` into `previous` and record `new_status`.
    ///
    /// `since` is only replaced when a value is given. `previous_known` is
    /// captured when entering `Undefined` from a known status.
    pub fn apply(
        &mut self,
        new_status: Status,
        since: Option<DateTime<Utc>>,
        updated_at: Option<DateTime<Utc>>,
    ) {
        self.previous = self.current;
        self.current = new_status;

        if self.current == Status::Undefined && self.previous != Status::Undefined {
            self.previous_known = self.previous;
        }
        if let Some(since) = since {
            self.since = Some(since);
        }
        if let Some(updated_at) = updated_at {
            self.last_update = Some(updated_at);
        }
    }

    /// Whether the latest applied status deserves a notification, ignoring
    /// the start-up and user preference conditions the controller adds.
    pub fn is_notable_transition(&self) -> bool {
        self.current != Status::Undefined
            && self.current != self.previous
            && self.current != self.previous_known
    }
}
