use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::resolver::EventWindow;

/// Outcome of feeding one playback sample (or a forced hide) to the resolver.
///
/// The display layer reacts to `Activated`/`Deactivated`; `Unchanged` means
/// whatever is on screen stays as it is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Transition {
    Unchanged,
    /// `event` became active. `replaced` is the event whose display it
    /// supersedes, including one cleared by a seek during the same tick.
    Activated {
        event: EventWindow,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        replaced: Option<EventWindow>,
    },
    /// No event is active any more; `event` is the one that was.
    Deactivated { event: EventWindow },
}

impl Transition {
    pub fn is_unchanged(&self) -> bool {
        matches!(self, Self::Unchanged)
    }

    /// The event now on display after this transition, if it introduced one.
    pub fn activated(&self) -> Option<&EventWindow> {
        match self {
            Self::Activated { event, .. } => Some(event),
            _ => None,
        }
    }
}

/// A transition stamped with where and when it happened, for logs and replays.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub playback_time: f64,
    pub transition: Transition,
    /// Set when the transition came from a forced hide rather than a tick.
    #[serde(default)]
    pub forced: bool,
    pub at: DateTime<Utc>,
}

impl TransitionRecord {
    pub fn new(playback_time: f64, transition: Transition, forced: bool) -> Self {
        Self {
            playback_time,
            transition,
            forced,
            at: Utc::now(),
        }
    }
}
