//! Presentation boundary.
//!
//! The resolver only decides; whatever draws the overlay implements
//! [`DisplaySink`] and is fed through [`dispatch`].

use crate::events::Transition;
use crate::resolver::{EventWindow, TemporalEventResolver};

/// Receiver of show/hide decisions.
pub trait DisplaySink {
    fn activate(&mut self, event: &EventWindow);
    fn deactivate(&mut self, event: &EventWindow);
}

/// Forward a transition to a sink. A replacing activation hides the old
/// event before showing the new one.
pub fn dispatch<S: DisplaySink + ?Sized>(transition: &Transition, sink: &mut S) {
    match transition {
        Transition::Unchanged => {}
        Transition::Activated { event, replaced } => {
            if let Some(old) = replaced {
                sink.deactivate(old);
            }
            sink.activate(event);
        }
        Transition::Deactivated { event } => sink.deactivate(event),
    }
}

impl TemporalEventResolver {
    /// `tick` followed by [`dispatch`].
    pub fn tick_into<S: DisplaySink + ?Sized>(&mut self, current_time: f64, sink: &mut S) -> Transition {
        let transition = self.tick(current_time);
        dispatch(&transition, sink);
        transition
    }
}

/// Bounds how long one activation stays on screen.
///
/// Runs on whatever clock the caller passes in; it never touches the
/// resolver itself. When [`AutoExpiry::is_due`] reports true the caller
/// hides the event with [`TemporalEventResolver::deactivate`].
#[derive(Debug, Clone)]
pub struct AutoExpiry {
    display_for_secs: f64,
    shown_at: Option<f64>,
}

impl AutoExpiry {
    pub fn new(display_for_secs: f64) -> Self {
        Self {
            display_for_secs,
            shown_at: None,
        }
    }

    /// Arm on activation, disarm on deactivation.
    pub fn observe(&mut self, transition: &Transition, now: f64) {
        match transition {
            Transition::Activated { .. } => self.shown_at = Some(now),
            Transition::Deactivated { .. } => self.shown_at = None,
            Transition::Unchanged => {}
        }
    }

    pub fn is_due(&self, now: f64) -> bool {
        self.shown_at
            .is_some_and(|at| now - at >= self.display_for_secs)
    }

    pub fn is_armed(&self) -> bool {
        self.shown_at.is_some()
    }
}

/// Format seconds as `m:ss`.
pub fn format_timestamp(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{}:{:02}", total / 60, total % 60)
}
