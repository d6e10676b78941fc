//! Temporal event resolver.
//!
//! A single-writer state machine driven by playback time. It does not own a
//! clock - the caller feeds it samples through `tick()` on every observed
//! position update, and reacts to the returned [`Transition`].
//!
//! ## Per-tick policy
//!
//! ```text
//! seek? -> clear seen + active
//!       -> pick most specific covering window
//!       -> same as active / already seen => Unchanged
//!       -> otherwise Activated (or Deactivated when nothing covers t)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut resolver = TemporalEventResolver::new(ResolverConfig::default());
//! resolver.load(events);
//! // On every position update:
//! match resolver.tick(video.current_time()) { ... }
//! ```

use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::window::{Event, EventWindow};
use crate::config::ResolverConfig;
use crate::error::ValidationError;
use crate::events::Transition;

/// An input event rejected at load time.
#[derive(Debug, Clone, PartialEq)]
pub struct DroppedEvent {
    /// Position in the caller's list.
    pub index: usize,
    pub identity: Option<String>,
    pub error: ValidationError,
}

/// Summary of a `load` call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    /// Events now resolvable.
    pub accepted: usize,
    /// Valid events skipped because their category is disabled.
    pub filtered: usize,
    pub dropped: Vec<DroppedEvent>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.dropped.is_empty()
    }
}

/// Read-only view of the resolver's mutable state.
#[derive(Debug, Clone, Serialize)]
pub struct ResolverSnapshot {
    pub loaded: bool,
    pub event_count: usize,
    pub active: Option<String>,
    pub seen: usize,
    pub last_tick: Option<f64>,
}

/// Decides which single event is active at a playback position.
#[derive(Debug, Clone)]
pub struct TemporalEventResolver {
    config: ResolverConfig,
    events: Vec<EventWindow>,
    loaded: bool,
    /// Index into `events`.
    active: Option<usize>,
    /// Identities shown since the last load or seek.
    seen: HashSet<String>,
    last_tick: Option<f64>,
}

impl Default for TemporalEventResolver {
    fn default() -> Self {
        Self::new(ResolverConfig::default())
    }
}

impl TemporalEventResolver {
    pub fn new(config: ResolverConfig) -> Self {
        Self {
            config,
            events: Vec::new(),
            loaded: false,
            active: None,
            seen: HashSet::new(),
            last_tick: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Normalized windows in accepted input order.
    pub fn events(&self) -> &[EventWindow] {
        &self.events
    }

    pub fn active(&self) -> Option<&EventWindow> {
        self.active.and_then(|i| self.events.get(i))
    }

    pub fn has_seen(&self, identity: &str) -> bool {
        self.seen.contains(identity)
    }

    pub fn last_tick(&self) -> Option<f64> {
        self.last_tick
    }

    pub fn snapshot(&self) -> ResolverSnapshot {
        ResolverSnapshot {
            loaded: self.loaded,
            event_count: self.events.len(),
            active: self.active().map(|e| e.identity.clone()),
            seen: self.seen.len(),
            last_tick: self.last_tick,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Replace the event set and reset all resolution state.
    ///
    /// Invalid events are dropped and reported; the rest load normally.
    pub fn load(&mut self, events: Vec<Event>) -> LoadReport {
        let mut report = LoadReport::default();
        let mut windows = Vec::with_capacity(events.len());

        for (index, event) in events.into_iter().enumerate() {
            if let Err(error) = event.validate() {
                warn!(index, identity = %event.identity, %error, "dropping invalid event");
                report.dropped.push(DroppedEvent {
                    index,
                    identity: Some(event.identity),
                    error,
                });
                continue;
            }
            if !self.config.is_enabled(event.category) {
                debug!(index, category = %event.category, "skipping disabled category");
                report.filtered += 1;
                continue;
            }
            let order = windows.len();
            windows.push(EventWindow::normalize(event, self.config.min_window_secs, order));
        }

        report.accepted = windows.len();
        self.events = windows;
        self.loaded = true;
        self.reset_state();

        info!(
            accepted = report.accepted,
            filtered = report.filtered,
            dropped = report.dropped.len(),
            "loaded event set"
        );
        report
    }

    /// Feed one playback sample.
    pub fn tick(&mut self, current_time: f64) -> Transition {
        if !self.loaded {
            return Transition::Unchanged;
        }
        if !current_time.is_finite() || current_time < 0.0 {
            warn!(current_time, "ignoring invalid playback time");
            return Transition::Unchanged;
        }

        // A jump means the user navigated; stale memory must not suppress
        // re-display, and a stale badge must not linger.
        let mut cleared = None;
        if let Some(last) = self.last_tick {
            if (current_time - last).abs() > self.config.seek_threshold_secs {
                debug!(from = last, to = current_time, "seek detected");
                self.seen.clear();
                cleared = self.active.take();
            }
        }
        self.last_tick = Some(current_time);

        let outcome = match self.select(current_time) {
            Some(chosen) => self.try_activate(chosen, cleared),
            None => self.active.take().map(|prev| Transition::Deactivated {
                event: self.events[prev].clone(),
            }),
        };

        let transition = outcome.unwrap_or_else(|| match cleared {
            Some(prev) => Transition::Deactivated {
                event: self.events[prev].clone(),
            },
            None => Transition::Unchanged,
        });

        if !transition.is_unchanged() {
            debug!(current_time, ?transition, "transition");
        }
        transition
    }

    /// Forced external hide, e.g. from a display timeout.
    ///
    /// Clears the active event without touching the seen set, so the same
    /// event is not re-shown while playback stays in its window.
    pub fn deactivate(&mut self) -> Transition {
        match self.active.take() {
            Some(prev) => Transition::Deactivated {
                event: self.events[prev].clone(),
            },
            None => Transition::Unchanged,
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn reset_state(&mut self) {
        self.active = None;
        self.seen.clear();
        self.last_tick = None;
    }

    /// Most specific window covering `t`.
    fn select(&self, t: f64) -> Option<usize> {
        self.events
            .iter()
            .filter(|w| w.covers(t))
            .min_by(|a, b| a.specificity_cmp(b))
            .map(|w| w.order)
    }

    /// `None` means no change relative to the pre-tick display.
    fn try_activate(&mut self, chosen: usize, cleared: Option<usize>) -> Option<Transition> {
        let identity = &self.events[chosen].identity;

        if let Some(active) = self.active {
            if self.events[active].identity == *identity {
                return None;
            }
        }
        if self.seen.contains(identity) {
            return None;
        }

        self.seen.insert(identity.clone());
        let replaced = self.active.replace(chosen).or(cleared);
        Some(Transition::Activated {
            event: self.events[chosen].clone(),
            replaced: replaced.map(|i| self.events[i].clone()),
        })
    }
}
