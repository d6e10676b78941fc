//! Event windows: the input events and their load-time normalization.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Severity/kind classification of an event.
///
/// Only consulted for configuration-driven filtering; resolution order
/// never depends on it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    High,
    #[default]
    Medium,
    Low,
    /// Psychological pattern annotation.
    Pattern,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
            Self::Pattern => "pattern",
        };
        f.write_str(s)
    }
}

/// A labeled, time-windowed annotation, as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Inclusive window start, in seconds of playback.
    pub start_time: f64,
    /// Inclusive window end, in seconds of playback.
    pub end_time: f64,
    /// Deduplication key. Equal identities are the same logical occurrence.
    pub identity: String,
    #[serde(default)]
    pub category: Category,
    /// Free text handed through to the display sink.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Event {
    pub fn new(start_time: f64, end_time: f64, identity: impl Into<String>, category: Category) -> Self {
        Self {
            start_time,
            end_time,
            identity: identity.into(),
            category,
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Check the structural invariants a window must hold to be resolvable.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.start_time.is_finite() {
            return Err(ValidationError::NonFiniteBound { field: "start_time" });
        }
        if !self.end_time.is_finite() {
            return Err(ValidationError::NonFiniteBound { field: "end_time" });
        }
        if self.end_time < self.start_time {
            return Err(ValidationError::InvalidTimeRange {
                start: self.start_time,
                end: self.end_time,
            });
        }
        if self.identity.trim().is_empty() {
            return Err(ValidationError::EmptyIdentity);
        }
        Ok(())
    }
}

/// An [`Event`] after normalization, as held by the resolver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventWindow {
    pub start_time: f64,
    pub end_time: f64,
    /// `max(end_time, start_time + min_window)`.
    pub effective_end: f64,
    pub identity: String,
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Position in the accepted input list; the final tie-breaker.
    pub order: usize,
}

impl EventWindow {
    /// Normalize a validated event, widening short windows to `min_window` seconds.
    pub fn normalize(event: Event, min_window: f64, order: usize) -> Self {
        let effective_end = event.end_time.max(event.start_time + min_window);
        Self {
            start_time: event.start_time,
            end_time: event.end_time,
            effective_end,
            identity: event.identity,
            category: event.category,
            label: event.label,
            order,
        }
    }

    /// Whether `t` lies within `[start_time, effective_end]`.
    pub fn covers(&self, t: f64) -> bool {
        t >= self.start_time && t <= self.effective_end
    }

    pub fn effective_span(&self) -> f64 {
        self.effective_end - self.start_time
    }

    pub fn raw_span(&self) -> f64 {
        self.end_time - self.start_time
    }

    /// Ordering used to pick between overlapping candidates: the most
    /// temporally specific window sorts first.
    pub fn specificity_cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.effective_span()
            .total_cmp(&other.effective_span())
            .then_with(|| self.raw_span().total_cmp(&other.raw_span()))
            .then_with(|| self.order.cmp(&other.order))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_windows_are_widened() {
        let w = EventWindow::normalize(Event::new(3.0, 3.2, "a", Category::High), 2.0, 0);
        assert_eq!(w.effective_end, 5.0);
        assert!(w.covers(3.9));
        assert!(!w.covers(5.01));
    }

    #[test]
    fn long_windows_keep_their_end() {
        let w = EventWindow::normalize(Event::new(0.0, 10.0, "a", Category::Low), 2.0, 0);
        assert_eq!(w.effective_end, 10.0);
        assert!(w.covers(0.0));
        assert!(w.covers(10.0));
    }

    #[test]
    fn validate_rejects_inverted_range() {
        let e = Event::new(5.0, 4.0, "x", Category::Medium);
        assert_eq!(
            e.validate(),
            Err(ValidationError::InvalidTimeRange { start: 5.0, end: 4.0 })
        );
    }

    #[test]
    fn validate_rejects_nan_and_blank_identity() {
        assert!(matches!(
            Event::new(f64::NAN, 4.0, "x", Category::Medium).validate(),
            Err(ValidationError::NonFiniteBound { field: "start_time" })
        ));
        assert_eq!(
            Event::new(1.0, 4.0, "  ", Category::Medium).validate(),
            Err(ValidationError::EmptyIdentity)
        );
    }

    #[test]
    fn zero_length_window_is_valid() {
        assert!(Event::new(2.0, 2.0, "p", Category::Pattern).validate().is_ok());
    }

    #[test]
    fn raw_span_breaks_effective_ties() {
        let long = EventWindow::normalize(Event::new(10.0, 12.0, "rf1", Category::High), 2.0, 0);
        let short = EventWindow::normalize(Event::new(11.0, 11.3, "s1", Category::Medium), 2.0, 1);
        assert_eq!(long.effective_span(), short.effective_span());
        assert_eq!(short.specificity_cmp(&long), std::cmp::Ordering::Less);
    }

    #[test]
    fn category_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Category::Pattern).unwrap(), "\"pattern\"");
        assert_eq!(Category::High.to_string(), "high");
    }
}
