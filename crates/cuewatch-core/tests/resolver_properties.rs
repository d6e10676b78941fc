//! Integration tests for the resolver's observable guarantees.

use std::collections::HashMap;

use cuewatch_core::{Category, Event, TemporalEventResolver, Transition};
use proptest::prelude::*;

fn event_strategy() -> impl Strategy<Value = Event> {
    (0u32..600, 0u32..120, 0usize..6, 0usize..4).prop_map(|(start, len, id, cat)| {
        let start = f64::from(start) / 10.0;
        let end = start + f64::from(len) / 10.0;
        let category = [Category::High, Category::Medium, Category::Low, Category::Pattern][cat];
        Event::new(start, end, format!("ev{id}"), category)
    })
}

fn active_count(r: &TemporalEventResolver) -> usize {
    usize::from(r.active().is_some())
}

proptest! {
    #[test]
    fn repeated_tick_is_unchanged(
        events in prop::collection::vec(event_strategy(), 0..12),
        times in prop::collection::vec(0u32..800, 1..40),
    ) {
        let mut r = TemporalEventResolver::default();
        r.load(events);
        for t in times {
            let t = f64::from(t) / 10.0;
            r.tick(t);
            prop_assert_eq!(r.tick(t), Transition::Unchanged);
            prop_assert!(active_count(&r) <= 1);
        }
    }

    #[test]
    fn monotonic_playback_shows_each_identity_once(
        events in prop::collection::vec(event_strategy(), 0..12),
        steps in prop::collection::vec(1u32..15, 1..200),
    ) {
        let mut r = TemporalEventResolver::default();
        r.load(events);
        let mut shown: HashMap<String, usize> = HashMap::new();
        let mut t = 0.0;
        for step in steps {
            // Steps stay at or below the seek threshold.
            t += f64::from(step) / 10.0;
            if let Transition::Activated { event, .. } = r.tick(t) {
                *shown.entry(event.identity).or_default() += 1;
            }
        }
        for (identity, count) in shown {
            prop_assert_eq!(count, 1, "{} shown {} times", identity, count);
        }
    }

    #[test]
    fn active_event_was_shown_since_reset(
        events in prop::collection::vec(event_strategy(), 1..12),
        times in prop::collection::vec(0u32..800, 1..60),
    ) {
        let mut r = TemporalEventResolver::default();
        r.load(events);
        for t in times {
            r.tick(f64::from(t) / 10.0);
            if let Some(active) = r.active() {
                prop_assert!(r.has_seen(&active.identity));
            }
        }
    }
}

#[test]
fn specificity_tie_break() {
    let mut r = TemporalEventResolver::default();
    r.load(vec![
        Event::new(0.0, 10.0, "A", Category::High),
        Event::new(4.0, 5.0, "B", Category::High),
    ]);
    let t = r.tick(4.5);
    assert_eq!(t.activated().map(|e| e.identity.as_str()), Some("B"));
}

#[test]
fn short_window_widening() {
    let mut r = TemporalEventResolver::default();
    r.load(vec![Event::new(3.0, 3.2, "blip", Category::Medium)]);
    assert_eq!(r.events()[0].effective_end, 5.0);
    assert!(r.tick(3.9).activated().is_some());
}

#[test]
fn seek_reopens_shown_event() {
    let mut r = TemporalEventResolver::default();
    r.load(vec![Event::new(10.0, 15.0, "a", Category::High)]);
    assert!(r.tick(10.5).activated().is_some());
    for t in [11.5, 12.5, 13.5, 14.5] {
        assert_eq!(r.tick(t), Transition::Unchanged);
    }
    assert!(matches!(r.tick(15.5), Transition::Deactivated { .. }));

    // Small drift back into the window: still suppressed.
    assert_eq!(r.tick(14.8), Transition::Unchanged);

    // Jump away and back: shown again.
    assert_eq!(r.tick(30.0), Transition::Unchanged);
    assert!(r.tick(11.0).activated().is_some());
}

#[test]
fn load_mid_playback_supersedes_state() {
    let mut r = TemporalEventResolver::default();
    r.load(vec![Event::new(0.0, 10.0, "old", Category::High)]);
    assert!(r.tick(2.0).activated().is_some());

    let report = r.load(vec![
        Event::new(0.0, 10.0, "new", Category::High).with_label("Voice tremor"),
        Event::new(3.0, 1.0, "broken", Category::Low),
    ]);
    assert_eq!(report.accepted, 1);
    assert_eq!(report.dropped.len(), 1);
    assert!(r.active().is_none());
    let t = r.tick(2.1);
    let shown = t.activated().expect("new event shown");
    assert_eq!(shown.identity, "new");
    assert_eq!(shown.label.as_deref(), Some("Voice tremor"));
}
