//! Scenario tests for the resolver engine.

#[cfg(test)]
mod tests {
    use super::super::engine::TemporalEventResolver;
    use super::super::window::{Category, Event};
    use crate::config::ResolverConfig;
    use crate::events::Transition;

    fn activated_id(t: &Transition) -> Option<&str> {
        t.activated().map(|e| e.identity.as_str())
    }

    fn red_flag_payload() -> Vec<Event> {
        vec![
            Event::new(10.0, 12.0, "rf1", Category::High),
            Event::new(11.0, 11.3, "susp1", Category::Medium),
        ]
    }

    #[test]
    fn test_overlap_seek_and_reappearance() {
        let mut r = TemporalEventResolver::default();
        r.load(red_flag_payload());

        let t = r.tick(10.5);
        assert_eq!(activated_id(&t), Some("rf1"));

        match r.tick(11.1) {
            Transition::Activated { event, replaced } => {
                assert_eq!(event.identity, "susp1");
                assert_eq!(replaced.map(|e| e.identity).as_deref(), Some("rf1"));
            }
            other => panic!("Expected Activated, got {other:?}"),
        }

        match r.tick(25.0) {
            Transition::Deactivated { event } => assert_eq!(event.identity, "susp1"),
            other => panic!("Expected Deactivated, got {other:?}"),
        }
        assert!(r.active().is_none());

        match r.tick(10.5) {
            Transition::Activated { event, replaced } => {
                assert_eq!(event.identity, "rf1");
                assert!(replaced.is_none());
            }
            other => panic!("Expected Activated, got {other:?}"),
        }
    }

    #[test]
    fn test_nested_short_event_wins() {
        let mut r = TemporalEventResolver::default();
        r.load(vec![
            Event::new(0.0, 10.0, "a", Category::Pattern),
            Event::new(4.0, 5.0, "b", Category::Low),
        ]);
        assert_eq!(activated_id(&r.tick(4.5)), Some("b"));
    }

    #[test]
    fn test_equal_spans_prefer_input_order() {
        let mut r = TemporalEventResolver::default();
        r.load(vec![
            Event::new(2.0, 6.0, "first", Category::Low),
            Event::new(2.0, 6.0, "second", Category::High),
        ]);
        assert_eq!(activated_id(&r.tick(3.0)), Some("first"));
    }

    #[test]
    fn test_short_window_selectable_after_raw_end() {
        let mut r = TemporalEventResolver::default();
        r.load(vec![Event::new(3.0, 3.2, "blip", Category::Medium)]);
        assert_eq!(activated_id(&r.tick(3.9)), Some("blip"));
    }

    #[test]
    fn test_duplicate_identity_shown_once() {
        let mut r = TemporalEventResolver::default();
        r.load(vec![
            Event::new(0.0, 3.0, "same", Category::High),
            Event::new(4.0, 7.0, "same", Category::High),
        ]);
        let activations = [0.5, 1.5, 2.5, 3.5, 4.5, 5.5, 6.5, 7.5]
            .into_iter()
            .map(|t| r.tick(t))
            .filter(|t| t.activated().is_some())
            .count();
        assert_eq!(activations, 1);
    }

    #[test]
    fn test_small_backward_drift_does_not_reshow() {
        let mut r = TemporalEventResolver::default();
        r.load(vec![Event::new(5.0, 8.0, "a", Category::High)]);
        assert!(r.tick(5.5).activated().is_some());
        assert_eq!(r.tick(6.5), Transition::Unchanged);
        assert_eq!(r.tick(7.5), Transition::Unchanged);
        assert!(matches!(r.tick(8.5), Transition::Deactivated { .. }));
        // Backwards by less than the seek threshold re-enters the window.
        assert_eq!(r.tick(7.8), Transition::Unchanged);
        assert!(r.active().is_none());
    }

    fn shown_then_left(r: &mut TemporalEventResolver) {
        r.load(vec![Event::new(5.0, 8.0, "a", Category::High)]);
        assert!(r.tick(5.5).activated().is_some());
        assert_eq!(r.tick(6.5), Transition::Unchanged);
        assert_eq!(r.tick(7.5), Transition::Unchanged);
        assert!(matches!(r.tick(8.5), Transition::Deactivated { .. }));
    }

    #[test]
    fn test_gap_equal_to_threshold_is_not_a_seek() {
        let mut r = TemporalEventResolver::default();
        shown_then_left(&mut r);
        assert_eq!(r.tick(7.0), Transition::Unchanged);
        assert!(r.has_seen("a"));
    }

    #[test]
    fn test_gap_just_over_threshold_is_a_seek() {
        let mut r = TemporalEventResolver::default();
        shown_then_left(&mut r);
        // 8.5 - 6.9990234375 = 1.5009765625, exact in binary.
        let t = 7.0 - 1.0 / 1024.0;
        assert_eq!(activated_id(&r.tick(t)), Some("a"));
    }

    #[test]
    fn test_custom_thresholds() {
        let config = ResolverConfig {
            min_window_secs: 0.0,
            seek_threshold_secs: 10.0,
            ..ResolverConfig::default()
        };
        let mut r = TemporalEventResolver::new(config);
        r.load(vec![Event::new(3.0, 3.2, "blip", Category::Medium)]);
        assert_eq!(r.tick(3.9), Transition::Unchanged);
        assert!(r.tick(3.1).activated().is_some());
        assert!(matches!(r.tick(3.5), Transition::Deactivated { .. }));
        assert_eq!(r.tick(8.0), Transition::Unchanged);
        // A 4.9s jump back is below the configured threshold: no reopen.
        assert_eq!(r.tick(3.1), Transition::Unchanged);
    }

    #[test]
    fn test_empty_load_never_activates() {
        let mut r = TemporalEventResolver::default();
        r.load(Vec::new());
        for t in [0.0, 1.0, 50.0, 2.0] {
            assert_eq!(r.tick(t), Transition::Unchanged);
        }
    }
}
