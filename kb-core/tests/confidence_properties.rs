use kb_core::Confidence;
use proptest::prelude::*;

proptest! {
    #[test]
    fn confidence_always_in_unit_interval(start in -2.0f64..3.0, deltas in prop::collection::vec(-1.0f64..1.0, 0..64)) {
        let mut c = Confidence::new(start);
        prop_assert!((0.0..=1.0).contains(&c.value()));
        for d in deltas {
            c = c.adjust(d);
            prop_assert!((0.0..=1.0).contains(&c.value()));
        }
    }

    #[test]
    fn positive_adjustment_never_decreases(start in 0.0f64..=1.0, delta in 0.0f64..1.0) {
        let c = Confidence::new(start);
        prop_assert!(c.adjust(delta).value() >= c.value());
    }

    #[test]
    fn negative_adjustment_never_increases(start in 0.0f64..=1.0, delta in 0.0f64..1.0) {
        let c = Confidence::new(start);
        prop_assert!(c.adjust(-delta).value() <= c.value());
    }
}
