//! Property-based tests for the geometry and filtering stages

use drishti_core::{Detection, RectF, TransformPair};
use drishti_eye::processing::filter_detections;
use drishti_spk::AlertDebouncer;
use proptest::prelude::*;

fn rotation_strategy() -> impl Strategy<Value = i32> {
    prop_oneof![Just(0), Just(90), Just(180), Just(270)]
}

proptest! {
    /// Mapping a box forward then inverse returns the original box
    /// within floating-point tolerance, for any non-degenerate sizes
    /// and right-angle rotation, with aspect distortion allowed.
    #[test]
    fn round_trip_preserves_boxes(
        src_width in 2u32..1920,
        src_height in 2u32..1920,
        dst_size in 16u32..1024,
        rotation in rotation_strategy(),
        left in 0.0f32..1000.0,
        top in 0.0f32..1000.0,
        width in 1.0f32..500.0,
        height in 1.0f32..500.0,
    ) {
        let pair = TransformPair::compute(src_width, src_height, dst_size, rotation, false).unwrap();
        let rect = RectF::new(left, top, left + width, top + height);

        let mapped = pair.forward.map_rect(&rect);
        let back = pair.inverse.map_rect(&mapped);

        prop_assert!((back.left - rect.left).abs() < 0.5);
        prop_assert!((back.top - rect.top).abs() < 0.5);
        prop_assert!((back.right - rect.right).abs() < 0.5);
        prop_assert!((back.bottom - rect.bottom).abs() < 0.5);
    }

    /// The forward and inverse maps always compose to the identity.
    #[test]
    fn inverse_composes_to_identity(
        src_width in 2u32..1920,
        src_height in 2u32..1920,
        dst_size in 16u32..1024,
        rotation in rotation_strategy(),
        maintain_aspect in any::<bool>(),
    ) {
        let pair = TransformPair::compute(
            src_width, src_height, dst_size, rotation, maintain_aspect,
        ).unwrap();
        let composed = pair.forward.then(&pair.inverse);

        prop_assert!((composed.a - 1.0).abs() < 1e-3);
        prop_assert!(composed.b.abs() < 1e-3);
        prop_assert!((composed.e - 1.0).abs() < 1e-3);
        prop_assert!(composed.d.abs() < 1e-3);
        prop_assert!(composed.c.abs() < 0.5);
        prop_assert!(composed.f.abs() < 0.5);
    }

    /// Loosening the threshold never removes a detection: the survivors
    /// of a stricter filter are a subset of the looser filter's.
    #[test]
    fn filter_is_monotonic_in_threshold(
        confidences in prop::collection::vec(0.0f32..1.0, 0..50),
        threshold_a in 0.0f32..1.0,
        threshold_b in 0.0f32..1.0,
    ) {
        let detections: Vec<Detection> = confidences
            .iter()
            .enumerate()
            .map(|(index, confidence)| {
                Detection::new(
                    format!("object-{}", index),
                    *confidence,
                    RectF::new(0.0, 0.0, 10.0, 10.0),
                )
            })
            .collect();

        let (loose, strict) = if threshold_a <= threshold_b {
            (threshold_a, threshold_b)
        } else {
            (threshold_b, threshold_a)
        };

        let loose_kept = filter_detections(detections.clone(), loose);
        let strict_kept = filter_detections(detections, strict);

        for kept in &strict_kept {
            prop_assert!(loose_kept.contains(kept));
        }
    }

    /// With an always-idle actuator, the debouncer fires exactly once
    /// per run of equal labels.
    #[test]
    fn debouncer_fires_once_per_label_run(
        labels in prop::collection::vec(prop_oneof![
            Just("cup"), Just("dog"), Just("book"),
        ], 1..40),
    ) {
        let debouncer = AlertDebouncer::new(false);
        let fired = labels
            .iter()
            .filter(|label| debouncer.on_hit(label, false))
            .count();

        let mut runs = 1;
        for pair in labels.windows(2) {
            if pair[0] != pair[1] {
                runs += 1;
            }
        }
        prop_assert_eq!(fired, runs);
    }
}
