//! Confidence filtering and coordinate mapping

use drishti_core::{AffineTransform, Detection};

/// Drop detections below the confidence threshold or with a degenerate
/// box. Pure: surviving entries pass through unchanged, excluded ones
/// are not touched. An empty input yields an empty result.
pub fn filter_detections(detections: Vec<Detection>, min_confidence: f32) -> Vec<Detection> {
    detections
        .into_iter()
        .filter(|detection| {
            detection.confidence >= min_confidence && !detection.rect.is_degenerate()
        })
        .collect()
}

/// Map detection boxes in place from model-input space into frame space
/// through the inverse transform. Each surviving detection is mapped
/// exactly once, by the orchestrator, right after filtering.
pub fn map_to_frame(detections: &mut [Detection], inverse: &AffineTransform) {
    for detection in detections {
        detection.rect = inverse.map_rect(&detection.rect);
    }
}
