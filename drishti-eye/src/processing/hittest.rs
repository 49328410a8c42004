//! Crosshair hit-testing

use drishti_core::{Detection, RectF};

/// Return the first detection, in input order, whose box fully contains
/// the crosshair region. Containment is deliberately stricter than
/// intersection: the object's bounding box must enclose the whole aim
/// rectangle. First-match makes the winner deterministic when several
/// detections qualify.
pub fn find_hit<'a>(detections: &'a [Detection], crosshair: &RectF) -> Option<&'a Detection> {
    detections
        .iter()
        .find(|detection| detection.rect.contains_rect(crosshair))
}
