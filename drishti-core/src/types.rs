//! Shared detection types

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in floating-point pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectF {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl RectF {
    /// Create a rectangle from its edges
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self { left, top, right, bottom }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn center_x(&self) -> f32 {
        (self.left + self.right) / 2.0
    }

    pub fn center_y(&self) -> f32 {
        (self.top + self.bottom) / 2.0
    }

    /// A rectangle is degenerate if it has no positive area or any
    /// non-finite edge
    pub fn is_degenerate(&self) -> bool {
        !self.left.is_finite()
            || !self.top.is_finite()
            || !self.right.is_finite()
            || !self.bottom.is_finite()
            || self.width() <= 0.0
            || self.height() <= 0.0
    }

    /// Full containment: every edge of `other` lies on or inside this
    /// rectangle. Containment is reflexive; a degenerate rectangle
    /// contains nothing.
    pub fn contains_rect(&self, other: &RectF) -> bool {
        if self.is_degenerate() || other.is_degenerate() {
            return false;
        }
        self.left <= other.left
            && self.top <= other.top
            && self.right >= other.right
            && self.bottom >= other.bottom
    }

    /// Whether the two rectangles share any area
    pub fn intersects(&self, other: &RectF) -> bool {
        if self.is_degenerate() || other.is_degenerate() {
            return false;
        }
        self.left < other.right
            && other.left < self.right
            && self.top < other.bottom
            && other.top < self.bottom
    }

    /// Intersection over union, 0.0 for invalid or disjoint rectangles
    pub fn iou(&self, other: &RectF) -> f32 {
        if !self.intersects(other) {
            return 0.0;
        }

        let inter_left = self.left.max(other.left);
        let inter_top = self.top.max(other.top);
        let inter_right = self.right.min(other.right);
        let inter_bottom = self.bottom.min(other.bottom);

        let inter_area = (inter_right - inter_left) * (inter_bottom - inter_top);
        let union_area = self.width() * self.height() + other.width() * other.height() - inter_area;

        if union_area <= 0.0 || !union_area.is_finite() {
            return 0.0;
        }

        let iou = inter_area / union_area;
        if iou.is_finite() && (0.0..=1.0).contains(&iou) {
            iou
        } else {
            0.0
        }
    }
}

/// A single detector result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub label: String,
    pub confidence: f32,
    pub rect: RectF,
}

impl Detection {
    pub fn new(label: impl Into<String>, confidence: f32, rect: RectF) -> Self {
        Self {
            label: label.into(),
            confidence,
            rect,
        }
    }
}
