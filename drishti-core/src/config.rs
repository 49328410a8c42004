//! Pipeline configuration

use crate::types::RectF;
use serde::{Deserialize, Serialize};

/// Fraction of the shorter display edge used when deriving a crosshair
/// region from display geometry
const CROSSHAIR_DISPLAY_FRACTION: f32 = 1.0 / 16.0;

/// Perception pipeline configuration, fixed at construction time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Side of the square model-input buffer, in pixels
    pub input_size: u32,
    /// Minimum confidence for a detection to survive filtering
    pub min_confidence: f32,
    /// Camera preview resolution (width, height)
    pub preview_size: (u32, u32),
    /// Sensor orientation relative to the display, degrees (right-angle
    /// multiples only)
    pub rotation_degrees: i32,
    /// Preserve aspect ratio when cropping into the model input
    /// (letterbox); false scales each axis independently
    pub maintain_aspect: bool,
    /// Aiming region in frame coordinates; a detection must fully
    /// contain it to trigger an alert
    pub crosshair: RectF,
    /// Haptic pulse length per announcement, milliseconds
    pub haptic_pulse_ms: u64,
    /// Forget the last announced label when the crosshair loses its hit,
    /// so the same object re-announces on re-entry
    pub clear_announcement_on_miss: bool,
    /// Associate detections across cycles and publish track ids
    pub enable_tracking: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_size: 300,
            min_confidence: 0.5,
            preview_size: (640, 480),
            rotation_degrees: 90,
            maintain_aspect: false,
            crosshair: RectF::new(140.0, 180.0, 160.0, 200.0),
            haptic_pulse_ms: 200,
            clear_announcement_on_miss: false,
            enable_tracking: true,
        }
    }
}

impl PipelineConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.input_size == 0 {
            return Err("Model input size must be non-zero".to_string());
        }

        if self.input_size > 4096 {
            return Err("Model input size too large (max 4096)".to_string());
        }

        if !self.min_confidence.is_finite() || !(0.0..=1.0).contains(&self.min_confidence) {
            return Err("Confidence threshold must be within [0, 1]".to_string());
        }

        if self.preview_size.0 == 0 || self.preview_size.1 == 0 {
            return Err("Preview resolution must be non-zero".to_string());
        }

        if self.preview_size.0 > 7680 || self.preview_size.1 > 4320 {
            return Err("Preview resolution too large (max 8K)".to_string());
        }

        if self.rotation_degrees % 90 != 0 {
            return Err("Rotation must be a multiple of 90 degrees".to_string());
        }

        if self.crosshair.is_degenerate() {
            return Err("Crosshair region must have positive area".to_string());
        }

        let frame = RectF::new(
            0.0,
            0.0,
            self.preview_size.0 as f32,
            self.preview_size.1 as f32,
        );
        if !frame.contains_rect(&self.crosshair) {
            return Err("Crosshair region must lie within the preview frame".to_string());
        }

        if self.haptic_pulse_ms == 0 || self.haptic_pulse_ms > 10_000 {
            return Err("Haptic pulse must be between 1ms and 10s".to_string());
        }

        Ok(())
    }

    /// Derive a centered crosshair region from display geometry instead
    /// of supplying one in frame coordinates directly.
    pub fn crosshair_from_display(display_width: u32, display_height: u32) -> RectF {
        let w = display_width as f32;
        let h = display_height as f32;
        let half_side = (w.min(h) * CROSSHAIR_DISPLAY_FRACTION / 2.0).max(1.0);
        RectF::new(
            w / 2.0 - half_side,
            h / 2.0 - half_side,
            w / 2.0 + half_side,
            h / 2.0 + half_side,
        )
    }
}
