//! Overlay event publishing for the presentation layer

use drishti_core::{Detection, RectF};
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::debug;

/// Label of the synthetic box carrying the crosshair region, published
/// with confidence 1.0 so the presentation layer renders it uniformly
/// with real detections
pub const CROSSHAIR_LABEL: &str = "crosshair";

/// Events published to the presentation layer
#[derive(Debug, Clone, Serialize)]
pub enum PerceptionEvent {
    /// Fresh overlay content; the presentation layer should redraw
    Overlay(OverlayUpdate),
    /// Non-fatal condition worth surfacing to the user (dismissible)
    Warning { message: String, timestamp_ms: i64 },
}

/// One completed cycle's worth of presentation data
#[derive(Debug, Clone, Serialize)]
pub struct OverlayUpdate {
    /// Sequence number of the frame this cycle processed
    pub seq: u64,
    pub frame_size: (u32, u32),
    pub crop_size: (u32, u32),
    /// Wall-clock duration of the detector call
    pub inference_ms: u64,
    /// Filtered detections in frame space, plus the synthetic crosshair
    /// box
    pub boxes: Vec<OverlayBox>,
    pub timestamp_ms: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct OverlayBox {
    pub detection: Detection,
    /// Stable id from the tracker, if tracking is enabled
    pub track_id: Option<u64>,
}

/// Synthetic crosshair pseudo-detection appended to every overlay
/// update
pub(crate) fn crosshair_box(crosshair: RectF) -> OverlayBox {
    OverlayBox {
        detection: Detection::new(CROSSHAIR_LABEL, 1.0, crosshair),
        track_id: None,
    }
}

/// Fire-and-forget publisher: the pipeline never waits for a redraw
pub struct OverlayPublisher {
    sender: broadcast::Sender<PerceptionEvent>,
}

impl OverlayPublisher {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PerceptionEvent> {
        self.sender.subscribe()
    }

    pub fn publish(&self, event: PerceptionEvent) {
        // A send error only means nobody is subscribed right now
        if self.sender.send(event).is_err() {
            debug!("No overlay subscribers, event dropped");
        }
    }

    pub(crate) fn warn(&self, message: impl Into<String>) {
        self.publish(PerceptionEvent::Warning {
            message: message.into(),
            timestamp_ms: chrono::Utc::now().timestamp_millis(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crosshair_box_shape() {
        let rect = RectF::new(140.0, 180.0, 160.0, 200.0);
        let pseudo = crosshair_box(rect);
        assert_eq!(pseudo.detection.label, CROSSHAIR_LABEL);
        assert_eq!(pseudo.detection.confidence, 1.0);
        assert_eq!(pseudo.detection.rect, rect);
        assert!(pseudo.track_id.is_none());
    }

    #[tokio::test]
    async fn test_publish_reaches_subscriber() {
        let publisher = OverlayPublisher::new(16);
        let mut receiver = publisher.subscribe();

        publisher.warn("acceleration unavailable");

        match receiver.recv().await.unwrap() {
            PerceptionEvent::Warning { message, .. } => {
                assert!(message.contains("acceleration"));
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn test_publish_without_subscribers_is_silent() {
        let publisher = OverlayPublisher::new(16);
        publisher.warn("nobody listening");
    }
}
