//! Minimal end-to-end pipeline run with a scripted detector
//!
//! Feeds one synthetic frame through the full chain and prints the
//! resulting overlay update.

use anyhow::Result;
use bytes::Bytes;
use drishti_core::{Detection, PipelineConfig, RectF};
use drishti_eye::{DiscardRecycler, Frame, PerceptionAdapter, PerceptionEvent, ScriptedDetector};
use drishti_spk::engines::command::{CommandSpeechEngine, NoopHapticEngine};
use drishti_spk::Alerter;
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("drishti_eye=debug,drishti_spk=debug")
        .init();

    let config = PipelineConfig::default();

    // One scripted cycle: a book filling most of the model input
    let detector = Arc::new(ScriptedDetector::new(vec![vec![Detection::new(
        "book",
        0.9,
        RectF::new(40.0, 40.0, 260.0, 260.0),
    )]]));

    let alerter = Arc::new(Alerter::new(
        Arc::new(CommandSpeechEngine::new()),
        Arc::new(NoopHapticEngine),
        Duration::from_millis(config.haptic_pulse_ms),
        config.clear_announcement_on_miss,
    ));

    let adapter = PerceptionAdapter::new(config, detector, alerter)?;
    let mut events = adapter.subscribe();
    adapter.start()?;

    let (width, height) = adapter.config().preview_size;
    let frame = Frame::new(
        width,
        height,
        1,
        Bytes::from(vec![0u8; (width * height * 3) as usize]),
    )?;
    adapter.on_frame_available(frame, &DiscardRecycler);

    match events.recv().await? {
        PerceptionEvent::Overlay(update) => {
            println!(
                "frame {}x{}, crop {}x{}, inference {}ms",
                update.frame_size.0,
                update.frame_size.1,
                update.crop_size.0,
                update.crop_size.1,
                update.inference_ms
            );
            for overlay_box in &update.boxes {
                println!(
                    "  {} ({:.2}) at {:?}",
                    overlay_box.detection.label,
                    overlay_box.detection.confidence,
                    overlay_box.detection.rect
                );
            }
        }
        PerceptionEvent::Warning { message, .. } => println!("warning: {}", message),
    }

    adapter.stop().await;
    Ok(())
}
