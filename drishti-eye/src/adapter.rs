//! Frame pipeline orchestrator

use crate::detector::Detector;
use crate::error::VisionError;
use crate::frame::{Frame, FrameRecycler};
use crate::overlay::{crosshair_box, OverlayBox, OverlayPublisher, OverlayUpdate, PerceptionEvent};
use crate::processing::{filter_detections, find_hit, map_to_frame, ObjectTracker};
use crate::scheduler::{
    CycleGuard, CycleStats, InferenceJob, InferenceScheduler, JOB_CHANNEL_CAPACITY,
};
use drishti_core::geometry::AffineTransform;
use drishti_core::{PipelineConfig, TransformPair};
use drishti_spk::Alerter;
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Cycles a track may coast without a matching detection
const TRACK_MAX_AGE: u32 = 30;
/// Minimum IoU for a detection to take over an existing track
const TRACK_IOU_THRESHOLD: f32 = 0.3;
/// Overlay event channel depth
const EVENT_BUFFER_SIZE: usize = 64;

/// Top-level pipeline driver: validates configuration, computes the
/// frame/crop transform pair once, owns the detector, alerter, tracker
/// and scheduler, and publishes per-cycle overlay events.
pub struct PerceptionAdapter {
    config: Arc<PipelineConfig>,
    detector: Arc<dyn Detector>,
    alerter: Arc<Alerter>,
    transform: TransformPair,
    stats: Arc<CycleStats>,
    publisher: Arc<OverlayPublisher>,
    scheduler: InferenceScheduler,
    tracker: Arc<ObjectTracker>,
    is_running: Arc<RwLock<bool>>,
    job_receiver: Mutex<Option<mpsc::Receiver<InferenceJob>>>,
    worker_handle: Mutex<Option<JoinHandle<()>>>,
}

impl PerceptionAdapter {
    /// Create a new perception adapter. Configuration and geometry
    /// problems are fatal here: an invalid config or a degenerate
    /// transform never reaches the per-frame path.
    pub fn new(
        config: PipelineConfig,
        detector: Arc<dyn Detector>,
        alerter: Arc<Alerter>,
    ) -> Result<Self, VisionError> {
        config
            .validate()
            .map_err(drishti_core::Error::Configuration)?;

        let transform = TransformPair::compute(
            config.preview_size.0,
            config.preview_size.1,
            config.input_size,
            config.rotation_degrees,
            config.maintain_aspect,
        )?;

        let stats = Arc::new(CycleStats::new());
        let (sender, receiver) = mpsc::channel(JOB_CHANNEL_CAPACITY);
        let scheduler =
            InferenceScheduler::new(stats.clone(), transform, config.input_size, sender);

        Ok(Self {
            config: Arc::new(config),
            detector,
            alerter,
            transform,
            stats,
            publisher: Arc::new(OverlayPublisher::new(EVENT_BUFFER_SIZE)),
            scheduler,
            tracker: Arc::new(ObjectTracker::new(TRACK_MAX_AGE, TRACK_IOU_THRESHOLD)),
            is_running: Arc::new(RwLock::new(false)),
            job_receiver: Mutex::new(Some(receiver)),
            worker_handle: Mutex::new(None),
        })
    }

    /// Start the inference worker
    pub fn start(&self) -> Result<(), VisionError> {
        {
            let mut is_running = self.is_running.write();
            if *is_running {
                return Err(VisionError::Processing(
                    "Perception adapter already running".to_string(),
                ));
            }
            *is_running = true;
        }

        let mut receiver = match self.job_receiver.lock().take() {
            Some(receiver) => receiver,
            None => {
                *self.is_running.write() = false;
                return Err(VisionError::Processing(
                    "Perception adapter cannot be restarted".to_string(),
                ));
            }
        };

        info!(
            "Starting perception pipeline: preview {}x{}, crop {}, rotation {}",
            self.config.preview_size.0,
            self.config.preview_size.1,
            self.config.input_size,
            self.config.rotation_degrees
        );

        let config = self.config.clone();
        let detector = self.detector.clone();
        let alerter = self.alerter.clone();
        let tracker = self.tracker.clone();
        let publisher = self.publisher.clone();
        let stats = self.stats.clone();
        let inverse = self.transform.inverse;

        let handle = tokio::spawn(async move {
            while let Some(job) = receiver.recv().await {
                process_cycle(
                    job, &config, &detector, &alerter, &tracker, &publisher, &stats, &inverse,
                )
                .await;
            }
            debug!("Inference worker stopped");
        });
        *self.worker_handle.lock() = Some(handle);

        Ok(())
    }

    /// Stop the inference worker. Safe to call when already stopped.
    pub async fn stop(&self) {
        {
            let mut is_running = self.is_running.write();
            if !*is_running {
                return;
            }
            *is_running = false;
        }

        if let Some(handle) = self.worker_handle.lock().take() {
            handle.abort();
            let _ = tokio::time::timeout(Duration::from_secs(1), handle).await;
        }

        info!("Perception pipeline stopped");
    }

    /// Offer a frame to the pipeline at capture cadence. Never blocks
    /// beyond the busy check and the crop copy; returns true when the
    /// frame started a cycle, false when it was dropped.
    pub fn on_frame_available(&self, frame: Frame, recycler: &dyn FrameRecycler) -> bool {
        if !*self.is_running.read() {
            debug!("Pipeline not running, recycling frame {}", frame.seq);
            recycler.recycle(frame);
            return false;
        }
        self.scheduler.on_frame_available(frame, recycler)
    }

    /// Toggle detector hardware acceleration. A failure is a transient
    /// configuration error: logged, surfaced as a warning event, prior
    /// settings kept.
    pub fn set_accelerated(&self, enabled: bool) {
        if let Err(e) = self.detector.set_accelerated(enabled) {
            warn!("Failed to toggle acceleration: {}", e);
            self.publisher.warn(format!("{}", e));
        }
    }

    /// Set the detector thread count, with the same transient-error
    /// semantics as `set_accelerated`
    pub fn set_num_threads(&self, threads: usize) {
        if let Err(e) = self.detector.set_num_threads(threads) {
            warn!("Failed to set thread count: {}", e);
            self.publisher.warn(format!("{}", e));
        }
    }

    /// Subscribe to overlay and warning events
    pub fn subscribe(&self) -> broadcast::Receiver<PerceptionEvent> {
        self.publisher.subscribe()
    }

    pub fn is_running(&self) -> bool {
        *self.is_running.read()
    }

    pub fn is_busy(&self) -> bool {
        self.stats.is_busy()
    }

    /// Wall-clock duration of the most recent completed detector call
    pub fn last_inference_ms(&self) -> u64 {
        self.stats.last_duration_ms()
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }
}

/// One full cycle on the worker context: inference, filtering, mapping,
/// hit-test, tracking, alerting, publish. The busy flag is released on
/// every exit path when the guard drops.
#[allow(clippy::too_many_arguments)]
async fn process_cycle(
    job: InferenceJob,
    config: &Arc<PipelineConfig>,
    detector: &Arc<dyn Detector>,
    alerter: &Arc<Alerter>,
    tracker: &Arc<ObjectTracker>,
    publisher: &Arc<OverlayPublisher>,
    stats: &Arc<CycleStats>,
    inverse: &AffineTransform,
) {
    let cycle_guard = CycleGuard::new(stats.clone());

    debug!("Running detection on frame {}", job.seq);
    let started = Instant::now();
    let raw = match detector.recognize(&job.crop) {
        Ok(raw) => raw,
        Err(e) => {
            error!("Inference failed on frame {}: {}", job.seq, e);
            drop(cycle_guard);
            publisher.warn(format!("Inference failed: {}", e));
            return;
        }
    };
    let inference_ms = started.elapsed().as_millis() as u64;
    stats.record_duration_ms(inference_ms);

    let mut detections = filter_detections(raw, config.min_confidence);
    map_to_frame(&mut detections, inverse);

    let hit = find_hit(&detections, &config.crosshair).cloned();

    let track_ids: Vec<Option<u64>> = if config.enable_tracking {
        tracker
            .update(&detections)
            .into_iter()
            .map(|track| Some(track.id))
            .collect()
    } else {
        vec![None; detections.len()]
    };

    if alerter.on_cycle(hit.as_ref()).await {
        if let Some(hit) = &hit {
            info!("Announced '{}' under the crosshair", hit.label);
        }
    }

    let mut boxes: Vec<OverlayBox> = detections
        .into_iter()
        .zip(track_ids)
        .map(|(detection, track_id)| OverlayBox {
            detection,
            track_id,
        })
        .collect();
    boxes.push(crosshair_box(config.crosshair));

    // The flight ends with the chain; the overlay publish is outside it
    // and must never hold the slot
    drop(cycle_guard);

    publisher.publish(PerceptionEvent::Overlay(OverlayUpdate {
        seq: job.seq,
        frame_size: job.frame_size,
        crop_size: (config.input_size, config.input_size),
        inference_ms,
        boxes,
        timestamp_ms: chrono::Utc::now().timestamp_millis(),
    }));
}
