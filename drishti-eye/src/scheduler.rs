//! Single-flight inference scheduling
//!
//! Decouples frame arrival from inference latency: at most one cycle is
//! ever in flight, and a frame arriving while the worker is occupied is
//! dropped on the spot so the freshest frame wins once the worker
//! frees up. Frames are never queued.

use crate::crop::crop_frame;
use crate::frame::{Frame, FrameRecycler};
use drishti_core::TransformPair;
use image::RgbImage;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Hand-off channel depth. One slot: the gate below already guarantees
/// a single job in flight, the channel only carries it to the worker.
pub(crate) const JOB_CHANNEL_CAPACITY: usize = 1;

/// Live cycle state. `busy` is the only mutable state shared between
/// the producer context and the worker context.
pub struct CycleStats {
    busy: AtomicBool,
    last_dispatched_seq: AtomicU64,
    last_duration_ms: AtomicU64,
}

impl CycleStats {
    pub(crate) fn new() -> Self {
        Self {
            busy: AtomicBool::new(false),
            last_dispatched_seq: AtomicU64::new(0),
            last_duration_ms: AtomicU64::new(0),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Sequence number of the most recently dispatched frame
    pub fn last_dispatched_seq(&self) -> u64 {
        self.last_dispatched_seq.load(Ordering::Relaxed)
    }

    /// Wall-clock duration of the most recent completed detector call
    pub fn last_duration_ms(&self) -> u64 {
        self.last_duration_ms.load(Ordering::Relaxed)
    }

    pub(crate) fn record_duration_ms(&self, duration_ms: u64) {
        self.last_duration_ms.store(duration_ms, Ordering::Relaxed);
    }

    fn try_acquire(&self) -> bool {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    fn release(&self) {
        self.busy.store(false, Ordering::Release);
    }
}

/// Clears the busy flag when dropped, so every worker exit path
/// (success, detector error, panic unwind) releases the cycle.
pub(crate) struct CycleGuard(Arc<CycleStats>);

impl CycleGuard {
    pub(crate) fn new(stats: Arc<CycleStats>) -> Self {
        Self(stats)
    }
}

impl Drop for CycleGuard {
    fn drop(&mut self) {
        self.0.release();
    }
}

/// One prepared inference cycle, exclusively owned by the worker once
/// sent
pub(crate) struct InferenceJob {
    pub crop: RgbImage,
    pub seq: u64,
    pub frame_size: (u32, u32),
}

/// Producer-side gate: checks the busy flag, crops, recycles the
/// capture buffer and hands the job to the worker.
pub struct InferenceScheduler {
    stats: Arc<CycleStats>,
    transform: TransformPair,
    input_size: u32,
    sender: mpsc::Sender<InferenceJob>,
}

impl InferenceScheduler {
    pub(crate) fn new(
        stats: Arc<CycleStats>,
        transform: TransformPair,
        input_size: u32,
        sender: mpsc::Sender<InferenceJob>,
    ) -> Self {
        Self {
            stats,
            transform,
            input_size,
            sender,
        }
    }

    /// Offer a frame to the pipeline. Returns true when the frame was
    /// dispatched to the worker, false when it was dropped. Either way
    /// the capture buffer goes back to the source before this returns;
    /// the caller is never blocked on inference.
    pub fn on_frame_available(&self, frame: Frame, recycler: &dyn FrameRecycler) -> bool {
        if !self.stats.try_acquire() {
            debug!("Dropping frame {}: cycle in flight", frame.seq);
            recycler.recycle(frame);
            return false;
        }

        let seq = frame.seq;
        let frame_size = (frame.width, frame.height);

        let crop = match crop_frame(&frame, &self.transform, self.input_size) {
            Ok(crop) => crop,
            Err(e) => {
                warn!("Failed to crop frame {}: {}", seq, e);
                recycler.recycle(frame);
                self.stats.release();
                return false;
            }
        };

        // Capture buffer goes back immediately after the copy, not
        // after inference
        recycler.recycle(frame);

        self.stats.last_dispatched_seq.store(seq, Ordering::Relaxed);

        if let Err(e) = self.sender.try_send(InferenceJob {
            crop,
            seq,
            frame_size,
        }) {
            warn!("Dropping prepared crop for frame {}: {}", seq, e);
            self.stats.release();
            return false;
        }

        true
    }

    pub fn stats(&self) -> Arc<CycleStats> {
        self.stats.clone()
    }
}
