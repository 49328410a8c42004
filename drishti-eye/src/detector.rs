//! Opaque object-detector boundary

use crate::error::VisionError;
use drishti_core::Detection;
use image::RgbImage;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::debug;

/// The tensor-execution engine behind this trait is a black box to the
/// pipeline: one call per inference cycle, boxes returned in
/// model-input coordinates.
#[cfg_attr(test, mockall::automock)]
pub trait Detector: Send + Sync {
    /// Run one inference over the square model-input buffer
    fn recognize(&self, input: &RgbImage) -> Result<Vec<Detection>, VisionError>;

    /// Toggle hardware acceleration. Failures here are transient
    /// configuration errors, surfaced as warnings; the engine keeps its
    /// prior settings.
    fn set_accelerated(&self, _enabled: bool) -> Result<(), VisionError> {
        Err(VisionError::DetectorConfig(
            "Acceleration toggle not supported".to_string(),
        ))
    }

    /// Set the inference thread count. Same transient semantics as
    /// `set_accelerated`.
    fn set_num_threads(&self, _threads: usize) -> Result<(), VisionError> {
        Err(VisionError::DetectorConfig(
            "Thread count not supported".to_string(),
        ))
    }

    /// Get detector name
    fn name(&self) -> &str;
}

/// Deterministic detector for examples and tests: plays back a scripted
/// list of results, one entry per inference call, optionally holding
/// each call for a fixed latency to emulate a slow model.
pub struct ScriptedDetector {
    script: Mutex<VecDeque<Vec<Detection>>>,
    latency: Duration,
    calls: AtomicUsize,
}

impl ScriptedDetector {
    pub fn new(script: Vec<Vec<Detection>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            latency: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    /// Hold every `recognize` call for `latency` before returning
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Number of inference calls served so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Detector for ScriptedDetector {
    fn recognize(&self, _input: &RgbImage) -> Result<Vec<Detection>, VisionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.latency.is_zero() {
            // The real engine blocks the worker for the whole inference
            std::thread::sleep(self.latency);
        }

        let results = self.script.lock().pop_front().unwrap_or_default();
        debug!("Scripted detector returning {} detections", results.len());
        Ok(results)
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
