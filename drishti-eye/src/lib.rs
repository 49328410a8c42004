//! drishti-eye: Perception Pipeline for drishti
//!
//! Ingests camera frames, crops them into a square model-input buffer,
//! runs an opaque object detector under a strict single-flight policy,
//! maps detections back into frame coordinates, hit-tests them against a
//! fixed crosshair region and drives the alert actuators, publishing
//! overlay events for the presentation layer.

pub mod adapter;
pub mod crop;
pub mod detector;
pub mod error;
pub mod frame;
pub mod overlay;
pub mod processing;
pub mod scheduler;

pub use adapter::PerceptionAdapter;
pub use detector::{Detector, ScriptedDetector};
pub use error::VisionError;
pub use frame::{DiscardRecycler, Frame, FrameRecycler};
pub use overlay::{OverlayBox, OverlayUpdate, PerceptionEvent, CROSSHAIR_LABEL};
