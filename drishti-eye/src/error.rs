//! Error types for drishti-eye

use thiserror::Error;

#[derive(Error, Debug)]
pub enum VisionError {
    #[error("Capture error: {0}")]
    Capture(String),

    #[error("Detector error: {0}")]
    Detector(String),

    #[error("Detector configuration error: {0}")]
    DetectorConfig(String),

    #[error("Processing error: {0}")]
    Processing(String),

    #[error("Core error: {0}")]
    Core(#[from] drishti_core::Error),
}
