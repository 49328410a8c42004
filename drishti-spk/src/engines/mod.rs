//! Actuator engine abstractions

pub mod command;

use crate::error::SpeechError;
use async_trait::async_trait;
use std::time::Duration;

/// Queue policy applied when a new utterance is submitted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushPolicy {
    /// Discard anything queued or currently rendering first
    Flush,
    /// Let the current utterance finish before speaking
    Enqueue,
}

/// Trait for speech actuators
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SpeechEngine: Send + Sync {
    /// Render `text` as speech
    async fn speak(&self, text: &str, policy: FlushPolicy) -> Result<(), SpeechError>;

    /// Whether the actuator is currently rendering speech
    fn is_speaking(&self) -> bool;

    /// Check if engine is available
    fn is_available(&self) -> bool;

    /// Get engine name
    fn name(&self) -> &str;
}

/// Trait for haptic actuators
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HapticEngine: Send + Sync {
    /// Fire a vibration pulse of the given length
    async fn pulse(&self, duration: Duration) -> Result<(), SpeechError>;

    /// Check if engine is available
    fn is_available(&self) -> bool;

    /// Get engine name
    fn name(&self) -> &str;
}
