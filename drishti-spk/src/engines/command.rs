//! Command-line actuator engines
//!
//! Speech is rendered by an external synthesizer binary (`espeak-ng` by
//! default); a flush kills the running utterance before the next one
//! starts. Hosts without a vibration device get the no-op haptic engine.

use crate::engines::{FlushPolicy, HapticEngine, SpeechEngine};
use crate::error::SpeechError;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::time::Duration;
use tokio::process::{Child, Command};
use tracing::{debug, warn};

const DEFAULT_PROGRAM: &str = "espeak-ng";
const MAX_TEXT_LENGTH: usize = 4096;

/// Speech engine backed by a command-line synthesizer
pub struct CommandSpeechEngine {
    program: String,
    available: bool,
    child: Mutex<Option<Child>>,
}

impl CommandSpeechEngine {
    /// Create an engine driving the default synthesizer binary
    pub fn new() -> Self {
        Self::with_program(DEFAULT_PROGRAM)
    }

    /// Create an engine driving a specific synthesizer binary
    pub fn with_program(program: &str) -> Self {
        let available = std::process::Command::new(program)
            .arg("--version")
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false);

        if !available {
            warn!("Speech program '{}' not available", program);
        }

        Self {
            program: program.to_string(),
            available,
            child: Mutex::new(None),
        }
    }

    /// Strip control characters and clamp length before handing text to
    /// the synthesizer process
    fn sanitize(text: &str) -> String {
        text.chars()
            .filter(|c| !c.is_control() || *c == '\n')
            .take(MAX_TEXT_LENGTH)
            .collect()
    }
}

impl Default for CommandSpeechEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SpeechEngine for CommandSpeechEngine {
    async fn speak(&self, text: &str, policy: FlushPolicy) -> Result<(), SpeechError> {
        if !self.available {
            return Err(SpeechError::Engine(format!(
                "Speech program '{}' not available",
                self.program
            )));
        }

        let sanitized = Self::sanitize(text);
        if sanitized.is_empty() {
            return Err(SpeechError::Engine("Text cannot be empty".to_string()));
        }

        match policy {
            FlushPolicy::Flush => {
                if let Some(mut running) = self.child.lock().take() {
                    if let Err(e) = running.start_kill() {
                        debug!("Could not flush running utterance: {}", e);
                    }
                }
            }
            FlushPolicy::Enqueue => {
                let running = self.child.lock().take();
                if let Some(mut running) = running {
                    let _ = running.wait().await;
                }
            }
        }

        let child = Command::new(&self.program)
            .arg(&sanitized)
            .stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .spawn()
            .map_err(|e| {
                SpeechError::Engine(format!("Failed to spawn '{}': {}", self.program, e))
            })?;

        *self.child.lock() = Some(child);
        Ok(())
    }

    fn is_speaking(&self) -> bool {
        let mut guard = self.child.lock();
        match guard.as_mut() {
            Some(child) => match child.try_wait() {
                Ok(None) => true,
                _ => {
                    *guard = None;
                    false
                }
            },
            None => false,
        }
    }

    fn is_available(&self) -> bool {
        self.available
    }

    fn name(&self) -> &str {
        "command"
    }
}

/// Haptic engine for hosts without a vibration device
pub struct NoopHapticEngine;

#[async_trait]
impl HapticEngine for NoopHapticEngine {
    async fn pulse(&self, duration: Duration) -> Result<(), SpeechError> {
        debug!("Haptic pulse of {:?} (no device)", duration);
        Ok(())
    }

    fn is_available(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "noop"
    }
}
