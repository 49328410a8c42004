//! Alerter facade over the actuator engines

use crate::debounce::AlertDebouncer;
use crate::engines::{FlushPolicy, HapticEngine, SpeechEngine};
use drishti_core::Detection;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Bundles the speech engine, haptic engine and debouncer behind the one
/// operation the pipeline needs per cycle.
pub struct Alerter {
    speech: Arc<dyn SpeechEngine>,
    haptic: Arc<dyn HapticEngine>,
    debouncer: AlertDebouncer,
    pulse: Duration,
}

impl Alerter {
    pub fn new(
        speech: Arc<dyn SpeechEngine>,
        haptic: Arc<dyn HapticEngine>,
        pulse: Duration,
        clear_on_miss: bool,
    ) -> Self {
        Self {
            speech,
            haptic,
            debouncer: AlertDebouncer::new(clear_on_miss),
            pulse,
        }
    }

    /// Evaluate one completed cycle's hit-test result. Returns true when
    /// an announcement fired. Actuator failures are logged and never
    /// propagate; the pipeline keeps running.
    pub async fn on_cycle(&self, hit: Option<&Detection>) -> bool {
        let detection = match hit {
            Some(detection) => detection,
            None => {
                self.debouncer.on_miss();
                return false;
            }
        };

        if !self
            .debouncer
            .on_hit(&detection.label, self.speech.is_speaking())
        {
            debug!("Suppressed repeat announcement for '{}'", detection.label);
            return false;
        }

        if let Err(e) = self.speech.speak(&detection.label, FlushPolicy::Flush).await {
            warn!("Speech actuation failed: {}", e);
        }
        if let Err(e) = self.haptic.pulse(self.pulse).await {
            warn!("Haptic actuation failed: {}", e);
        }

        true
    }

    /// Label of the most recent announcement, if any
    pub fn last_announced(&self) -> Option<String> {
        self.debouncer.last_announced()
    }
}
