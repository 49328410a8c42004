//! Alert debouncing behavior through the public alerter API

use async_trait::async_trait;
use drishti_core::{Detection, RectF};
use drishti_spk::{Alerter, FlushPolicy, HapticEngine, SpeechEngine, SpeechError};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

struct RecordingSpeech {
    spoken: Mutex<Vec<String>>,
    speaking: Mutex<bool>,
}

impl RecordingSpeech {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            spoken: Mutex::new(Vec::new()),
            speaking: Mutex::new(false),
        })
    }
}

#[async_trait]
impl SpeechEngine for RecordingSpeech {
    async fn speak(&self, text: &str, _policy: FlushPolicy) -> Result<(), SpeechError> {
        self.spoken.lock().push(text.to_string());
        Ok(())
    }

    fn is_speaking(&self) -> bool {
        *self.speaking.lock()
    }

    fn is_available(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "recording"
    }
}

struct CountingHaptic(Mutex<usize>);

#[async_trait]
impl HapticEngine for CountingHaptic {
    async fn pulse(&self, _duration: Duration) -> Result<(), SpeechError> {
        *self.0.lock() += 1;
        Ok(())
    }

    fn is_available(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "counting"
    }
}

fn detection(label: &str) -> Detection {
    Detection::new(label, 0.9, RectF::new(100.0, 100.0, 300.0, 300.0))
}

/// A fixed sequence of cycles all hitting "cup" with an idle actuator
/// fires exactly one actuation: the first.
#[tokio::test]
async fn test_constant_hit_sequence_fires_once() {
    let speech = RecordingSpeech::new();
    let haptic = Arc::new(CountingHaptic(Mutex::new(0)));
    let alerter = Alerter::new(
        speech.clone(),
        haptic.clone(),
        Duration::from_millis(200),
        false,
    );

    for _ in 0..20 {
        alerter.on_cycle(Some(&detection("cup"))).await;
    }

    assert_eq!(*speech.spoken.lock(), vec!["cup".to_string()]);
    assert_eq!(*haptic.0.lock(), 1);
}

/// [cup, cup, dog, dog] with an idle actuator produces exactly two
/// actuations, in order.
#[tokio::test]
async fn test_label_change_sequence_fires_in_order() {
    let speech = RecordingSpeech::new();
    let haptic = Arc::new(CountingHaptic(Mutex::new(0)));
    let alerter = Alerter::new(
        speech.clone(),
        haptic.clone(),
        Duration::from_millis(200),
        false,
    );

    for label in ["cup", "cup", "dog", "dog"] {
        alerter.on_cycle(Some(&detection(label))).await;
    }

    assert_eq!(
        *speech.spoken.lock(),
        vec!["cup".to_string(), "dog".to_string()]
    );
    assert_eq!(*haptic.0.lock(), 2);
}

/// While the actuator reports speaking, nothing fires, and the
/// suppressed hit leaves no state behind.
#[tokio::test]
async fn test_speaking_actuator_blocks_new_labels() {
    let speech = RecordingSpeech::new();
    let haptic = Arc::new(CountingHaptic(Mutex::new(0)));
    let alerter = Alerter::new(
        speech.clone(),
        haptic.clone(),
        Duration::from_millis(200),
        false,
    );

    alerter.on_cycle(Some(&detection("cup"))).await;

    *speech.speaking.lock() = true;
    alerter.on_cycle(Some(&detection("dog"))).await;
    assert_eq!(speech.spoken.lock().len(), 1);

    // Once idle, the pending different label announces
    *speech.speaking.lock() = false;
    alerter.on_cycle(Some(&detection("dog"))).await;
    assert_eq!(
        *speech.spoken.lock(),
        vec!["cup".to_string(), "dog".to_string()]
    );
}

/// Default behavior: losing the hit does not clear the last announced
/// label, so re-entry of the same object stays silent.
#[tokio::test]
async fn test_reentry_silent_without_clear_on_miss() {
    let speech = RecordingSpeech::new();
    let haptic = Arc::new(CountingHaptic(Mutex::new(0)));
    let alerter = Alerter::new(
        speech.clone(),
        haptic.clone(),
        Duration::from_millis(200),
        false,
    );

    alerter.on_cycle(Some(&detection("cup"))).await;
    for _ in 0..3 {
        alerter.on_cycle(None).await;
    }
    alerter.on_cycle(Some(&detection("cup"))).await;

    assert_eq!(speech.spoken.lock().len(), 1);
}

/// Configured alternative: a miss clears the label and re-entry
/// re-announces.
#[tokio::test]
async fn test_reentry_reannounces_with_clear_on_miss() {
    let speech = RecordingSpeech::new();
    let haptic = Arc::new(CountingHaptic(Mutex::new(0)));
    let alerter = Alerter::new(
        speech.clone(),
        haptic.clone(),
        Duration::from_millis(200),
        true,
    );

    alerter.on_cycle(Some(&detection("cup"))).await;
    alerter.on_cycle(None).await;
    alerter.on_cycle(Some(&detection("cup"))).await;

    assert_eq!(speech.spoken.lock().len(), 2);
    assert_eq!(*haptic.0.lock(), 2);
}

/// Haptic pulse length follows the configured duration.
#[tokio::test]
async fn test_pulse_duration_matches_configuration() {
    struct PulseProbe(Mutex<Option<Duration>>);

    #[async_trait]
    impl HapticEngine for PulseProbe {
        async fn pulse(&self, duration: Duration) -> Result<(), SpeechError> {
            *self.0.lock() = Some(duration);
            Ok(())
        }

        fn is_available(&self) -> bool {
            true
        }

        fn name(&self) -> &str {
            "probe"
        }
    }

    let probe = Arc::new(PulseProbe(Mutex::new(None)));
    let alerter = Alerter::new(
        RecordingSpeech::new(),
        probe.clone(),
        Duration::from_millis(200),
        false,
    );

    alerter.on_cycle(Some(&detection("cup"))).await;
    assert_eq!(*probe.0.lock(), Some(Duration::from_millis(200)));
}
