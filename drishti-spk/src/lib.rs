//! drishti-spk: Alert Actuation for drishti
//!
//! Speech and haptic actuator abstractions plus the alert debouncer that
//! keeps a continuously-intersected object from flooding the user with
//! repeated announcements.

pub mod alerter;
pub mod debounce;
pub mod engines;
pub mod error;

pub use alerter::Alerter;
pub use debounce::AlertDebouncer;
pub use engines::{FlushPolicy, HapticEngine, SpeechEngine};
pub use error::SpeechError;
