//! Alert de-duplication
//!
//! Tracks the last announced label so the same object held under the
//! crosshair does not trigger an announcement every cycle.

use parking_lot::RwLock;

/// Debouncer state evaluated once per completed inference cycle
pub struct AlertDebouncer {
    last_announced: RwLock<Option<String>>,
    clear_on_miss: bool,
}

impl AlertDebouncer {
    /// Create a debouncer. With `clear_on_miss` the last announced label
    /// is forgotten whenever a cycle produces no hit, so the same object
    /// re-announces after leaving and re-entering the crosshair.
    pub fn new(clear_on_miss: bool) -> Self {
        Self {
            last_announced: RwLock::new(None),
            clear_on_miss,
        }
    }

    /// A cycle completed without a hit
    pub fn on_miss(&self) {
        if self.clear_on_miss {
            *self.last_announced.write() = None;
        }
    }

    /// A cycle completed with a hit on `label`. Returns true when an
    /// announcement should fire, recording the label as announced.
    /// Nothing fires while the actuator is busy or for a label equal to
    /// the last announced one.
    pub fn on_hit(&self, label: &str, actuator_speaking: bool) -> bool {
        if actuator_speaking {
            return false;
        }

        let mut last = self.last_announced.write();
        if last.as_deref() == Some(label) {
            return false;
        }
        *last = Some(label.to_string());
        true
    }

    /// Label of the most recent announcement, if any
    pub fn last_announced(&self) -> Option<String> {
        self.last_announced.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_hit_announces() {
        let debouncer = AlertDebouncer::new(false);
        assert!(debouncer.on_hit("cup", false));
        assert_eq!(debouncer.last_announced().as_deref(), Some("cup"));
    }

    #[test]
    fn test_repeated_hits_announce_once() {
        let debouncer = AlertDebouncer::new(false);
        let fired: usize = (0..10)
            .map(|_| debouncer.on_hit("cup", false) as usize)
            .sum();
        assert_eq!(fired, 1);
    }

    #[test]
    fn test_label_change_reannounces() {
        let debouncer = AlertDebouncer::new(false);
        let sequence = ["cup", "cup", "dog", "dog"];
        let fired: Vec<&str> = sequence
            .iter()
            .filter(|label| debouncer.on_hit(label, false))
            .copied()
            .collect();
        assert_eq!(fired, vec!["cup", "dog"]);
    }

    #[test]
    fn test_busy_actuator_suppresses() {
        let debouncer = AlertDebouncer::new(false);
        assert!(!debouncer.on_hit("cup", true));
        // The suppressed hit must not have been recorded
        assert_eq!(debouncer.last_announced(), None);
        assert!(debouncer.on_hit("cup", false));
    }

    #[test]
    fn test_miss_keeps_label_by_default() {
        let debouncer = AlertDebouncer::new(false);
        assert!(debouncer.on_hit("cup", false));
        debouncer.on_miss();
        // Same object re-entering stays silent
        assert!(!debouncer.on_hit("cup", false));
    }

    #[test]
    fn test_miss_clears_label_when_configured() {
        let debouncer = AlertDebouncer::new(true);
        assert!(debouncer.on_hit("cup", false));
        debouncer.on_miss();
        assert_eq!(debouncer.last_announced(), None);
        assert!(debouncer.on_hit("cup", false));
    }

    #[test]
    fn test_alternating_labels() {
        let debouncer = AlertDebouncer::new(false);
        assert!(debouncer.on_hit("cup", false));
        assert!(debouncer.on_hit("dog", false));
        assert!(debouncer.on_hit("cup", false));
    }
}
