//! Per-cycle detection processing stages

pub mod filter;
pub mod hittest;
pub mod tracker;

pub use filter::{filter_detections, map_to_frame};
pub use hittest::find_hit;
pub use tracker::{ObjectTracker, TrackedObject};
