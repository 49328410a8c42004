//! Multi-object tracking across inference cycles

use drishti_core::Detection;
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::debug;

/// Upper bound on live tracks; oldest are evicted past this
const MAX_TRACKS: usize = 256;

/// Tracked object with a stable id
#[derive(Debug, Clone)]
pub struct TrackedObject {
    pub id: u64,
    pub detection: Detection,
    /// Cycles since this track last matched a detection
    pub age: u32,
}

/// Associates detections across cycles by IoU so overlay boxes keep a
/// stable identity while an object stays in view
pub struct ObjectTracker {
    next_id: RwLock<u64>,
    tracks: RwLock<HashMap<u64, TrackedObject>>,
    max_age: u32,
    iou_threshold: f32,
}

impl ObjectTracker {
    /// Create a new object tracker
    pub fn new(max_age: u32, iou_threshold: f32) -> Self {
        Self {
            next_id: RwLock::new(1),
            tracks: RwLock::new(HashMap::new()),
            max_age,
            iou_threshold,
        }
    }

    /// Update the tracker with one cycle's detections. Returns the
    /// matched-or-created track for each input detection, in input
    /// order.
    pub fn update(&self, detections: &[Detection]) -> Vec<TrackedObject> {
        let mut tracks = self.tracks.write();
        let mut next_id = self.next_id.write();

        // Age every existing track first; matches below reset to zero
        for track in tracks.values_mut() {
            track.age += 1;
        }

        let mut assigned: Vec<TrackedObject> = Vec::with_capacity(detections.len());
        for detection in detections {
            let mut best_match: Option<(u64, f32)> = None;
            for (track_id, track) in tracks.iter() {
                // A track can absorb one detection per cycle
                if track.age == 0 {
                    continue;
                }
                let iou = detection.rect.iou(&track.detection.rect);
                if iou > self.iou_threshold
                    && best_match.map(|(_, best)| iou > best).unwrap_or(true)
                {
                    best_match = Some((*track_id, iou));
                }
            }

            let id = match best_match {
                Some((track_id, _)) => {
                    if let Some(track) = tracks.get_mut(&track_id) {
                        track.detection = detection.clone();
                        track.age = 0;
                    }
                    track_id
                }
                None => {
                    let id = *next_id;
                    *next_id = next_id.wrapping_add(1).max(1);
                    tracks.insert(
                        id,
                        TrackedObject {
                            id,
                            detection: detection.clone(),
                            age: 0,
                        },
                    );
                    id
                }
            };

            assigned.push(tracks[&id].clone());
        }

        // Evict stale tracks, then clamp the table size
        tracks.retain(|_, track| track.age <= self.max_age);
        if tracks.len() > MAX_TRACKS {
            let mut by_age: Vec<(u64, u32)> =
                tracks.iter().map(|(id, track)| (*id, track.age)).collect();
            by_age.sort_by_key(|(_, age)| std::cmp::Reverse(*age));
            for (id, _) in by_age.iter().take(tracks.len() - MAX_TRACKS) {
                tracks.remove(id);
            }
        }

        debug!("Tracking {} objects", tracks.len());
        assigned
    }

    /// All live tracks, including ones coasting without a match
    pub fn active_tracks(&self) -> Vec<TrackedObject> {
        self.tracks.read().values().cloned().collect()
    }
}
