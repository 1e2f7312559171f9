use std::collections::VecDeque;

use worldcast_geometry::{Transform, Vector3};
use worldcast_raycast::CastResult;

/// Default number of markers kept.
pub const MAX_MARKERS: usize = 256;

/// Markers placed at hit positions, oriented along the hit normals.
///
/// Holds at most `capacity` markers, placing one more evicts the oldest.
#[derive(Debug, Clone)]
pub struct HitMarkers {
    markers: VecDeque<Transform>,
    capacity: usize,
}

impl Default for HitMarkers {
    fn default() -> Self {
        Self::with_capacity(MAX_MARKERS)
    }
}

impl HitMarkers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            markers: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Place a marker at the hit position whose local `+Z` follows the hit normal.
    pub fn place(&mut self, result: &CastResult) -> Transform {
        let marker = Transform::looking_along(result.position, result.normal, Vector3::Y);
        if self.capacity == 0 {
            return marker;
        }
        if self.markers.len() == self.capacity {
            self.markers.pop_front();
        }
        self.markers.push_back(marker);
        marker
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Transform> {
        self.markers.iter()
    }

    pub fn latest(&self) -> Option<&Transform> {
        self.markers.back()
    }
}
