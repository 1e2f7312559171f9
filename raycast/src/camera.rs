use std::sync::Arc;

use worldcast_geometry::CameraPose;

/// The tracking capability attached to a camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tracking {
    None,
    /// The device's own 6DoF tracking.
    Device,
    /// Tracking relative to a geographic location.
    DeviceLocation,
}

impl Tracking {
    pub fn is_tracked(self) -> bool {
        !matches!(self, Tracking::None)
    }
}

/// A camera whose pose is tracked by the host.
pub trait CameraRig: Send + Sync {
    /// The current world pose. Read whenever a cast is issued or aggregated.
    fn pose(&self) -> CameraPose;

    fn tracking(&self) -> Tracking;
}

/// Finds a camera in the host's scene when none is supplied explicitly.
pub trait CameraLookup {
    fn find_camera(&self) -> Option<Arc<dyn CameraRig>>;
}

/// A scene without cameras.
impl CameraLookup for () {
    fn find_camera(&self) -> Option<Arc<dyn CameraRig>> {
        None
    }
}

/// The first camera in the list.
impl CameraLookup for Vec<Arc<dyn CameraRig>> {
    fn find_camera(&self) -> Option<Arc<dyn CameraRig>> {
        self.first().cloned()
    }
}
