use parking_lot::Mutex;
use worldcast_geometry::{CameraPose, Quaternion, Vector3};
use worldcast_raycast::{CameraRig, Tracking};

/// A camera whose pose is set by the host, standing in for a device tracked camera.
#[derive(Debug)]
pub struct RigCamera {
    pose: Mutex<CameraPose>,
    tracking: Mutex<Tracking>,
}

impl RigCamera {
    pub fn new(pose: CameraPose, tracking: Tracking) -> Self {
        Self {
            pose: Mutex::new(pose),
            tracking: Mutex::new(tracking),
        }
    }

    /// A device tracked camera at `position` that looks at `target`. Falls back to the identity
    /// orientation if `target` is straight above or below `position`.
    pub fn looking_at(position: impl Into<Vector3>, target: impl Into<Vector3>) -> Self {
        let position = position.into();
        let pose = CameraPose::looking(position, target.into() - position, Vector3::Y)
            .unwrap_or_else(|| CameraPose::new(position));
        Self::new(pose, Tracking::Device)
    }

    /// Rotate the camera around the vertical axis through its position.
    pub fn turn(&self, radians: f64) {
        let rotation = Quaternion::from_rotation_y(radians);
        let mut pose = self.pose.lock();
        pose.forward = rotation * pose.forward;
        pose.right = rotation * pose.right;
        pose.up = rotation * pose.up;
    }

    pub fn set_tracking(&self, tracking: Tracking) {
        *self.tracking.lock() = tracking;
    }
}

impl CameraRig for RigCamera {
    fn pose(&self) -> CameraPose {
        *self.pose.lock()
    }

    fn tracking(&self) -> Tracking {
        *self.tracking.lock()
    }
}
