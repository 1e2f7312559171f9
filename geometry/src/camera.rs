use log::warn;

use crate::Vector3;

/// The world space pose of a tracked camera.
///
/// Detail: `forward` follows the lens convention and points out of the back of the camera, toward
/// the viewer. The camera looks along `-forward`, which is why rays are cast backward along the
/// direction vectors derived from it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vector3,
    pub forward: Vector3,
    pub right: Vector3,
    pub up: Vector3,
}

impl Default for CameraPose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl CameraPose {
    /// A camera at the origin that looks down `-Z`.
    pub const IDENTITY: Self = Self {
        position: Vector3::ZERO,
        forward: Vector3::Z,
        right: Vector3::X,
        up: Vector3::Y,
    };

    pub fn new(position: impl Into<Vector3>) -> Self {
        Self {
            position: position.into(),
            ..Self::IDENTITY
        }
    }

    /// A camera at `position` whose view direction is `view_dir`, i.e. whose `forward` is
    /// `-view_dir`. `world_up` is used to derive the right and up vectors.
    pub fn looking(
        position: impl Into<Vector3>,
        view_dir: impl Into<Vector3>,
        world_up: impl Into<Vector3>,
    ) -> Option<Self> {
        let forward = (-view_dir.into()).try_normalize()?;
        let right = world_up.into().cross(forward).try_normalize()?;
        let up = forward.cross(right);
        Some(Self {
            position: position.into(),
            forward,
            right,
            up,
        })
    }

    /// The forward vector, optionally with the vertical component removed.
    ///
    /// When the forward vector is vertical, flattening would produce a zero vector. In that case
    /// the unflattened forward vector is returned.
    pub fn forward(&self, ignore_vertical_tilt: bool) -> Vector3 {
        if !ignore_vertical_tilt {
            return self.forward;
        }
        let flattened = Vector3::new(self.forward.x, 0.0, self.forward.z);
        match flattened.try_normalize() {
            Some(forward) => forward,
            None => {
                warn!("Camera looks straight up or down, keeping its vertical tilt");
                self.forward
            }
        }
    }
}
