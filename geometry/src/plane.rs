use crate::Vector3;

// Plane defined by a point and outward normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub point: Vector3,
    pub normal: Vector3,
}

impl Plane {
    pub fn new(point: impl Into<Vector3>, normal: impl Into<Vector3>) -> Self {
        Self {
            point: point.into(),
            normal: normal.into().normalize_or_zero(),
        }
    }

    /// Signed distance of `point` from the plane, positive on the side the normal points to.
    pub fn signed_distance(&self, point: Vector3) -> f64 {
        self.normal.dot(point - self.point)
    }
}
