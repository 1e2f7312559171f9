use crate::{Plane, Vector3, EPSILON};

// Ray in 3D space.
#[derive(Debug, Clone)]
pub struct Ray {
    pub origin: Vector3,
    pub dir: Vector3,
}

impl Ray {
    pub fn new(origin: impl Into<Vector3>, dir: impl Into<Vector3>) -> Self {
        Self {
            origin: origin.into(),
            dir: dir.into(),
        }
    }

    pub fn from_points(origin: impl Into<Vector3>, target: impl Into<Vector3>) -> Option<Self> {
        let origin = origin.into();
        let target = target.into();

        let mut dir = target - origin;
        if dir.length_squared() < EPSILON * 1e-6 {
            return None;
        }
        dir = dir.normalize();
        Some(Self::new(origin, dir))
    }

    /// Distance along the ray at which it crosses the plane.
    pub fn plane_distance(&self, plane: &Plane) -> Option<f64> {
        let denom = plane.normal.dot(self.dir);
        if denom.abs() < EPSILON {
            return None;
        }
        let t = plane.normal.dot(plane.point - self.origin) / denom;
        if t < 0.0 {
            return None;
        }
        Some(t)
    }

    pub fn at(&self, t: f64) -> Vector3 {
        self.origin + self.dir * t
    }
}

/// A bounded piece of a ray, from `start` to `end`.
///
/// This is what a hit-test query probes: only surfaces between the two points count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Vector3,
    pub end: Vector3,
}

impl Segment {
    pub fn new(start: impl Into<Vector3>, end: impl Into<Vector3>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// The segment that starts `near` and ends `far` units away from `origin`, walking backward
    /// along `dir`.
    pub fn backward(origin: Vector3, dir: Vector3, near: f64, far: f64) -> Self {
        Self {
            start: origin + dir * -near,
            end: origin + dir * -far,
        }
    }

    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }

    /// `None` if the segment is degenerate.
    pub fn ray(&self) -> Option<Ray> {
        Ray::from_points(self.start, self.end)
    }

    /// Distance from `start` to where the segment crosses the plane.
    pub fn plane_distance(&self, plane: &Plane) -> Option<f64> {
        let t = self.ray()?.plane_distance(plane)?;
        (t <= self.length()).then_some(t)
    }
}
