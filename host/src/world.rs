use worldcast_geometry::{Plane, Segment, Vector3};
use worldcast_raycast::HitSample;

/// A flat surface of the simulated world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surface {
    pub plane: Plane,
    /// Hits farther than this from the plane's point miss.
    pub radius: f64,
}

impl Surface {
    /// A disc around `center`.
    pub fn disc(center: impl Into<Vector3>, normal: impl Into<Vector3>, radius: f64) -> Self {
        Self {
            plane: Plane::new(center, normal),
            radius,
        }
    }

    pub fn unbounded(point: impl Into<Vector3>, normal: impl Into<Vector3>) -> Self {
        Self::disc(point, normal, f64::INFINITY)
    }

    /// An unbounded horizontal surface at `height`.
    pub fn floor(height: f64) -> Self {
        Self::unbounded((0.0, height, 0.0), Vector3::Y)
    }

    /// Distance from the start of `segment` to where it hits this surface.
    pub fn hit_distance(&self, segment: &Segment) -> Option<f64> {
        let t = segment.plane_distance(&self.plane)?;
        let point = segment.ray()?.at(t);
        (point.distance(self.plane.point) <= self.radius).then_some(t)
    }
}

/// The surfaces a hit test can find.
#[derive(Debug, Clone, Default)]
pub struct SimulatedWorld {
    surfaces: Vec<Surface>,
}

impl SimulatedWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_surface(mut self, surface: Surface) -> Self {
        self.add_surface(surface);
        self
    }

    pub fn add_surface(&mut self, surface: Surface) {
        self.surfaces.push(surface);
    }

    /// The nearest surface along `segment`.
    ///
    /// The reported normal faces the start of the segment, no matter which side of the surface
    /// was hit.
    pub fn hit_test(&self, segment: &Segment) -> Option<HitSample> {
        let ray = segment.ray()?;
        let (t, surface) = self
            .surfaces
            .iter()
            .filter_map(|surface| Some((surface.hit_distance(segment)?, surface)))
            .min_by(|(a, _), (b, _)| a.total_cmp(b))?;

        let normal = if surface.plane.signed_distance(segment.start) < 0.0 {
            -surface.plane.normal
        } else {
            surface.plane.normal
        };
        Some(HitSample::new(ray.at(t), normal))
    }
}
