use crate::{Basis, Matrix3, Quaternion, Vector3};

/// Placement of an object in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translate: Vector3,
    pub rotate: Quaternion,
}

impl Transform {
    /// A transform at `translate` whose local `+Z` points along `forward`, with local `+Y` as
    /// close to `up` as possible.
    ///
    /// If `forward` and `up` are parallel, an arbitrary perpendicular up vector is chosen.
    pub fn looking_along(
        translate: impl Into<Vector3>,
        forward: impl Into<Vector3>,
        up: impl Into<Vector3>,
    ) -> Self {
        let z = forward.into().normalize_or_zero();
        let x = match up.into().cross(z).try_normalize() {
            Some(x) => x,
            None => Basis::around(z).right,
        };
        let y = z.cross(x);
        Self {
            translate: translate.into(),
            rotate: Quaternion::from_mat3(&Matrix3::from_cols(x, y, z)),
        }
    }

    /// Rotate a local direction into world space.
    pub fn transform_vector(&self, vector: Vector3) -> Vector3 {
        self.rotate * vector
    }
}
