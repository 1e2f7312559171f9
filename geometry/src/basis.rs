use crate::Vector3;

/// Above this absolute `y` component, a direction is considered vertical and `X` is used instead
/// of `Y` to build the basis.
pub const VERTICAL_THRESHOLD: f64 = 0.99;

/// Two unit vectors perpendicular to a direction and to each other.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Basis {
    pub right: Vector3,
    pub up: Vector3,
}

impl Basis {
    /// Build a basis around `dir`, which is expected to be normalized.
    ///
    /// `right = dir × Y` (or `dir × X` for nearly vertical directions) and `up = right × dir`.
    pub fn around(dir: Vector3) -> Self {
        let arbitrary = if dir.y.abs() < VERTICAL_THRESHOLD {
            Vector3::Y
        } else {
            Vector3::X
        };
        let right = dir.cross(arbitrary).normalize_or_zero();
        let up = right.cross(dir).normalize_or_zero();
        Self { right, up }
    }

    /// Offset `dir` by `magnitude` at `angle` (radians) around it and renormalize.
    ///
    /// The sine of the angle is applied along `right`, the cosine along `up`.
    pub fn offset(&self, dir: Vector3, angle: f64, magnitude: f64) -> Vector3 {
        let (sin, cos) = angle.sin_cos();
        (dir + self.right * (sin * magnitude) + self.up * (cos * magnitude)).normalize_or_zero()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn basis_is_orthonormal() {
        let dir = Vector3::new(0.3, -0.2, 0.9).normalize();
        let basis = Basis::around(dir);
        assert_abs_diff_eq!(basis.right.length(), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(basis.up.length(), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(basis.right.dot(dir), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(basis.up.dot(dir), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(basis.right.dot(basis.up), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn vertical_direction_uses_x_fallback() {
        let basis = Basis::around(Vector3::Y);
        // Y × X = -Z
        assert_abs_diff_eq!(basis.right, -Vector3::Z, epsilon = 1e-12);
        assert_abs_diff_eq!(basis.up.length(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn zero_angle_offsets_along_up() {
        let basis = Basis::around(Vector3::Z);
        let offset = basis.offset(Vector3::Z, 0.0, 0.02);
        assert_abs_diff_eq!(offset, (Vector3::Z + basis.up * 0.02).normalize(), epsilon = 1e-12);
        assert_abs_diff_eq!(offset.length(), 1.0, epsilon = 1e-12);
    }
}
