use worldcast_geometry::Vector3;

/// A surface hit reported by a single query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitSample {
    pub position: Vector3,
    pub normal: Vector3,
}

impl HitSample {
    pub fn new(position: impl Into<Vector3>, normal: impl Into<Vector3>) -> Self {
        Self {
            position: position.into(),
            normal: normal.into(),
        }
    }
}

/// The result of a logical cast as delivered to the callback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CastResult {
    pub position: Vector3,
    pub normal: Vector3,
    /// The average of the camera position and the hit position.
    pub midpoint: Vector3,
}

impl CastResult {
    pub fn new(position: Vector3, normal: Vector3, camera_position: Vector3) -> Self {
        Self {
            position,
            normal,
            midpoint: (camera_position + position) * 0.5,
        }
    }
}

/// How the samples of one cast are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregation {
    /// Only the first sample counts.
    Single,
    /// Average all hits, unless more than `miss_tolerance` samples missed.
    Average { miss_tolerance: usize },
}

/// Combine the samples of a cast. `None` is an overall miss.
///
/// The order of the samples does not matter.
pub fn aggregate(
    samples: &[Option<HitSample>],
    aggregation: Aggregation,
    camera_position: Vector3,
) -> Option<CastResult> {
    match aggregation {
        Aggregation::Single => {
            let hit = samples.first()?.as_ref()?;
            Some(CastResult::new(hit.position, hit.normal, camera_position))
        }
        Aggregation::Average { miss_tolerance } => {
            let misses = samples.iter().filter(|s| s.is_none()).count();
            if misses > miss_tolerance {
                return None;
            }
            let hits = samples.len() - misses;
            if hits == 0 {
                return None;
            }
            let (position_sum, normal_sum) = samples.iter().flatten().fold(
                (Vector3::ZERO, Vector3::ZERO),
                |(position, normal), hit| (position + hit.position, normal + hit.normal),
            );
            let count = hits as f64;
            Some(CastResult::new(
                position_sum / count,
                normal_sum / count,
                camera_position,
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    const AVERAGE: Aggregation = Aggregation::Average { miss_tolerance: 2 };

    fn hit(x: f64) -> Option<HitSample> {
        Some(HitSample::new((x, 0.0, -10.0), (0.0, 0.0, 1.0)))
    }

    #[test]
    fn single_sample_is_taken_verbatim() {
        let camera = Vector3::new(0.1, 1.7, 0.3);
        let sample = HitSample::new((0.3, -0.7, -12.9), (0.0, 1.0, 0.0));
        let result = aggregate(&[Some(sample)], Aggregation::Single, camera).unwrap();
        assert_eq!(result.position, sample.position);
        assert_eq!(result.normal, sample.normal);
        assert_eq!(result.midpoint, (camera + sample.position) * 0.5);
    }

    #[test]
    fn single_miss_is_a_miss() {
        assert_eq!(aggregate(&[None], Aggregation::Single, Vector3::ZERO), None);
        assert_eq!(aggregate(&[], Aggregation::Single, Vector3::ZERO), None);
    }

    #[test]
    fn averaging_ignores_tolerated_misses() {
        for misses in 0..=2 {
            let mut samples: Vec<_> = (0..9 - misses).map(|i| hit(i as f64)).collect();
            samples.extend((0..misses).map(|_| None));
            let hits = 9 - misses;
            let expected_x = (0..hits).sum::<usize>() as f64 / hits as f64;

            let result = aggregate(&samples, AVERAGE, Vector3::ZERO).unwrap();
            assert_abs_diff_eq!(
                result.position,
                Vector3::new(expected_x, 0.0, -10.0),
                epsilon = 1e-12
            );
            assert_abs_diff_eq!(result.normal, Vector3::Z, epsilon = 1e-12);
        }
    }

    #[test]
    fn averaging_fails_beyond_tolerance() {
        let mut samples: Vec<_> = (0..6).map(|i| hit(i as f64)).collect();
        samples.extend([None, None, None]);
        assert_eq!(aggregate(&samples, AVERAGE, Vector3::ZERO), None);
    }

    #[test]
    fn averaging_is_order_independent() {
        let mut samples = vec![hit(1.0), None, hit(2.0), hit(6.0), None];
        let forward = aggregate(&samples, AVERAGE, Vector3::ZERO);
        samples.reverse();
        assert_eq!(forward, aggregate(&samples, AVERAGE, Vector3::ZERO));
        assert_abs_diff_eq!(forward.unwrap().position.x, 3.0, epsilon = 1e-12);
    }

    #[test]
    fn midpoint_averages_camera_and_hit() {
        let result = aggregate(&[hit(0.0)], AVERAGE, Vector3::new(0.0, 2.0, 0.0)).unwrap();
        assert_eq!(result.midpoint, Vector3::new(0.0, 1.0, -5.0));
    }
}
