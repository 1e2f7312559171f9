//! Resolving the direction of a cast and fanning it out into query segments.

use std::f64::consts::TAU;

use rand::Rng;
use worldcast_geometry::{Basis, CameraPose, Segment, Vector3};

use crate::{CastMode, RandomRange, Tuning};

/// The primary direction of a cast in `mode`.
pub fn resolve(
    mode: CastMode,
    pose: &CameraPose,
    ignore_vertical_tilt: bool,
    range: RandomRange,
    rng: &mut impl Rng,
) -> Vector3 {
    match mode {
        CastMode::Forward => pose.forward(ignore_vertical_tilt),
        CastMode::Random => random(pose, ignore_vertical_tilt, range, rng),
        CastMode::Direction(dir) => dir,
    }
}

/// The (possibly flattened) forward vector, offset along the camera's right and up vectors by
/// uniform amounts in `[-range, range]`.
pub fn random(
    pose: &CameraPose,
    ignore_vertical_tilt: bool,
    range: RandomRange,
    rng: &mut impl Rng,
) -> Vector3 {
    let forward = pose.forward(ignore_vertical_tilt);
    let x = rng.gen_range(-1.0..=1.0) * range.horizontal;
    let y = rng.gen_range(-1.0..=1.0) * range.vertical;
    (forward + pose.right * x + pose.up * y)
        .try_normalize()
        .unwrap_or(forward)
}

/// The directions to query for a cast along `dir`.
///
/// Without averaging this is `dir` as is. With averaging, `dir` is normalized and followed by
/// `tuning.aux_count` directions evenly spaced on a circle around it.
pub fn fan_out(dir: Vector3, averaging: bool, tuning: &Tuning) -> Vec<Vector3> {
    if !averaging {
        return vec![dir];
    }

    let dir = dir.normalize_or_zero();
    let basis = Basis::around(dir);
    let count = tuning.aux_count;

    let mut directions = Vec::with_capacity(count + 1);
    directions.push(dir);
    directions.extend(
        (0..count).map(|i| basis.offset(dir, i as f64 / count as f64 * TAU, tuning.aux_offset)),
    );
    directions
}

/// The segment a query along `dir` probes. It starts `min_distance` and ends `max_distance`
/// behind the camera position, measured along `dir`.
pub fn segment(camera_position: Vector3, dir: Vector3, tuning: &Tuning) -> Segment {
    Segment::backward(
        camera_position,
        dir,
        tuning.min_distance,
        tuning.max_distance,
    )
}
