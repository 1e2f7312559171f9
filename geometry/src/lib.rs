//! Geometry primitives for casting rays into a world mesh.

mod basis;
mod camera;
mod plane;
mod ray;
mod transform;

pub use basis::*;
pub use camera::*;
pub use plane::*;
pub use ray::*;
pub use transform::*;

pub const EPSILON: f64 = f64::EPSILON;

pub type Vector3 = glam::DVec3;
pub type Matrix3 = glam::DMat3;
pub type Quaternion = glam::DQuat;
