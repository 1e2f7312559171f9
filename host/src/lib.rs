//! A simulated host for raycast engines.
//!
//! Stands in for a spatial computing runtime: a [`SimulatedWorld`] of surfaces answers hit tests
//! asynchronously, a [`RigCamera`] provides the tracked pose, and [`Host::frame`] drives query
//! delivery and timers the way a render loop would.

mod camera;
mod host;
mod markers;
mod query;
mod world;

pub use camera::*;
pub use host::*;
pub use markers::*;
pub use query::*;
pub use world::*;
