//! Casting rays from a tracked camera into the world mesh of a spatial query service.
//!
//! A [`RayCastEngine`] owns one hit-test session. Each logical cast issues one query, or a
//! primary query and a ring of auxiliary queries that are averaged. Results are delivered to a
//! callback, misses can be retried automatically, and casts can loop.
//!
//! All collaborators are supplied by the host through an [`Environment`]: the camera, the world
//! query service, the scheduler that runs retries and loop iterations, and an optional
//! diagnostics sink.

mod camera;
mod diagnostics;
pub mod direction;
mod engine;
mod environment;
mod error;
mod mode;
mod options;
mod query;
mod sample;

#[cfg(test)]
mod test_host;

pub use camera::*;
pub use diagnostics::*;
pub use engine::*;
pub use environment::*;
pub use error::*;
pub use mode::*;
pub use options::*;
pub use query::*;
pub use sample::*;

pub use worldcast_geometry as geometry;
pub use worldcast_timing as timing;
