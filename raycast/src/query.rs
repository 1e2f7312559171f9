use std::sync::Arc;

use worldcast_geometry::Segment;

use crate::HitSample;

/// Receives the result of one hit-test query, `None` if nothing was hit.
pub type QueryCompletion = Box<dyn FnOnce(Option<HitSample>) + Send>;

/// The spatial query service of the host. Creates independent hit-test sessions.
pub trait WorldQuery: Send + Sync {
    fn create_session(&self) -> Arc<dyn HitTestSession>;
}

/// A hit-test session against the world mesh.
///
/// Queries complete asynchronously. Implementations may invoke the completion from inside
/// `hit_test`, but usually deliver it later from the host's frame loop.
pub trait HitTestSession: Send + Sync {
    fn start(&self);

    fn stop(&self);

    /// Probe the world mesh between `segment.start` and `segment.end`.
    fn hit_test(&self, segment: Segment, on_complete: QueryCompletion);
}
