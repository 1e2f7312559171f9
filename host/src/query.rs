use std::{
    iter,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use log::{debug, warn};
use parking_lot::Mutex;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use worldcast_geometry::Segment;
use worldcast_raycast::{HitSample, HitTestSession, QueryCompletion, WorldQuery};

use crate::SimulatedWorld;

struct Completion {
    hit: Option<HitSample>,
    on_complete: QueryCompletion,
}

/// Answers hit tests against a shared [`SimulatedWorld`].
///
/// Results are computed when a query is issued, but like on a device they arrive later: queued
/// completions run in [`deliver`](Self::deliver), which the host calls once per frame.
pub struct SimulatedQuery {
    world: Arc<Mutex<SimulatedWorld>>,
    sender: UnboundedSender<Completion>,
    receiver: Mutex<UnboundedReceiver<Completion>>,
}

impl SimulatedQuery {
    pub fn new(world: Arc<Mutex<SimulatedWorld>>) -> Self {
        let (sender, receiver) = unbounded_channel();
        Self {
            world,
            sender,
            receiver: Mutex::new(receiver),
        }
    }

    /// Run the completions of all queries issued so far and return how many ran.
    ///
    /// Queries issued by the completions themselves are delivered with the next call.
    pub fn deliver(&self) -> usize {
        let completions: Vec<Completion> = {
            let mut receiver = self.receiver.lock();
            iter::from_fn(|| receiver.try_recv().ok()).collect()
        };
        let delivered = completions.len();
        for Completion { hit, on_complete } in completions {
            on_complete(hit);
        }
        delivered
    }
}

impl WorldQuery for SimulatedQuery {
    fn create_session(&self) -> Arc<dyn HitTestSession> {
        Arc::new(SimulatedSession {
            world: self.world.clone(),
            sender: self.sender.clone(),
            running: AtomicBool::new(false),
        })
    }
}

struct SimulatedSession {
    world: Arc<Mutex<SimulatedWorld>>,
    sender: UnboundedSender<Completion>,
    running: AtomicBool,
}

impl HitTestSession for SimulatedSession {
    fn start(&self) {
        debug!("Hit test session started");
        self.running.store(true, Ordering::Release);
    }

    fn stop(&self) {
        debug!("Hit test session stopped");
        self.running.store(false, Ordering::Release);
    }

    fn hit_test(&self, segment: Segment, on_complete: QueryCompletion) {
        let hit = if self.running.load(Ordering::Acquire) {
            self.world.lock().hit_test(&segment)
        } else {
            warn!("Hit test on a stopped session, reporting a miss");
            None
        };

        // The query service may be gone already.
        if self.sender.send(Completion { hit, on_complete }).is_err() {
            debug!("Query service is gone, dropping a hit test result");
        }
    }
}

#[cfg(test)]
mod tests {
    use worldcast_geometry::Vector3;

    use super::*;
    use crate::Surface;

    fn query() -> SimulatedQuery {
        let world = SimulatedWorld::new().with_surface(Surface::unbounded(
            (0.0, 0.0, -100.0),
            Vector3::Z,
        ));
        SimulatedQuery::new(Arc::new(Mutex::new(world)))
    }

    fn recording() -> (Arc<Mutex<Vec<Option<HitSample>>>>, QueryCompletion) {
        let hits: Arc<Mutex<Vec<Option<HitSample>>>> = Default::default();
        let h = hits.clone();
        (hits, Box::new(move |hit| h.lock().push(hit)))
    }

    fn segment() -> Segment {
        Segment::new((0.0, 0.0, -50.0), (0.0, 0.0, -1000.0))
    }

    #[test]
    fn results_arrive_on_delivery() {
        let query = query();
        let session = query.create_session();
        session.start();

        let (hits, completion) = recording();
        session.hit_test(segment(), completion);
        assert!(hits.lock().is_empty());

        assert_eq!(query.deliver(), 1);
        assert!(hits.lock()[0].is_some());
        assert_eq!(query.deliver(), 0);
    }

    #[test]
    fn stopped_sessions_report_misses() {
        let query = query();
        let session = query.create_session();

        let (hits, completion) = recording();
        session.hit_test(segment(), completion);
        query.deliver();

        assert_eq!(*hits.lock(), vec![None]);
    }

    #[test]
    fn queries_issued_during_delivery_wait_for_the_next_one() {
        let query = Arc::new(query());
        let session = query.create_session();
        session.start();

        let (hits, completion) = recording();
        let s = session.clone();
        session.hit_test(
            segment(),
            Box::new(move |hit| {
                completion(hit);
                s.hit_test(segment(), Box::new(|_| {}));
            }),
        );

        assert_eq!(query.deliver(), 1);
        assert_eq!(hits.lock().len(), 1);
        assert_eq!(query.deliver(), 1);
    }
}
