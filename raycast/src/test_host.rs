//! Test doubles for the host collaborators.

use std::{
    mem,
    sync::Arc,
    time::{Duration, Instant},
};

use parking_lot::Mutex;
use worldcast_geometry::{CameraPose, Segment};
use worldcast_timing::Timers;

use crate::{
    CameraRig, CastOptions, CastResult, Environment, HitSample, HitTestSession, QueryCompletion,
    RayCastEngine, Tracking, WorldQuery,
};

pub struct TestCamera {
    pub pose: Mutex<CameraPose>,
    tracking: Tracking,
}

impl TestCamera {
    pub fn with_tracking(tracking: Tracking) -> Arc<Self> {
        Arc::new(Self {
            pose: Mutex::new(CameraPose::IDENTITY),
            tracking,
        })
    }
}

impl CameraRig for TestCamera {
    fn pose(&self) -> CameraPose {
        *self.pose.lock()
    }

    fn tracking(&self) -> Tracking {
        self.tracking
    }
}

/// Creates [`ScriptedSession`]s and keeps them around for inspection.
#[derive(Default)]
pub struct ScriptedWorld {
    pub sessions: Mutex<Vec<Arc<ScriptedSession>>>,
}

impl WorldQuery for ScriptedWorld {
    fn create_session(&self) -> Arc<dyn HitTestSession> {
        let session = Arc::new(ScriptedSession::default());
        self.sessions.lock().push(session.clone());
        session
    }
}

/// A session that holds on to all queries until the test resolves them.
#[derive(Default)]
pub struct ScriptedSession {
    state: Mutex<SessionState>,
}

#[derive(Default)]
struct SessionState {
    running: bool,
    starts: usize,
    stops: usize,
    issued: Vec<Segment>,
    pending: Vec<QueryCompletion>,
}

impl ScriptedSession {
    pub fn is_running(&self) -> bool {
        self.state.lock().running
    }

    pub fn starts(&self) -> usize {
        self.state.lock().starts
    }

    pub fn stops(&self) -> usize {
        self.state.lock().stops
    }

    /// All segments queried so far.
    pub fn issued(&self) -> Vec<Segment> {
        self.state.lock().issued.clone()
    }

    pub fn pending(&self) -> usize {
        self.state.lock().pending.len()
    }

    /// Complete every pending query with the result of `f`, in the order they were issued.
    pub fn resolve_all(&self, mut f: impl FnMut(usize) -> Option<HitSample>) {
        let pending = mem::take(&mut self.state.lock().pending);
        for (index, completion) in pending.into_iter().enumerate() {
            completion(f(index));
        }
    }

    /// Complete every pending query with the same result.
    pub fn resolve_with(&self, hit: Option<HitSample>) {
        self.resolve_all(|_| hit);
    }

    /// Complete the pending queries in reverse order. `f` receives the issue index.
    pub fn resolve_reversed(&self, mut f: impl FnMut(usize) -> Option<HitSample>) {
        let pending = mem::take(&mut self.state.lock().pending);
        for (index, completion) in pending.into_iter().enumerate().rev() {
            completion(f(index));
        }
    }
}

impl HitTestSession for ScriptedSession {
    fn start(&self) {
        let mut state = self.state.lock();
        state.running = true;
        state.starts += 1;
    }

    fn stop(&self) {
        let mut state = self.state.lock();
        state.running = false;
        state.stops += 1;
    }

    fn hit_test(&self, segment: Segment, on_complete: QueryCompletion) {
        let mut state = self.state.lock();
        state.issued.push(segment);
        state.pending.push(on_complete);
    }
}

/// An environment made of test doubles with a manually advanced clock.
pub struct Harness {
    pub camera: Arc<TestCamera>,
    pub world: Arc<ScriptedWorld>,
    pub timers: Arc<Timers>,
    pub environment: Environment,
    pub now: Instant,
}

impl Harness {
    pub fn new() -> Self {
        let camera = TestCamera::with_tracking(Tracking::Device);
        let world = Arc::new(ScriptedWorld::default());
        let timers = Arc::new(Timers::new());
        let now = Instant::now();
        timers.tick(now);

        let environment = Environment::resolve(
            Some(camera.clone()),
            &(),
            world.clone(),
            timers.clone(),
        )
        .unwrap();

        Self {
            camera,
            world,
            timers,
            environment,
            now,
        }
    }

    pub fn engine(&self, options: CastOptions) -> RayCastEngine {
        RayCastEngine::new(&self.environment, options).with_seed(42)
    }

    pub fn session(&self, index: usize) -> Arc<ScriptedSession> {
        self.world.sessions.lock()[index].clone()
    }

    /// Advance the clock and tick the timers.
    pub fn advance(&mut self, duration: Duration) {
        self.now += duration;
        self.timers.tick(self.now);
    }

    /// Tick the timers without advancing the clock.
    pub fn tick(&self) {
        self.timers.tick(self.now);
    }
}

pub type Results = Arc<Mutex<Vec<Option<CastResult>>>>;

/// A callback that records its results.
pub fn recorder() -> (Results, impl FnMut(Option<CastResult>) + Send + 'static) {
    let results: Results = Default::default();
    let r = results.clone();
    (results, move |result| r.lock().push(result))
}
