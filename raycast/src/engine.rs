use std::{
    fmt, mem,
    sync::{Arc, Weak},
    time::Duration,
};

use log::trace;
use parking_lot::Mutex;
use rand::{SeedableRng, rngs::StdRng};
use worldcast_geometry::Vector3;
use worldcast_timing::{Scheduler, TimerHandle};

use crate::{
    Aggregation, CameraRig, CastMode, CastOptions, CastResult, ConfigurationError,
    DEFAULT_LOOP_DELAY, Diagnostics, Environment, HitSample, HitTestSession, Tuning, aggregate,
    direction,
};

/// Receives the result of every completed cast, `None` for a reported miss.
pub type CastCallback = Box<dyn FnMut(Option<CastResult>) + Send>;

/// Casts rays from the environment's camera into the world mesh.
///
/// At most one cast is in flight at any time. Requests to cast while one is in flight are
/// ignored, which makes it safe to call [`start`](Self::start) repeatedly.
///
/// Dropping the engine closes its session. Pending retries, loop iterations and queries that
/// complete later are ignored.
pub struct RayCastEngine {
    inner: Arc<Inner>,
}

impl fmt::Debug for RayCastEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("RayCastEngine")
            .field("id", &self.inner.id)
            .field("mode", &state.mode)
            .field("options", &state.options)
            .field("started", &state.started)
            .field("ready", &state.ready)
            .field("session_open", &state.session_open)
            .finish()
    }
}

struct Inner {
    id: u32,
    camera: Arc<dyn CameraRig>,
    session: Arc<dyn HitTestSession>,
    scheduler: Arc<dyn Scheduler>,
    diagnostics: Diagnostics,
    state: Mutex<State>,
}

struct State {
    options: CastOptions,
    tuning: Tuning,
    mode: CastMode,
    /// The direction of the latest cast.
    direction: Vector3,
    callback: Option<CastCallback>,

    session_open: bool,
    /// Between the first cast and `stop()`.
    started: bool,
    /// `false` while a cast is in flight.
    ready: bool,

    /// Identifies the current cast. Query completions of other casts are ignored.
    batch: u64,
    expected_samples: usize,
    samples: Vec<Option<HitSample>>,

    /// Scheduled retries and loop iterations that are still alive.
    continuations: Vec<(u64, TimerHandle)>,
    next_continuation: u64,

    rng: StdRng,
}

impl RayCastEngine {
    pub fn new(environment: &Environment, options: CastOptions) -> Self {
        let inner = Inner {
            id: environment.allocate_engine_id(),
            camera: environment.camera().clone(),
            session: environment.world_query().create_session(),
            scheduler: environment.scheduler().clone(),
            diagnostics: environment.diagnostics().clone(),
            state: Mutex::new(State {
                options,
                tuning: Tuning::default(),
                mode: CastMode::default(),
                direction: Vector3::ZERO,
                callback: None,
                session_open: false,
                started: false,
                ready: true,
                batch: 0,
                expected_samples: 0,
                samples: Vec::new(),
                continuations: Vec::new(),
                next_continuation: 0,
                rng: StdRng::from_entropy(),
            }),
        };
        inner.log(format_args!("Initialized!"));
        Self {
            inner: Arc::new(inner),
        }
    }

    /// Replace the cast constants. Fails if `tuning` does not validate.
    pub fn with_tuning(self, tuning: Tuning) -> Result<Self, ConfigurationError> {
        tuning.validate()?;
        self.inner.state.lock().tuning = tuning;
        Ok(self)
    }

    /// Makes random directions reproducible.
    pub fn with_seed(self, seed: u64) -> Self {
        self.inner.state.lock().rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn id(&self) -> u32 {
        self.inner.id
    }

    /// Cast along the camera's forward vector.
    pub fn cast_forward(
        &self,
        callback: impl FnMut(Option<CastResult>) + Send + 'static,
    ) -> &Self {
        self.cast(CastMode::Forward, Box::new(callback))
    }

    /// Cast in a random direction around the camera's forward vector.
    pub fn cast_random(&self, callback: impl FnMut(Option<CastResult>) + Send + 'static) -> &Self {
        self.cast(CastMode::Random, Box::new(callback))
    }

    /// Cast along `direction`. Like the camera's forward vector, the direction points away from
    /// the surfaces that are probed.
    pub fn cast_direction(
        &self,
        direction: impl Into<Vector3>,
        callback: impl FnMut(Option<CastResult>) + Send + 'static,
    ) -> &Self {
        self.cast(CastMode::Direction(direction.into()), Box::new(callback))
    }

    fn cast(&self, mode: CastMode, callback: CastCallback) -> &Self {
        {
            let mut state = self.inner.state.lock();
            state.set_mode(mode);
            state.callback = Some(callback);
        }
        self.start()
    }

    /// Replace the callback without changing the mode or starting a cast.
    pub fn set_callback(
        &self,
        callback: impl FnMut(Option<CastResult>) + Send + 'static,
    ) -> &Self {
        self.inner.state.lock().callback = Some(Box::new(callback));
        self
    }

    /// Change the mode used by the next cast without starting one.
    pub fn set_mode(&self, mode: CastMode) -> &Self {
        self.inner.state.lock().set_mode(mode);
        self
    }

    pub fn mode(&self) -> CastMode {
        self.inner.state.lock().mode
    }

    /// The direction of the latest cast.
    pub fn direction(&self) -> Vector3 {
        self.inner.state.lock().direction
    }

    pub fn options(&self) -> CastOptions {
        self.inner.state.lock().options.clone()
    }

    /// Cast repeatedly, waiting `delay` after each completed cast.
    pub fn loop_every(&self, delay: Duration) -> &Self {
        {
            let mut state = self.inner.state.lock();
            state.options.is_looping = true;
            state.options.set_loop_delay(delay);
        }
        self.start()
    }

    /// Cast repeatedly with [`DEFAULT_LOOP_DELAY`] between casts.
    pub fn looping(&self) -> &Self {
        self.loop_every(DEFAULT_LOOP_DELAY)
    }

    /// Issue a cast unless one is in flight.
    pub fn start(&self) -> &Self {
        self.inner.issue_cast();
        self
    }

    /// Cancel pending retries and loop iterations and close the session.
    ///
    /// Results of queries that are still in flight are ignored.
    pub fn stop(&self) -> &Self {
        self.inner.stop();
        self
    }

    /// `true` if no cast is in flight.
    pub fn is_ready(&self) -> bool {
        self.inner.state.lock().ready
    }

    pub fn is_running(&self) -> bool {
        self.inner.state.lock().started
    }

    pub fn is_session_open(&self) -> bool {
        self.inner.state.lock().session_open
    }
}

impl State {
    fn set_mode(&mut self, mode: CastMode) {
        if let CastMode::Direction(dir) = mode {
            self.direction = dir;
        }
        self.mode = mode;
    }

    fn aggregation(&self) -> Aggregation {
        if self.options.average_multiple_samples {
            Aggregation::Average {
                miss_tolerance: self.tuning.aux_miss_tolerance,
            }
        } else {
            Aggregation::Single
        }
    }
}

impl Inner {
    fn issue_cast(self: &Arc<Self>) {
        let pose = self.camera.pose();

        let (open_session, batch, segments) = {
            let mut guard = self.state.lock();
            let state = &mut *guard;
            if !state.ready {
                return;
            }

            let open_session = !state.session_open;
            state.session_open = true;
            state.started = true;
            state.ready = false;
            state.batch += 1;
            state.samples.clear();

            let dir = direction::resolve(
                state.mode,
                &pose,
                state.options.ignore_vertical_tilt,
                state.tuning.random_range,
                &mut state.rng,
            );
            let segments: Vec<_> =
                direction::fan_out(dir, state.options.average_multiple_samples, &state.tuning)
                    .into_iter()
                    .map(|dir| direction::segment(pose.position, dir, &state.tuning))
                    .collect();

            state.direction = dir;
            state.expected_samples = segments.len();
            (open_session, state.batch, segments)
        };

        if open_session {
            trace!("Raycaster {}: Starting hit test session", self.id);
            self.session.start();
        }

        self.log(format_args!("Casting {} ray(s)", segments.len()));

        for segment in segments {
            // A synchronously completing session may have finished or stopped this cast already.
            if !self.is_current(batch) {
                break;
            }
            trace!(
                "Raycaster {}: Hit test from {} to {}",
                self.id, segment.start, segment.end
            );
            let weak = Arc::downgrade(self);
            self.session.hit_test(
                segment,
                Box::new(move |hit| {
                    if let Some(inner) = weak.upgrade() {
                        inner.on_sample(batch, hit);
                    }
                }),
            );
        }
    }

    fn is_current(&self, batch: u64) -> bool {
        let state = self.state.lock();
        state.started && state.batch == batch
    }

    fn on_sample(self: &Arc<Self>, batch: u64, hit: Option<HitSample>) {
        let camera_position = self.camera.pose().position;

        let (result, retry) = {
            let mut state = self.state.lock();
            if !state.started || state.batch != batch {
                trace!("Raycaster {}: Ignoring a stale hit test result", self.id);
                return;
            }
            state.samples.push(hit);
            if state.samples.len() < state.expected_samples {
                return;
            }
            let samples = mem::take(&mut state.samples);
            (
                aggregate(&samples, state.aggregation(), camera_position),
                state.options.retry_on_miss,
            )
        };

        match result {
            Some(result) => self.finish(batch, Some(result)),
            None if retry => self.retry(),
            None => self.finish(batch, None),
        }
    }

    fn retry(self: &Arc<Self>) {
        let delay = {
            let mut state = self.state.lock();
            if !state.started {
                return;
            }
            state.ready = true;
            state.tuning.retry_delay()
        };

        self.log(format_args!(
            "Raycast Missed! - retrying in {} seconds",
            delay.as_secs_f64()
        ));
        self.schedule_cast(delay);
    }

    /// Deliver the result of the cast `batch` and continue with the next one, or stop.
    fn finish(self: &Arc<Self>, batch: u64, result: Option<CastResult>) {
        let callback = {
            let mut state = self.state.lock();
            if !state.started {
                return;
            }
            state.callback.take()
        };

        match &result {
            Some(result) => self.log(format_args!(
                "Raycast Hit! pos: {} norm: {} midpoint: {}",
                result.position, result.normal, result.midpoint
            )),
            None => self.log(format_args!("Raycast Missed!")),
        }

        if let Some(mut callback) = callback {
            callback(result);
            let mut state = self.state.lock();
            // Keep a callback that was set from inside the callback.
            if state.callback.is_none() {
                state.callback = Some(callback);
            }
        }

        let next = {
            let mut state = self.state.lock();
            // The callback may have stopped the engine or started another cast.
            if !state.started || state.batch != batch {
                return;
            }
            state.ready = true;
            state
                .options
                .is_looping
                .then(|| state.options.loop_delay())
        };

        match next {
            Some(delay) => self.schedule_cast(delay),
            None => self.stop(),
        }
    }

    fn schedule_cast(self: &Arc<Self>, delay: Duration) {
        let key = {
            let mut state = self.state.lock();
            state.next_continuation += 1;
            state.next_continuation
        };

        let weak: Weak<Self> = Arc::downgrade(self);
        let handle = self.scheduler.schedule_once(
            delay,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.resume(key);
                }
            }),
        );

        let alive = {
            let mut state = self.state.lock();
            if state.started {
                state.continuations.push((key, handle));
            }
            state.started
        };
        if !alive {
            self.scheduler.cancel(handle);
        }
    }

    fn resume(self: &Arc<Self>, key: u64) {
        {
            let mut state = self.state.lock();
            let Some(index) = state.continuations.iter().position(|(k, _)| *k == key) else {
                trace!("Raycaster {}: Ignoring a canceled continuation", self.id);
                return;
            };
            state.continuations.swap_remove(index);
            if !state.started {
                return;
            }
        }
        self.issue_cast();
    }

    fn stop(&self) {
        let (continuations, close_session) = {
            let mut state = self.state.lock();
            state.started = false;
            state.ready = true;
            state.batch += 1;
            state.samples.clear();
            (
                mem::take(&mut state.continuations),
                mem::replace(&mut state.session_open, false),
            )
        };

        for (_, handle) in continuations {
            self.scheduler.cancel(handle);
        }
        if close_session {
            trace!("Raycaster {}: Stopping hit test session", self.id);
            self.session.stop();
        }
    }

    fn log(&self, message: fmt::Arguments<'_>) {
        self.diagnostics.log(self.id, message);
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        let state = self.state.get_mut();
        for (_, handle) in state.continuations.drain(..) {
            self.scheduler.cancel(handle);
        }
        if state.session_open {
            self.session.stop();
        }
    }
}
