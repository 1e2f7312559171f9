use std::sync::Arc;

use anyhow::Result;
use log::info;
use parking_lot::Mutex;
use worldcast_raycast::{
    CameraRig, ConfigurationError, Diagnostics, DiagnosticsSink, Environment, RayCastEngine,
    RaycastConfig,
};
use worldcast_timing::{Instant, Timers};

use crate::{RigCamera, SimulatedQuery, SimulatedWorld};

/// The runtime side of a simulated session: world, camera, query service and timers.
///
/// Nothing happens on its own. Each [`frame`](Self::frame) first delivers the results of pending
/// hit tests and then runs the timers that are due.
pub struct Host {
    camera: Arc<RigCamera>,
    world: Arc<Mutex<SimulatedWorld>>,
    query: Arc<SimulatedQuery>,
    timers: Arc<Timers>,
    environment: Environment,
    sink: Option<Arc<dyn DiagnosticsSink>>,
}

impl Host {
    /// Fails if the camera has no tracking capability.
    pub fn new(world: SimulatedWorld, camera: RigCamera) -> Result<Self, ConfigurationError> {
        let camera = Arc::new(camera);
        let world = Arc::new(Mutex::new(world));
        let query = Arc::new(SimulatedQuery::new(world.clone()));
        let timers = Arc::new(Timers::new());

        // The camera is found in the scene, like a runtime would.
        let rig: Arc<dyn CameraRig> = camera.clone();
        let scene = vec![rig];
        let environment = Environment::resolve(None, &scene, query.clone(), timers.clone())?;

        Ok(Self {
            camera,
            world,
            query,
            timers,
            environment,
            sink: None,
        })
    }

    /// Receive the diagnostics lines of engines with debugging enabled.
    pub fn with_diagnostics_sink(mut self, sink: impl DiagnosticsSink + 'static) -> Self {
        self.sink = Some(Arc::new(sink));
        self
    }

    /// Create an engine configured by `config`. Fails if the tuning does not validate.
    pub fn engine(&self, config: &RaycastConfig) -> Result<RayCastEngine, ConfigurationError> {
        let environment = self
            .environment
            .clone()
            .with_diagnostics(Diagnostics::new(config.debug, self.sink.clone()));
        RayCastEngine::new(&environment, config.options.clone()).with_tuning(config.tuning.clone())
    }

    /// Create an engine from a TOML configuration.
    pub fn engine_from_toml(&self, toml: &str) -> Result<RayCastEngine> {
        let config = RaycastConfig::from_toml(toml)?;
        let engine = self.engine(&config)?;
        info!("Created raycaster {} from configuration", engine.id());
        Ok(engine)
    }

    /// Run one frame at `instant` and return the number of delivered hit test results.
    pub fn frame(&self, instant: Instant) -> usize {
        let delivered = self.query.deliver();
        self.timers.tick(instant);
        delivered
    }

    pub fn camera(&self) -> &Arc<RigCamera> {
        &self.camera
    }

    pub fn world(&self) -> &Arc<Mutex<SimulatedWorld>> {
        &self.world
    }
}
