use std::{
    fmt,
    sync::{
        Arc,
        atomic::{AtomicU32, Ordering},
    },
};

use worldcast_timing::Scheduler;

use crate::{CameraLookup, CameraRig, ConfigurationError, Diagnostics, WorldQuery};

/// The host collaborators shared by all engines created from it.
///
/// Engines do not share sessions. Each one creates its own from the world query service.
#[derive(Clone)]
pub struct Environment {
    camera: Arc<dyn CameraRig>,
    world_query: Arc<dyn WorldQuery>,
    scheduler: Arc<dyn Scheduler>,
    diagnostics: Diagnostics,
    next_engine_id: Arc<AtomicU32>,
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environment")
            .field("camera", &self.camera.pose())
            .field("diagnostics", &self.diagnostics)
            .field("next_engine_id", &self.next_engine_id)
            .finish()
    }
}

impl Environment {
    /// Resolve the camera and bundle the collaborators.
    ///
    /// `camera` takes precedence. Without it, the first camera `lookup` finds is used. The camera
    /// must have a tracking capability.
    pub fn resolve(
        camera: Option<Arc<dyn CameraRig>>,
        lookup: &dyn CameraLookup,
        world_query: Arc<dyn WorldQuery>,
        scheduler: Arc<dyn Scheduler>,
    ) -> Result<Self, ConfigurationError> {
        let camera = camera
            .or_else(|| lookup.find_camera())
            .ok_or(ConfigurationError::CameraNotFound)?;

        if !camera.tracking().is_tracked() {
            return Err(ConfigurationError::MissingTracking);
        }

        Ok(Self {
            camera,
            world_query,
            scheduler,
            diagnostics: Diagnostics::default(),
            next_engine_id: Default::default(),
        })
    }

    pub fn with_diagnostics(mut self, diagnostics: Diagnostics) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn camera(&self) -> &Arc<dyn CameraRig> {
        &self.camera
    }

    pub fn world_query(&self) -> &Arc<dyn WorldQuery> {
        &self.world_query
    }

    pub fn scheduler(&self) -> &Arc<dyn Scheduler> {
        &self.scheduler
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub(crate) fn allocate_engine_id(&self) -> u32 {
        self.next_engine_id.fetch_add(1, Ordering::Relaxed)
    }
}
