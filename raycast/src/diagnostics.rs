use std::{fmt, sync::Arc};

use log::debug;

/// Receives human readable lines about cast attempts and results.
pub trait DiagnosticsSink: Send + Sync {
    fn log_line(&self, line: &str);
}

impl<F: Fn(&str) + Send + Sync> DiagnosticsSink for F {
    fn log_line(&self, line: &str) {
        self(line)
    }
}

/// Debug output of the engines of an environment.
///
/// Lines always go to the `log` facade at debug level. They are forwarded to the sink only if
/// debugging is enabled.
#[derive(Clone, Default)]
pub struct Diagnostics {
    enabled: bool,
    sink: Option<Arc<dyn DiagnosticsSink>>,
}

impl fmt::Debug for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Diagnostics")
            .field("enabled", &self.enabled)
            .field("sink", &self.sink.is_some())
            .finish()
    }
}

impl Diagnostics {
    pub fn new(enabled: bool, sink: Option<Arc<dyn DiagnosticsSink>>) -> Self {
        Self { enabled, sink }
    }

    /// Enabled diagnostics that go to `sink`.
    pub fn to_sink(sink: impl DiagnosticsSink + 'static) -> Self {
        Self::new(true, Some(Arc::new(sink)))
    }

    pub(crate) fn log(&self, engine_id: u32, message: fmt::Arguments<'_>) {
        let line = format!("Raycaster {engine_id}: {message}");
        debug!("{line}");
        if !self.enabled {
            return;
        }
        if let Some(sink) = &self.sink {
            sink.log_line(&line);
        }
    }
}
