//! Deferred, cancelable execution of one-shot callbacks, driven by the host's frame ticks.

mod scheduler;
mod timers;

pub use scheduler::*;
pub use timers::*;

#[cfg(not(target_arch = "wasm32"))]
pub use std::time::Instant;
#[cfg(target_arch = "wasm32")]
pub use web_time::Instant;
