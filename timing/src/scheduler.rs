use std::time::Duration;

/// Identifies a scheduled callback so that it can be canceled.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

impl TimerHandle {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn id(self) -> u64 {
        self.0
    }
}

pub type TimerCallback = Box<dyn FnOnce() + Send>;

/// Runs callbacks once after a delay.
///
/// Implementations must never invoke the callback from inside `schedule_once`. A zero delay means
/// "as soon as possible", which is the next time the scheduler gets to run.
pub trait Scheduler: Send + Sync {
    fn schedule_once(&self, delay: Duration, callback: TimerCallback) -> TimerHandle;

    /// Cancels a pending callback. Returns `false` if it already ran or was canceled before.
    fn cancel(&self, handle: TimerHandle) -> bool;
}
