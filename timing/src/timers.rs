use std::{fmt, time::Duration};

use log::trace;
use parking_lot::Mutex;

use crate::{Instant, Scheduler, TimerCallback, TimerHandle};

/// A [`Scheduler`] that is driven by the host's frame loop.
///
/// Callbacks run inside [`Timers::tick`] once their delay has passed. A callback never runs in
/// the same tick it was scheduled in, so a zero delay means "next tick" and chains of zero-delay
/// callbacks can not starve the frame.
///
/// Delays are measured from the instant of the latest tick. Callbacks scheduled before the first
/// tick are measured from the first tick, so the host's clock is the only time source.
#[derive(Default)]
pub struct Timers {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    /// The instant of the latest tick.
    now: Option<Instant>,
    tick_count: u64,
    next_handle: u64,
    pending: Vec<Pending>,
}

struct Pending {
    handle: TimerHandle,
    delay: Duration,
    /// `None` until the first tick.
    due: Option<Instant>,
    scheduled_in_tick: u64,
    callback: TimerCallback,
}

impl fmt::Debug for Timers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("Timers")
            .field("now", &inner.now)
            .field("tick_count", &inner.tick_count)
            .field("pending", &inner.pending.len())
            .finish()
    }
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs all callbacks that are due at `instant`, in order of their due time.
    ///
    /// Callbacks run without any internal lock held, they may schedule or cancel other timers.
    pub fn tick(&self, instant: Instant) {
        let tick = {
            let mut inner = self.inner.lock();
            inner.now = Some(instant);
            inner.tick_count += 1;
            for pending in inner.pending.iter_mut().filter(|p| p.due.is_none()) {
                pending.due = Some(instant + pending.delay);
            }
            inner.tick_count
        };

        while let Some((handle, callback)) = self.take_due(tick, instant) {
            trace!("Running timer {}", handle.id());
            callback();
        }
    }

    /// Number of callbacks waiting to run.
    pub fn pending(&self) -> usize {
        self.inner.lock().pending.len()
    }

    fn take_due(&self, tick: u64, instant: Instant) -> Option<(TimerHandle, TimerCallback)> {
        let mut inner = self.inner.lock();
        let index = inner
            .pending
            .iter()
            .enumerate()
            .filter(|(_, p)| {
                p.scheduled_in_tick < tick && p.due.is_some_and(|due| due <= instant)
            })
            .min_by_key(|(_, p)| (p.due, p.handle.id()))
            .map(|(index, _)| index)?;
        let pending = inner.pending.remove(index);
        Some((pending.handle, pending.callback))
    }
}

impl Scheduler for Timers {
    fn schedule_once(&self, delay: Duration, callback: TimerCallback) -> TimerHandle {
        let mut inner = self.inner.lock();
        let due = inner.now.map(|now| now + delay);
        let handle = TimerHandle::new(inner.next_handle);
        inner.next_handle += 1;
        let scheduled_in_tick = inner.tick_count;
        inner.pending.push(Pending {
            handle,
            delay,
            due,
            scheduled_in_tick,
            callback,
        });
        handle
    }

    fn cancel(&self, handle: TimerHandle) -> bool {
        let mut inner = self.inner.lock();
        let before = inner.pending.len();
        inner.pending.retain(|p| p.handle != handle);
        inner.pending.len() != before
    }
}
