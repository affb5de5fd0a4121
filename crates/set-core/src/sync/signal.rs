use parking_lot::{Condvar, Mutex};
use std::time::{Duration, Instant};

/// One-way latch used to cut sleeps short once a thread is told to stop.
#[derive(Debug, Default)]
pub struct Signal {
    raised: Mutex<bool>,
    changed: Condvar,
}

impl Signal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        *self.raised.lock() = true;
        self.changed.notify_all();
    }

    /// Sleeps for `duration` unless raised first. Returns `true` when the
    /// full duration elapsed.
    pub fn sleep(&self, duration: Duration) -> bool {
        let deadline = Instant::now() + duration;
        let mut raised = self.raised.lock();
        while !*raised {
            if self.changed.wait_until(&mut raised, deadline).timed_out() {
                return !*raised;
            }
        }
        false
    }
}
