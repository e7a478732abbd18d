//! Time source abstraction.
//!
//! Timestamps are `Duration`s since the clock's origin, the same shape a
//! display frame callback hands out.  Page logic never calls
//! `Instant::now()` directly so tests can step time by hand.

use std::time::{Duration, Instant};

/// Monotonic time source.
pub trait Clock {
    fn now(&self) -> Duration;
}

/// Wall clock anchored at construction time.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Hand-stepped clock.  Clones share the same time cell.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: std::rc::Rc<std::cell::Cell<Duration>>,
}

#[cfg(test)]
impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    pub fn advance_ms(&self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}
