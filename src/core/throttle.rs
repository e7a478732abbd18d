//! Leading-edge throttle for high-frequency events.
//!
//! The first call runs immediately and opens a cooldown window of `limit`.
//! Calls inside the window are dropped outright: nothing is queued and no
//! trailing call fires when the window closes.

use std::time::Duration;

/// Cooldown bookkeeping for one throttled callback.
#[derive(Debug, Clone)]
pub struct Throttle {
    limit: Duration,
    /// Timestamp of the last honored call; `None` until the first one.
    last_fired: Option<Duration>,
}

impl Throttle {
    pub fn new(limit: Duration) -> Self {
        Self {
            limit,
            last_fired: None,
        }
    }

    /// Whether a call at `now` would be dropped.
    pub fn is_cooling_down(&self, now: Duration) -> bool {
        match self.last_fired {
            Some(at) => now.saturating_sub(at) < self.limit,
            None => false,
        }
    }

    /// Claim the window at `now`.  Returns `true` when the caller should run;
    /// `false` means the call is dropped.
    pub fn try_acquire(&mut self, now: Duration) -> bool {
        if self.is_cooling_down(now) {
            tracing::trace!(?now, "throttled call dropped");
            return false;
        }
        self.last_fired = Some(now);
        true
    }
}
