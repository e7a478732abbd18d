//! Frame-driven scroll animation with generation-based cancellation.
//!
//! An animation is a resumable task: the host delivers frames by handing back
//! the [`FrameTicket`] it received, and each frame yields the scroll position
//! to apply plus the ticket for the next frame.  Starting a new animation bumps
//! the generation, so tickets still queued for the old one become stale and
//! are ignored without touching the viewport.

use std::time::Duration;

use super::easing::{ease_in_out_cubic, lerp};

/// Default smooth-scroll duration.
pub const DEFAULT_SCROLL_DURATION: Duration = Duration::from_millis(1000);

// ───────────────────────────────────────── state ─────────────

/// One in-flight scroll-to animation.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollAnimation {
    /// Set on the first delivered frame.
    pub start_timestamp: Option<Duration>,
    pub start_offset: f64,
    pub target_offset: f64,
    pub duration: Duration,
}

impl ScrollAnimation {
    pub fn new(start_offset: f64, target_offset: f64, duration: Duration) -> Self {
        Self {
            start_timestamp: None,
            start_offset,
            target_offset,
            duration,
        }
    }

    /// Advance to `now`.  Returns the position for this frame and whether
    /// the animation has reached its end.
    pub fn sample(&mut self, now: Duration) -> (f64, bool) {
        let start = *self.start_timestamp.get_or_insert(now);
        let elapsed = now.saturating_sub(start);

        if elapsed >= self.duration {
            return (self.target_offset, true);
        }

        let progress = (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0);
        let eased = ease_in_out_cubic(progress);
        (lerp(self.start_offset, self.target_offset, eased), false)
    }
}

/// Handle for one scheduled frame of a specific animation generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameTicket {
    generation: u64,
}

/// What a delivered frame asks the host to do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStep {
    /// Scroll position to apply now.
    pub position: f64,
    /// Ticket for the following frame; `None` once the animation is done.
    pub next: Option<FrameTicket>,
}

// ───────────────────────────────────────── animator ──────────

/// Owns at most one live [`ScrollAnimation`].
#[derive(Debug, Default)]
pub struct ScrollAnimator {
    generation: u64,
    current: Option<ScrollAnimation>,
}

impl ScrollAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin animating from `start_offset` to `target_offset`, superseding any
    /// animation already in flight.  The returned ticket is the first frame.
    pub fn animate_scroll_to(
        &mut self,
        start_offset: f64,
        target_offset: f64,
        duration: Duration,
    ) -> FrameTicket {
        self.generation = self.generation.wrapping_add(1);
        if self.current.is_some() {
            tracing::debug!(generation = self.generation, "superseding in-flight scroll animation");
        }
        self.current = Some(ScrollAnimation::new(start_offset, target_offset, duration));
        tracing::debug!(
            start_offset,
            target_offset,
            duration_ms = duration.as_millis() as u64,
            "scroll animation started"
        );
        FrameTicket {
            generation: self.generation,
        }
    }

    /// Deliver one frame.  Returns `None` for stale tickets.
    pub fn frame(&mut self, ticket: FrameTicket, now: Duration) -> Option<FrameStep> {
        if ticket.generation != self.generation {
            return None;
        }
        let anim = self.current.as_mut()?;
        let (position, finished) = anim.sample(now);
        if finished {
            self.current = None;
            tracing::debug!(position, "scroll animation finished");
            return Some(FrameStep {
                position,
                next: None,
            });
        }
        Some(FrameStep {
            position,
            next: Some(ticket),
        })
    }

    /// Drop the live animation; outstanding tickets become stale.
    pub fn cancel(&mut self) {
        if self.current.take().is_some() {
            self.generation = self.generation.wrapping_add(1);
        }
    }

    pub fn is_animating(&self) -> bool {
        self.current.is_some()
    }
}
