//! Typewriter effect for the hero title.
//!
//! Timeline for a title of `n` characters scheduled at `t0`:
//!
//! * `t0 + delay`: title cleared, cursor border shown
//! * every `interval` after that: one more character appended
//! * one `interval` after the last character: typing stops
//! * `hold` later: cursor border removed
//!
//! The machine is driven by timestamps, so a late tick catches up on every
//! step that fell due in the meantime.

use std::time::Duration;

/// Timing knobs for [`Typewriter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypewriterTiming {
    pub delay: Duration,
    pub interval: Duration,
    pub hold: Duration,
}

impl Default for TypewriterTiming {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(500),
            interval: Duration::from_millis(100),
            hold: Duration::from_millis(1000),
        }
    }
}

/// One mutation the title should undergo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypewriterStep {
    /// Clear the title and show the cursor.
    Begin,
    Append(char),
    /// Remove the cursor; the effect is over.
    HideCursor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Scheduled { at: Duration },
    Typing { next_at: Duration, typed: usize },
    Holding { until: Duration },
    Done,
}

#[derive(Debug, Clone)]
pub struct Typewriter {
    text: Vec<char>,
    timing: TypewriterTiming,
    phase: Phase,
}

impl Typewriter {
    /// Schedule the effect for `text`, counting the delay from `now`.
    pub fn new(text: &str, now: Duration, timing: TypewriterTiming) -> Self {
        Self {
            text: text.chars().collect(),
            timing,
            phase: Phase::Scheduled {
                at: now + timing.delay,
            },
        }
    }

    pub fn is_done(&self) -> bool {
        self.phase == Phase::Done
    }

    /// Whether the cursor border is currently shown.
    #[cfg(test)]
    pub fn cursor_visible(&self) -> bool {
        matches!(self.phase, Phase::Typing { .. } | Phase::Holding { .. })
    }

    /// Collect every step due at or before `now`.
    pub fn tick(&mut self, now: Duration) -> Vec<TypewriterStep> {
        let mut steps = Vec::new();
        loop {
            match self.phase {
                Phase::Scheduled { at } if at <= now => {
                    steps.push(TypewriterStep::Begin);
                    self.phase = Phase::Typing {
                        next_at: at + self.timing.interval,
                        typed: 0,
                    };
                }
                Phase::Typing { next_at, typed } if next_at <= now => {
                    if let Some(&c) = self.text.get(typed) {
                        steps.push(TypewriterStep::Append(c));
                        self.phase = Phase::Typing {
                            next_at: next_at + self.timing.interval,
                            typed: typed + 1,
                        };
                    } else {
                        self.phase = Phase::Holding {
                            until: next_at + self.timing.hold,
                        };
                    }
                }
                Phase::Holding { until } if until <= now => {
                    steps.push(TypewriterStep::HideCursor);
                    self.phase = Phase::Done;
                }
                _ => break,
            }
        }
        steps
    }
}
