//! Terminal event abstraction.
//!
//! Wraps crossterm events into a simpler enum and runs a background task that
//! forwards them over a channel so the main loop stays non-blocking.

use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyEvent, MouseEvent};
use tokio::sync::mpsc;

/// High-level events consumed by the application.
#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize(u16, u16),
    /// Display frame; drives scroll animations and timed effects.
    Tick,
}

/// Spawns a background task that polls the terminal for events and sends them
/// through the returned channel, with a `Tick` every `frame_rate`.
pub fn spawn_event_reader(frame_rate: Duration) -> mpsc::UnboundedReceiver<AppEvent> {
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::task::spawn_blocking(move || {
        let mut last_tick = Instant::now();
        loop {
            // Input must not starve frames, so wait only for what is left
            // of the current frame.
            let timeout = frame_rate.saturating_sub(last_tick.elapsed());
            let has_event = event::poll(timeout).unwrap_or(false);
            if has_event {
                if let Ok(ev) = event::read() {
                    let app_event = match ev {
                        CtEvent::Key(k) => Some(AppEvent::Key(k)),
                        CtEvent::Mouse(m) => Some(AppEvent::Mouse(m)),
                        CtEvent::Resize(w, h) => Some(AppEvent::Resize(w, h)),
                        _ => None,
                    };
                    if let Some(app_event) = app_event {
                        if tx.send(app_event).is_err() {
                            break; // receiver dropped
                        }
                    }
                }
            }
            if last_tick.elapsed() >= frame_rate {
                last_tick = Instant::now();
                if tx.send(AppEvent::Tick).is_err() {
                    break;
                }
            }
        }
    });

    rx
}
