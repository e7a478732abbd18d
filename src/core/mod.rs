//! Core page logic – document model, scroll animation, throttling, tracking
//! and timed effects.
//!
//! Nothing in this module depends on any TUI or rendering crate.  Time comes
//! in through [`clock::Clock`] and the page through [`dom::Document`].

pub mod animator;
pub mod clock;
pub mod controller;
pub mod dom;
pub mod easing;
pub mod page;
pub mod reveal;
pub mod throttle;
pub mod tracker;
pub mod typewriter;
