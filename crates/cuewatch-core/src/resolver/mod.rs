//! Playback-synchronized event resolution.
//!
//! Given a set of time-windowed events and a stream of playback positions,
//! decides which single event is on display and when that changes.

mod engine;
mod window;

#[cfg(test)]
mod engine_tests;

pub use engine::{DroppedEvent, LoadReport, ResolverSnapshot, TemporalEventResolver};
pub use window::{Category, Event, EventWindow};
