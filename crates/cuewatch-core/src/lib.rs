//! # cuewatch Core Library
//!
//! Resolves which analysis annotation (red flag, suspicious moment,
//! psychological pattern) is on display at a given media playback position.
//!
//! ## Architecture
//!
//! - **Resolver**: a playback-time-driven state machine. The caller invokes
//!   `tick()` on every position update and renders the returned transition
//! - **Payload**: decoding of the analysis pipeline's JSON moment lists
//! - **Display**: the sink trait renderers implement, plus auto-expiry
//! - **Config**: TOML-based tunables
//!
//! ## Key Components
//!
//! - [`TemporalEventResolver`]: the resolver state machine
//! - [`Transition`]: what changed after a tick
//! - [`DisplaySink`]: trait for whatever draws the overlay
//! - [`Config`]: configuration management

pub mod config;
pub mod display;
pub mod error;
pub mod events;
pub mod payload;
pub mod resolver;

pub use config::{Config, DisplayConfig, ResolverConfig};
pub use display::{dispatch, format_timestamp, AutoExpiry, DisplaySink};
pub use error::{ConfigError, CoreError, PayloadError, Result, ValidationError};
pub use events::{Transition, TransitionRecord};
pub use payload::{decode_events, read_payload, Decoded, MomentRecord};
pub use resolver::{
    Category, DroppedEvent, Event, EventWindow, LoadReport, ResolverSnapshot, TemporalEventResolver,
};
