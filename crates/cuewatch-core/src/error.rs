//! Core error types for cuewatch-core.
//!
//! Nothing raised while resolving playback time is fatal: malformed input is
//! reported through [`ValidationError`] values attached to a load report, and
//! only the outer surfaces (config files, payload files) return hard errors.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for cuewatch-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Payload-shape errors
    #[error("Payload error: {0}")]
    Payload(#[from] PayloadError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Key does not exist in the configuration tree
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Errors for analysis payloads that cannot be read as an event list at all.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PayloadError {
    /// The payload is neither an array nor an object wrapping one
    #[error("Expected a list of events, found {found}")]
    NotAList { found: &'static str },
}

/// Per-event validation failures. These never abort a load.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Window ends before it starts
    #[error("Invalid time range: end_time ({end}) must not be less than start_time ({start})")]
    InvalidTimeRange { start: f64, end: f64 },

    /// NaN or infinite window bound
    #[error("Non-finite bound for '{field}'")]
    NonFiniteBound { field: &'static str },

    /// No usable deduplication key
    #[error("Event has an empty identity")]
    EmptyIdentity,

    /// Record could not be decoded
    #[error("Malformed event record: {0}")]
    Malformed(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
