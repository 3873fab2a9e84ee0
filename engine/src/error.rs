//! Error types for the fallible seams of the engine: loading configuration,
//! loading level data, and delivering host notifications.
//!
//! Nothing in the per-frame path returns these; frame-time faults are logged
//! and recovered in place.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading a [`crate::config::SimConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Errors that can occur while loading a [`crate::world::LevelData`].
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("failed to read level {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse level {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("level has no usable collision geometry")]
    NoCollision,
    #[error("invalid level record `{name}`: {reason}")]
    Invalid { name: String, reason: &'static str },
}

/// A host notification that could not be delivered.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("host page is not attached")]
    Detached,
    #[error("host rejected {event}: {reason}")]
    Rejected { event: &'static str, reason: String },
}
