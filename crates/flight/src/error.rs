//! Error types for the flight controller and its configuration.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlightError {
    /// Navigate-and-land needs a target body to compute a landing point.
    #[error("no target body assigned; cannot compute a landing point")]
    MissingTarget,
    #[error("invalid tick duration {0}")]
    InvalidTick(f32),
    #[error("craft rigid body is missing from the physics world")]
    MissingBody,
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
    #[error("invalid config field `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}
