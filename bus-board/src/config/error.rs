//! Configuration error types.

use std::path::PathBuf;

/// Errors raised while loading or validating the static tables.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Two locations share a name
    #[error("duplicate location name: {0}")]
    DuplicateLocation(String),

    /// A location has no stops
    #[error("location {0} has no stops")]
    EmptyLocation(String),

    /// No anchor stops, so no service could ever be in scope
    #[error("at least one anchor stop is required")]
    NoAnchors,

    /// Config file could not be read
    #[error("failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Config file is not valid JSON for the tables
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
}
