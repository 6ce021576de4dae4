//! Error types for configuration and session setup.
//!
//! Nothing here is fatal at runtime: setup errors are logged and the affected
//! trigger or deployment step is disabled for the session.

use std::path::PathBuf;

use thiserror::Error;

/// Failure to load or validate `config.ron`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config syntax: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("invalid config value: {0}")]
    Invalid(String),
}

/// A collaborator required by a trigger or deployment step was not supplied.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SetupError {
    #[error("missing collaborator: {0}")]
    MissingCollaborator(&'static str),
}
