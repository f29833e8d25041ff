//! Error types
//!
//! Only resource loading can fail. Gameplay operations are total.

use std::path::PathBuf;

use thiserror::Error;

/// Failure to load a sound resource
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("sound resource not found: {name}")]
    NotFound { name: String },

    #[error("sound resource is empty: {name}")]
    Empty { name: String },

    #[error("cannot decode sound resource {name}: {reason}")]
    Decode { name: String, reason: String },

    #[error("failed to read sound resource {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failure to load settings
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
