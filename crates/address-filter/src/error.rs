//! Error types for the address filter

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while building, loading or reloading a filter
#[derive(Debug, Error)]
pub enum FilterError {
    #[error("Invalid address {address:?}: {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("Invalid filter parameters: {0}")]
    InvalidParameters(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Corrupt snapshot: {0}")]
    CorruptSnapshot(String),

    #[error("Unsupported snapshot version: {0}")]
    UnsupportedSnapshotVersion(u16),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Poll interval must be non-zero")]
    InvalidPollInterval,

    #[error("Reload notifier is closed")]
    NotifierClosed,

    #[error("Reload manager already started")]
    AlreadyStarted,

    #[error("Failed to spawn reload worker: {0}")]
    WorkerSpawn(String),

    #[error("Reload worker panicked")]
    WorkerPanicked,
}

impl FilterError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
