//! Error types for the guardian

use std::path::PathBuf;

use address_filter::FilterError;
use thiserror::Error;

/// Errors surfaced by guardian construction and its collaborators.
///
/// Screening itself never returns these; `check_transaction` degrades to
/// "not filtered" and logs instead.
#[derive(Debug, Error)]
pub enum GuardianError {
    #[error("guardian is not initialized")]
    NotInitialized,

    #[error("guardian is disabled by configuration")]
    Disabled,

    #[error("unsupported platform: {0}")]
    UnsupportedPlatform(String),

    #[error("home directory not found")]
    HomeDirectoryNotFound,

    #[error("address filter error: {0}")]
    Filter(#[from] FilterError),

    #[error("failed to encode filtered entry: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("filtered entry log I/O error on {path}: {source}")]
    AuditLog {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
