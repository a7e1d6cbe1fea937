//! Outbound Ports (Driven Ports)

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use async_trait::async_trait;

use crate::error::FilterError;

/// A detected change of the snapshot source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReloadEvent {
    /// Source that changed
    pub path: PathBuf,
    /// When the change was observed
    pub detected_at: SystemTime,
}

/// Signals when the snapshot source has changed.
#[async_trait]
pub trait ReloadNotifier: Send {
    /// Wait for the next change.
    ///
    /// Must be cancel-safe: dropping the future loses no state. Returns
    /// `FilterError::NotifierClosed` once `close` has been called.
    async fn next_change(&mut self) -> Result<ReloadEvent, FilterError>;

    /// Path being watched.
    fn source(&self) -> &Path;

    /// Release resources. Idempotent.
    fn close(&mut self);
}
