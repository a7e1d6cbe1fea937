//! Polling file watcher
//!
//! Compares a cheap metadata fingerprint (modification time, length and,
//! on unix, inode) on every tick. Snapshots are replaced by rename, so the
//! inode changes even when size and mtime happen to match.

use std::fs::Metadata;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tracing::debug;

use crate::error::FilterError;
use crate::ports::{ReloadEvent, ReloadNotifier};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Fingerprint {
    modified: Option<SystemTime>,
    len: u64,
    inode: u64,
}

impl From<&Metadata> for Fingerprint {
    fn from(meta: &Metadata) -> Self {
        #[cfg(unix)]
        let inode = std::os::unix::fs::MetadataExt::ino(meta);
        #[cfg(not(unix))]
        let inode = 0;

        Self {
            modified: meta.modified().ok(),
            len: meta.len(),
            inode,
        }
    }
}

/// `ReloadNotifier` that polls a file's metadata on a fixed interval.
#[derive(Debug)]
pub struct FileWatcherNotifier {
    path: PathBuf,
    poll_interval: Duration,
    last_seen: Fingerprint,
    // Created on first poll so construction works outside a runtime
    ticker: Option<Interval>,
    closed: bool,
}

impl FileWatcherNotifier {
    /// Watch `path`, which must exist, every `poll_interval`.
    pub fn new(path: impl Into<PathBuf>, poll_interval: Duration) -> Result<Self, FilterError> {
        if poll_interval.is_zero() {
            return Err(FilterError::InvalidPollInterval);
        }
        let path = path.into();
        let meta = std::fs::metadata(&path).map_err(|e| FilterError::io(&path, e))?;

        Ok(Self {
            last_seen: Fingerprint::from(&meta),
            path,
            poll_interval,
            ticker: None,
            closed: false,
        })
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }
}

#[async_trait]
impl ReloadNotifier for FileWatcherNotifier {
    async fn next_change(&mut self) -> Result<ReloadEvent, FilterError> {
        loop {
            if self.closed {
                return Err(FilterError::NotifierClosed);
            }

            let period = self.poll_interval;
            let ticker = self.ticker.get_or_insert_with(|| {
                let mut ticker = interval_at(Instant::now() + period, period);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
                ticker
            });
            ticker.tick().await;

            match tokio::fs::metadata(&self.path).await {
                Ok(meta) => {
                    let current = Fingerprint::from(&meta);
                    if current != self.last_seen {
                        self.last_seen = current;
                        return Ok(ReloadEvent {
                            path: self.path.clone(),
                            detected_at: SystemTime::now(),
                        });
                    }
                }
                Err(e) => {
                    // Usually the file is mid-replacement; try again next tick
                    debug!(path = %self.path.display(), error = %e, "Filter file not readable");
                }
            }
        }
    }

    fn source(&self) -> &Path {
        &self.path
    }

    fn close(&mut self) {
        self.closed = true;
        self.ticker = None;
    }
}
