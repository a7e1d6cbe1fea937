//! Audit trail of screening hits.
//!
//! Each hit produces one `FilteredTxLogEntry`. Where it goes is up to the
//! `FilteredEntryLogger` the guardian was built with: a structured tracing
//! event by default, or an append-only JSON Lines file.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use guardian_telemetry::FILTERED_TARGET;
use parking_lot::Mutex;
use serde::Serialize;
use tracing::warn;

use crate::error::GuardianError;

/// One screening hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilteredTxLogEntry {
    /// The blocklisted address that matched
    pub filtered_address: String,
    /// The other party; the sender itself when the sender matched
    pub counterpart_address: String,
    /// `0x` hex transaction hash
    pub tx_hash: String,
    pub logged_at: DateTime<Utc>,
}

impl FilteredTxLogEntry {
    pub fn new(
        filtered_address: impl Into<String>,
        counterpart_address: impl Into<String>,
        tx_hash: impl Into<String>,
    ) -> Self {
        Self {
            filtered_address: filtered_address.into(),
            counterpart_address: counterpart_address.into(),
            tx_hash: tx_hash.into(),
            logged_at: Utc::now(),
        }
    }
}

/// Sink for screening hits.
pub trait FilteredEntryLogger: Send + Sync {
    fn log(&self, entry: &FilteredTxLogEntry) -> Result<(), GuardianError>;
}

/// Emits each entry as a `warn` event on target `guardian::filtered`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingFilteredEntryLogger;

impl FilteredEntryLogger for TracingFilteredEntryLogger {
    fn log(&self, entry: &FilteredTxLogEntry) -> Result<(), GuardianError> {
        let json = serde_json::to_string(entry)?;
        warn!(target: FILTERED_TARGET, entry = %json, "Filtered transaction entry");
        Ok(())
    }
}

/// Appends one JSON object per line to a file, flushing after each entry.
#[derive(Debug)]
pub struct JsonLinesFilteredEntryLogger {
    path: PathBuf,
    writer: Mutex<BufWriter<File>>,
}

impl JsonLinesFilteredEntryLogger {
    /// Open `path` for appending, creating it and its parent directory.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, GuardianError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| GuardianError::AuditLog {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| GuardianError::AuditLog {
                path: path.clone(),
                source,
            })?;

        Ok(Self {
            path,
            writer: Mutex::new(BufWriter::new(file)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FilteredEntryLogger for JsonLinesFilteredEntryLogger {
    fn log(&self, entry: &FilteredTxLogEntry) -> Result<(), GuardianError> {
        let mut line = serde_json::to_vec(entry)?;
        line.push(b'\n');

        let mut writer = self.writer.lock();
        writer
            .write_all(&line)
            .and_then(|_| writer.flush())
            .map_err(|source| GuardianError::AuditLog {
                path: self.path.clone(),
                source,
            })
    }
}
