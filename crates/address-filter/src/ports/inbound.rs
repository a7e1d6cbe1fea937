//! Inbound Ports (Driving Ports)

use std::path::{Path, PathBuf};

use crate::error::FilterError;

/// Membership queries against the active blocklist.
///
/// Implementations must be safe to query from many threads while a reload
/// is in progress.
pub trait MembershipStore: Send + Sync {
    /// Whether `address` is (probably) blocklisted.
    ///
    /// Errors only for malformed addresses; a `false` is definitive.
    fn check_address(&self, address: &str) -> Result<bool, FilterError>;
}

/// A store whose contents can be replaced from a source file.
pub trait Reloadable: Send + Sync {
    /// Load `path` and atomically publish it as the active snapshot.
    ///
    /// On error the previously active snapshot stays in place.
    fn reload_from_file(&self, path: &Path) -> Result<SnapshotInfo, FilterError>;
}

/// Description of a published snapshot.
#[derive(Clone, Debug, PartialEq)]
pub struct SnapshotInfo {
    /// Incremented on every publish, starting at 0 for the initial filter
    pub generation: u64,
    /// Insertions recorded in the filter
    pub address_count: usize,
    /// Filter size in bits
    pub size_bits: usize,
    /// Hash functions per element
    pub hash_count: usize,
    /// Estimated false positive rate at the current fill
    pub estimated_fpr: f64,
    /// File the snapshot was loaded from, if any
    pub source: Option<PathBuf>,
}
