//! Lookup and publish counters for a membership store
//!
//! ```ignore
//! let snapshot = store.metrics().snapshot();
//! println!("{} lookups, {} hits", snapshot.lookups_performed, snapshot.lookups_positive);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Thread-safe counters, updated with relaxed ordering.
#[derive(Debug, Default)]
pub struct StoreMetrics {
    /// Lookups on well-formed addresses
    pub lookups_performed: AtomicU64,
    /// Lookups that matched (true or false positive)
    pub lookups_positive: AtomicU64,
    /// Lookups rejected as malformed
    pub lookups_rejected: AtomicU64,
    /// Cumulative lookup time in nanoseconds
    pub lookup_time_ns: AtomicU64,
    /// Addresses inserted through the store
    pub addresses_inserted: AtomicU64,
    /// Snapshots published after the initial one
    pub snapshots_published: AtomicU64,
    /// Reload attempts that left the active snapshot untouched
    pub reload_failures: AtomicU64,
}

impl StoreMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_lookup(&self, duration: Duration, found: bool) {
        self.lookups_performed.fetch_add(1, Ordering::Relaxed);
        self.lookup_time_ns
            .fetch_add(duration.as_nanos() as u64, Ordering::Relaxed);
        if found {
            self.lookups_positive.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_rejected(&self) {
        self.lookups_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_inserted(&self, count: usize) {
        self.addresses_inserted
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn record_published(&self) {
        self.snapshots_published.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_reload_failed(&self) {
        self.reload_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Average lookup latency in nanoseconds
    pub fn avg_lookup_time_ns(&self) -> u64 {
        let total = self.lookup_time_ns.load(Ordering::Relaxed);
        let count = self.lookups_performed.load(Ordering::Relaxed);
        if count > 0 {
            total / count
        } else {
            0
        }
    }

    pub fn snapshot(&self) -> StoreMetricsSnapshot {
        StoreMetricsSnapshot {
            lookups_performed: self.lookups_performed.load(Ordering::Relaxed),
            lookups_positive: self.lookups_positive.load(Ordering::Relaxed),
            lookups_rejected: self.lookups_rejected.load(Ordering::Relaxed),
            addresses_inserted: self.addresses_inserted.load(Ordering::Relaxed),
            snapshots_published: self.snapshots_published.load(Ordering::Relaxed),
            reload_failures: self.reload_failures.load(Ordering::Relaxed),
            avg_lookup_ns: self.avg_lookup_time_ns(),
        }
    }
}

/// Point-in-time copy of `StoreMetrics`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StoreMetricsSnapshot {
    pub lookups_performed: u64,
    pub lookups_positive: u64,
    pub lookups_rejected: u64,
    pub addresses_inserted: u64,
    pub snapshots_published: u64,
    pub reload_failures: u64,
    pub avg_lookup_ns: u64,
}
