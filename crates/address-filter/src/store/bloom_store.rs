//! `BloomFilterStore`: a `MembershipStore` with atomic snapshot replacement
//!
//! The active filter lives behind an `ArcSwap`. Readers take a guard and
//! query one snapshot for the whole lookup. Writers build a complete
//! replacement filter off to the side, then publish it with a single
//! pointer swap; a mutex keeps writers from racing each other.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use arc_swap::ArcSwap;
use parking_lot::Mutex;
use tracing::debug;

use super::snapshot::{read_snapshot, write_snapshot};
use crate::domain::{AddressHandler, BloomFilter};
use crate::error::FilterError;
use crate::metrics::StoreMetrics;
use crate::ports::{MembershipStore, Reloadable, SnapshotInfo};

/// Capacity of a store created with `BloomFilterStore::new`
pub const DEFAULT_CAPACITY: usize = 100_000;

/// Target false positive rate of a store created with `BloomFilterStore::new`
pub const DEFAULT_FALSE_POSITIVE_RATE: f64 = 0.0001;

struct ActiveSnapshot {
    filter: BloomFilter,
    generation: u64,
    source: Option<PathBuf>,
}

impl ActiveSnapshot {
    fn info(&self) -> SnapshotInfo {
        SnapshotInfo {
            generation: self.generation,
            address_count: self.filter.elements_inserted(),
            size_bits: self.filter.size_bits(),
            hash_count: self.filter.hash_count(),
            estimated_fpr: self.filter.false_positive_rate(),
            source: self.source.clone(),
        }
    }
}

/// Bloom-filter backed blocklist.
pub struct BloomFilterStore {
    active: ArcSwap<ActiveSnapshot>,
    handler: Arc<dyn AddressHandler>,
    write_lock: Mutex<()>,
    metrics: StoreMetrics,
}

impl BloomFilterStore {
    /// Empty store sized for `DEFAULT_CAPACITY` addresses.
    pub fn new(handler: Arc<dyn AddressHandler>) -> Result<Self, FilterError> {
        Self::with_capacity(handler, DEFAULT_CAPACITY, DEFAULT_FALSE_POSITIVE_RATE)
    }

    /// Empty store sized for `capacity` addresses at `target_fpr`.
    pub fn with_capacity(
        handler: Arc<dyn AddressHandler>,
        capacity: usize,
        target_fpr: f64,
    ) -> Result<Self, FilterError> {
        let filter = BloomFilter::with_capacity(capacity, target_fpr)?;
        Ok(Self::from_filter(filter, None, handler))
    }

    /// Load a store from a snapshot file.
    pub fn from_file(
        path: impl AsRef<Path>,
        handler: Arc<dyn AddressHandler>,
    ) -> Result<Self, FilterError> {
        let path = path.as_ref();
        let filter = read_snapshot(path)?;
        debug!(
            path = %path.display(),
            addresses = filter.elements_inserted(),
            "Loaded address filter snapshot"
        );
        Ok(Self::from_filter(filter, Some(path.to_path_buf()), handler))
    }

    fn from_filter(
        filter: BloomFilter,
        source: Option<PathBuf>,
        handler: Arc<dyn AddressHandler>,
    ) -> Self {
        Self {
            active: ArcSwap::from_pointee(ActiveSnapshot {
                filter,
                generation: 0,
                source,
            }),
            handler,
            write_lock: Mutex::new(()),
            metrics: StoreMetrics::new(),
        }
    }

    /// Validate, normalise and insert one address.
    pub fn add_address(&self, address: &str) -> Result<(), FilterError> {
        self.add_addresses([address]).map(|_| ())
    }

    /// Insert many addresses with a single publish.
    ///
    /// All-or-nothing: if any address is malformed nothing is inserted.
    pub fn add_addresses<I, S>(&self, addresses: I) -> Result<usize, FilterError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keys = addresses
            .into_iter()
            .map(|address| self.handler.normalize(address.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        let _guard = self.write_lock.lock();
        let current = self.active.load_full();
        let mut filter = current.filter.clone();
        for key in &keys {
            filter.insert(key.as_bytes());
        }
        self.publish(filter, current.source.clone());
        self.metrics.record_inserted(keys.len());

        Ok(keys.len())
    }

    /// Write the active snapshot to `path`.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), FilterError> {
        let snapshot = self.active.load();
        write_snapshot(path.as_ref(), &snapshot.filter)
    }

    /// Insertions recorded in the active snapshot.
    pub fn address_count(&self) -> usize {
        self.active.load().filter.elements_inserted()
    }

    /// Description of the active snapshot.
    pub fn snapshot_info(&self) -> SnapshotInfo {
        self.active.load().info()
    }

    pub fn metrics(&self) -> &StoreMetrics {
        &self.metrics
    }

    // Callers hold `write_lock`.
    fn publish(&self, filter: BloomFilter, source: Option<PathBuf>) -> SnapshotInfo {
        let generation = self.active.load().generation + 1;
        let snapshot = Arc::new(ActiveSnapshot {
            filter,
            generation,
            source,
        });
        let info = snapshot.info();
        self.active.store(snapshot);
        self.metrics.record_published();
        info
    }
}

impl MembershipStore for BloomFilterStore {
    fn check_address(&self, address: &str) -> Result<bool, FilterError> {
        let key = match self.handler.normalize(address) {
            Ok(key) => key,
            Err(e) => {
                self.metrics.record_rejected();
                return Err(e);
            }
        };

        let start = Instant::now();
        let found = self.active.load().filter.contains(key.as_bytes());
        self.metrics.record_lookup(start.elapsed(), found);

        Ok(found)
    }
}

impl Reloadable for BloomFilterStore {
    fn reload_from_file(&self, path: &Path) -> Result<SnapshotInfo, FilterError> {
        // Decode fully before taking the lock; readers keep the old snapshot
        let filter = match read_snapshot(path) {
            Ok(filter) => filter,
            Err(e) => {
                self.metrics.record_reload_failed();
                return Err(e);
            }
        };

        let _guard = self.write_lock.lock();
        Ok(self.publish(filter, Some(path.to_path_buf())))
    }
}

impl fmt::Debug for BloomFilterStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let snapshot = self.active.load();
        f.debug_struct("BloomFilterStore")
            .field("generation", &snapshot.generation)
            .field("address_count", &snapshot.filter.elements_inserted())
            .field("source", &snapshot.source)
            .field("handler", &self.handler)
            .finish()
    }
}
