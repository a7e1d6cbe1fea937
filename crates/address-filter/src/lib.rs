//! # Address Filter
//!
//! Probabilistic address blocklist with atomic hot reload.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): pure logic, no I/O
//!   - `BloomFilter`: bit array with double hashing, no false negatives
//!   - `EvmAddressHandler`: validation and case normalisation of addresses
//!
//! - **Ports Layer** (`ports/`): trait definitions
//!   - `MembershipStore`: "is this address blocklisted?" (driving port)
//!   - `Reloadable`: replace the active snapshot from a source path
//!   - `ReloadNotifier`: change detection for the snapshot source (driven port)
//!
//! - **Store** (`store/`): `BloomFilterStore` and the on-disk snapshot format
//!
//! - **Reload** (`reload/`): `FileWatcherNotifier` and `ReloadManager`
//!
//! ## Invariants
//!
//! - No false negatives: every inserted address is reported as present.
//! - Readers never observe a partially loaded snapshot. A new filter is
//!   fully decoded before it is published with one pointer swap.
//! - A failed reload leaves the previously published snapshot in place.
//!
//! ## Usage Example
//!
//! ```ignore
//! use address_filter::{BloomFilterStore, EvmAddressHandler, MembershipStore};
//! use std::sync::Arc;
//!
//! let store = BloomFilterStore::new(Arc::new(EvmAddressHandler))?;
//! store.add_address("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266")?;
//! store.save_to_file("bloom_filter.gob")?;
//!
//! assert!(store.check_address("0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266")?);
//! ```

pub mod domain;
pub mod error;
pub mod metrics;
pub mod ports;
pub mod reload;
pub mod store;

// Re-exports for convenience
pub use domain::{AddressHandler, BloomFilter, EvmAddressHandler};
pub use error::FilterError;
pub use metrics::{StoreMetrics, StoreMetricsSnapshot};
pub use ports::{MembershipStore, ReloadEvent, ReloadNotifier, Reloadable, SnapshotInfo};
pub use reload::{FileWatcherNotifier, ReloadManager, ReloadStats};
pub use store::{BloomFilterStore, DEFAULT_CAPACITY, DEFAULT_FALSE_POSITIVE_RATE};
