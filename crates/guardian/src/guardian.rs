//! The `Guardian`: screening of transactions against the blocklist.
//!
//! ## Check order
//!
//! 1. Recover the sender. Failure logs and returns `false` (fail-open).
//! 2. Look up the sender. A hit records an entry and returns `true`; the
//!    recipient is not checked.
//! 3. Look up the recipient, if any. A hit records an entry with the sender
//!    as counterpart and returns `true`.
//!
//! Lookup errors log and count as "not filtered" for that address only, so
//! a sender lookup error still lets a listed recipient flag the transaction.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use address_filter::{
    BloomFilterStore, EvmAddressHandler, FileWatcherNotifier, MembershipStore, ReloadManager,
    ReloadStats,
};
use parking_lot::Mutex;
use sender_recovery::{recover_sender, Signer};
use shared_types::{address_to_checksum_hex, Transaction};
use tracing::{error, info, warn};

use crate::config::GuardianConfig;
use crate::error::GuardianError;
use crate::filtered_log::{FilteredEntryLogger, FilteredTxLogEntry, TracingFilteredEntryLogger};
use crate::instance;
use crate::paths::default_filter_path;

/// Screens transactions against a hot-reloaded address blocklist.
pub struct Guardian {
    config: GuardianConfig,
    filter_path: PathBuf,
    store: Arc<BloomFilterStore>,
    manager: Mutex<ReloadManager>,
    logger: Arc<dyn FilteredEntryLogger>,
}

impl Guardian {
    /// Load the blocklist and start watching it for changes.
    ///
    /// Hits are recorded with `TracingFilteredEntryLogger`.
    pub fn new(config: GuardianConfig) -> Result<Self, GuardianError> {
        Self::with_logger(config, Arc::new(TracingFilteredEntryLogger))
    }

    /// As `new`, recording hits with `logger`.
    pub fn with_logger(
        config: GuardianConfig,
        logger: Arc<dyn FilteredEntryLogger>,
    ) -> Result<Self, GuardianError> {
        if config.disabled {
            return Err(GuardianError::Disabled);
        }

        let filter_path = match &config.filter_file_path {
            Some(path) => path.clone(),
            None => default_filter_path()?,
        };

        let store = Arc::new(BloomFilterStore::from_file(
            &filter_path,
            Arc::new(EvmAddressHandler),
        )?);
        let notifier = FileWatcherNotifier::new(&filter_path, config.poll_interval)?;

        let mut manager = ReloadManager::new(store.clone(), Box::new(notifier));
        manager.start()?;

        info!(
            file = %filter_path.display(),
            addresses = store.address_count(),
            "Guardian initialized"
        );

        Ok(Self {
            config,
            filter_path,
            store,
            manager: Mutex::new(manager),
            logger,
        })
    }

    /// Whether the sender or recipient of `tx` is blocklisted.
    ///
    /// Never errors: unrecoverable senders and lookup failures resolve to
    /// "not filtered" after logging.
    pub fn check_transaction(&self, signer: &dyn Signer, tx: &Transaction) -> bool {
        screen_transaction(self.store.as_ref(), self.logger.as_ref(), signer, tx)
    }

    /// Screen a single address, in any letter case.
    pub fn check_address(&self, address: &str) -> Result<bool, GuardianError> {
        Ok(self.store.check_address(address)?)
    }

    /// Stop the reload worker. Idempotent; errors are logged.
    pub fn stop(&self) {
        let mut manager = self.manager.lock();
        if let Err(e) = manager.stop() {
            error!(error = %e, "Failed to stop reload manager");
        }
    }

    /// Stop this guardian and clear the process-wide instance so that
    /// `init_instance` can run again.
    pub fn reset(&self) {
        self.stop();
        instance::reset();
    }

    pub fn is_reloading(&self) -> bool {
        self.manager.lock().is_running()
    }

    pub fn reload_stats(&self) -> ReloadStats {
        self.manager.lock().stats()
    }

    pub fn store(&self) -> &Arc<BloomFilterStore> {
        &self.store
    }

    pub fn filter_path(&self) -> &Path {
        &self.filter_path
    }

    pub fn config(&self) -> &GuardianConfig {
        &self.config
    }
}

/// Screen `tx` against `store`, recording hits with `logger`.
///
/// This is the check behind `Guardian::check_transaction`, usable with any
/// `MembershipStore`.
pub fn screen_transaction(
    store: &dyn MembershipStore,
    logger: &dyn FilteredEntryLogger,
    signer: &dyn Signer,
    tx: &Transaction,
) -> bool {
    let sender = match recover_sender(signer, tx) {
        Ok(sender) => address_to_checksum_hex(&sender),
        Err(e) => {
            error!(error = %e, "Failed to extract sender address");
            return false;
        }
    };

    if is_filtered(store, &sender, "sender") {
        record_hit(logger, &sender, &sender, tx);
        return true;
    }

    if let Some(to) = tx.to() {
        let recipient = address_to_checksum_hex(to);
        if is_filtered(store, &recipient, "recipient") {
            record_hit(logger, &recipient, &sender, tx);
            return true;
        }
    }

    false
}

fn is_filtered(store: &dyn MembershipStore, address: &str, role: &'static str) -> bool {
    match store.check_address(&address.to_lowercase()) {
        Ok(filtered) => filtered,
        Err(e) => {
            error!(role, address = %address, error = %e, "Error checking address");
            false
        }
    }
}

fn record_hit(
    logger: &dyn FilteredEntryLogger,
    filtered: &str,
    counterpart: &str,
    tx: &Transaction,
) {
    let tx_hash = tx.hash_hex();
    let entry = FilteredTxLogEntry::new(filtered, counterpart, tx_hash.as_str());
    if let Err(e) = logger.log(&entry) {
        error!(tx = %tx_hash, error = %e, "Failed to record filtered entry");
    }
    warn!(tx = %tx_hash, address = %filtered, "Filtered address found in transaction");
}

impl fmt::Debug for Guardian {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Guardian")
            .field("filter_path", &self.filter_path)
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}
