//! Shared fixtures for guardian integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use address_filter::{BloomFilterStore, EvmAddressHandler, FilterError, MembershipStore};
use guardian::{FilteredEntryLogger, FilteredTxLogEntry, GuardianError};
use parking_lot::Mutex;
use rand::rngs::OsRng;
use sender_recovery::{address_from_verifying_key, sign_transaction, Eip155Signer, SigningKey};
use shared_types::{address_to_checksum_hex, parse_address, Address, Transaction, U256};

pub const CHAIN_ID: u64 = 18;

/// Blocklisted in most fixtures
pub const LISTED: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
pub const ALSO_LISTED: &str = "0x97DCA899a2278d010d678d64fBC7C718eD5D4939";
/// Never blocklisted
pub const CLEAN: &str = "0x810205E412eB4b9f8A7faEF8faE4cF08D7c680e1";

pub fn signer() -> Eip155Signer {
    Eip155Signer::new(CHAIN_ID)
}

pub fn address(hex: &str) -> Address {
    parse_address(hex).unwrap()
}

pub struct Account {
    pub key: SigningKey,
    pub address: Address,
}

impl Account {
    pub fn random() -> Self {
        let key = SigningKey::random(&mut OsRng);
        let address = address_from_verifying_key(key.verifying_key());
        Self { key, address }
    }

    pub fn hex(&self) -> String {
        address_to_checksum_hex(&self.address)
    }

    /// Signed EIP-155 transfer to `to`.
    pub fn transfer_to(&self, to: &str) -> Transaction {
        let tx = Transaction::new(0, address(to), U256::zero(), 21_000, U256::from(1u64), vec![]);
        sign_transaction(tx, &signer(), &self.key).unwrap()
    }
}

/// Write a snapshot containing `addresses` to `path`.
pub fn write_filter<S: AsRef<str>>(path: &Path, addresses: &[S]) {
    let store =
        BloomFilterStore::with_capacity(Arc::new(EvmAddressHandler), 1_000, 0.000_01).unwrap();
    store
        .add_addresses(addresses.iter().map(|a| a.as_ref()))
        .unwrap();
    store.save_to_file(path).unwrap();
}

pub fn filter_file<S: AsRef<str>>(dir: &Path, name: &str, addresses: &[S]) -> PathBuf {
    let path = dir.join(name);
    write_filter(&path, addresses);
    path
}

/// Keeps every entry it is given.
#[derive(Default)]
pub struct RecordingLogger {
    pub entries: Mutex<Vec<FilteredTxLogEntry>>,
}

impl RecordingLogger {
    pub fn entries(&self) -> Vec<FilteredTxLogEntry> {
        self.entries.lock().clone()
    }
}

impl FilteredEntryLogger for RecordingLogger {
    fn log(&self, entry: &FilteredTxLogEntry) -> Result<(), GuardianError> {
        self.entries.lock().push(entry.clone());
        Ok(())
    }
}

/// Always fails.
pub struct BrokenLogger;

impl FilteredEntryLogger for BrokenLogger {
    fn log(&self, _entry: &FilteredTxLogEntry) -> Result<(), GuardianError> {
        Err(GuardianError::AuditLog {
            path: PathBuf::from("/dev/full"),
            source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
        })
    }
}

/// Fails lookups of one address and answers the rest from `inner`.
pub struct FailingLookupStore {
    pub failing: String,
    pub inner: BloomFilterStore,
}

impl FailingLookupStore {
    pub fn new<S: AsRef<str>>(failing: &str, listed: &[S]) -> Self {
        let inner =
            BloomFilterStore::with_capacity(Arc::new(EvmAddressHandler), 1_000, 0.000_01).unwrap();
        inner
            .add_addresses(listed.iter().map(|a| a.as_ref()))
            .unwrap();
        Self {
            failing: failing.to_lowercase(),
            inner,
        }
    }
}

impl MembershipStore for FailingLookupStore {
    fn check_address(&self, address: &str) -> Result<bool, FilterError> {
        if address.to_lowercase() == self.failing {
            return Err(FilterError::InvalidAddress {
                address: address.to_string(),
                reason: "lookup unavailable".to_string(),
            });
        }
        self.inner.check_address(address)
    }
}

pub fn wait_for(what: &str, mut condition: impl FnMut() -> bool) {
    let deadline = Instant::now() + Duration::from_secs(10);
    while !condition() {
        assert!(Instant::now() < deadline, "timed out waiting for {}", what);
        std::thread::sleep(Duration::from_millis(10));
    }
}
