//! # Guardian
//!
//! In-process address screening for a transaction pipeline. For every
//! transaction the guardian decides whether its sender or recipient is on
//! a blocklist; hits are reported with a boolean verdict and an audit
//! entry. The blocklist is a Bloom-filter snapshot on disk that is polled
//! and hot-swapped without pausing lookups.
//!
//! ## Error policy
//!
//! Screening fails open. A sender that cannot be recovered, or a lookup
//! that errors, is treated as "not filtered" and logged. Construction
//! failures leave no instance installed; callers of `get_instance` choose
//! their own policy when screening is unavailable.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use guardian::{get_instance, init_instance, GuardianConfig};
//! use sender_recovery::Eip155Signer;
//!
//! init_instance(GuardianConfig::from_env());
//!
//! if let Ok(guardian) = get_instance() {
//!     if guardian.check_transaction(&Eip155Signer::new(chain_id), &tx) {
//!         // flagged: sender or recipient is blocklisted
//!     }
//! }
//! ```

pub mod config;
pub mod error;
pub mod filtered_log;
pub mod guardian;
pub mod instance;
pub mod paths;

pub use config::{GuardianConfig, DEFAULT_POLL_INTERVAL};
pub use error::GuardianError;
pub use filtered_log::{
    FilteredEntryLogger, FilteredTxLogEntry, JsonLinesFilteredEntryLogger,
    TracingFilteredEntryLogger,
};
pub use guardian::{screen_transaction, Guardian};
pub use instance::{get_instance, init_instance, reset};
pub use paths::{default_filter_path, Platform, FILTER_FILE_NAME};
