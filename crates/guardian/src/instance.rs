//! Process-wide guardian handle.
//!
//! `init_instance` runs construction at most once until `reset`. The init
//! guard is held for the whole construction, so concurrent callers block
//! and then observe the first caller's outcome.

use std::sync::Arc;

use parking_lot::{const_mutex, const_rwlock, Mutex, RwLock};
use tracing::{error, warn};

use crate::config::GuardianConfig;
use crate::error::GuardianError;
use crate::guardian::Guardian;

// `true` once an init attempt has run, successful or not
static INIT_GUARD: Mutex<bool> = const_mutex(false);
static INSTANCE: RwLock<Option<Arc<Guardian>>> = const_rwlock(None);

/// Construct the process-wide guardian, unless an attempt already ran.
///
/// A disabled config installs nothing and logs a warning. A construction
/// failure installs nothing and logs the error; the attempt still counts,
/// so later calls are no-ops until `reset`.
pub fn init_instance(config: GuardianConfig) {
    let mut attempted = INIT_GUARD.lock();
    if *attempted {
        return;
    }
    *attempted = true;

    if config.disabled {
        warn!("Guardian is disabled");
        return;
    }

    match Guardian::new(config) {
        Ok(guardian) => *INSTANCE.write() = Some(Arc::new(guardian)),
        Err(e) => error!(error = %e, "Failed to initialize Guardian"),
    }
}

/// The process-wide guardian, or `GuardianError::NotInitialized`.
pub fn get_instance() -> Result<Arc<Guardian>, GuardianError> {
    INSTANCE.read().clone().ok_or(GuardianError::NotInitialized)
}

/// Stop and drop the process-wide guardian and re-arm `init_instance`.
///
/// Safe to call when nothing is installed.
pub fn reset() {
    let mut attempted = INIT_GUARD.lock();
    let previous = INSTANCE.write().take();
    if let Some(guardian) = previous {
        guardian.stop();
    }
    *attempted = false;
}
