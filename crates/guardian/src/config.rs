//! Guardian configuration.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;

/// How often the filter file is polled for changes
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Configuration fixed at construction time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardianConfig {
    /// Snapshot file; the platform default when `None`
    pub filter_file_path: Option<PathBuf>,

    /// When set, `init_instance` installs no guardian
    pub disabled: bool,

    /// Poll period of the file watcher
    pub poll_interval: Duration,
}

impl Default for GuardianConfig {
    fn default() -> Self {
        Self {
            filter_file_path: None,
            disabled: false,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl GuardianConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create configuration from environment variables.
    ///
    /// - `GUARDIAN_FILTER_FILE`: snapshot path (default: platform path)
    /// - `GUARDIAN_DISABLED`: `true`/`1` disables screening (default: false)
    /// - `GUARDIAN_POLL_INTERVAL_SECS`: poll period (default: 10)
    ///
    /// Unparseable values fall back to the default with a warning.
    pub fn from_env() -> Self {
        let filter_file_path = env::var("GUARDIAN_FILTER_FILE")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        let disabled = env::var("GUARDIAN_DISABLED")
            .map(|v| v.to_lowercase() == "true" || v == "1")
            .unwrap_or(false);

        let poll_interval = match env::var("GUARDIAN_POLL_INTERVAL_SECS") {
            Ok(v) => match v.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    warn!(value = %v, "Invalid GUARDIAN_POLL_INTERVAL_SECS, using default");
                    DEFAULT_POLL_INTERVAL
                }
            },
            Err(_) => DEFAULT_POLL_INTERVAL,
        };

        Self {
            filter_file_path,
            disabled,
            poll_interval,
        }
    }

    pub fn with_filter_file_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.filter_file_path = Some(path.into());
        self
    }

    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }
}
