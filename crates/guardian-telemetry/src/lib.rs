//! # Guardian Telemetry
//!
//! Installs the process-wide `tracing` subscriber for hosts embedding the
//! address guardian.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use guardian_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() {
//!     let config = TelemetryConfig::from_env();
//!     if let Err(e) = init_telemetry(&config) {
//!         eprintln!("telemetry disabled: {e}");
//!     }
//!     // Guardian log lines and filtered-transaction entries now flow
//!     // through the configured subscriber.
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `GUARDIAN_LOG_LEVEL` / `RUST_LOG` | `info` | Log level filter |
//! | `GUARDIAN_JSON_LOGS` | `false` (`true` in containers) | JSON formatted output |
//! | `GUARDIAN_CONSOLE_OUTPUT` | `true` | Write logs to stdout |
//! | `GUARDIAN_SERVICE_NAME` | `address-guardian` | Service name on the startup line |

mod config;
mod tracing_setup;

pub use config::TelemetryConfig;
pub use tracing_setup::{build_env_filter, init_telemetry};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Invalid log filter {filter:?}: {reason}")]
    InvalidFilter { filter: String, reason: String },

    #[error("A global tracing subscriber is already installed: {0}")]
    AlreadyInitialized(String),
}

/// Target used for filtered-transaction audit events.
///
/// Use it in a filter directive to route audit lines separately, e.g.
/// `GUARDIAN_LOG_LEVEL=warn,guardian::filtered=warn`.
pub const FILTERED_TARGET: &str = "guardian::filtered";
