//! # Error Types
//!
//! Errors raised while decoding shared primitives.

use thiserror::Error;

/// Failure to parse a textual address.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AddressParseError {
    /// Wrong number of hex digits after the optional `0x` prefix.
    #[error("Invalid address length: expected 40 hex characters, got {0}")]
    InvalidLength(usize),

    /// Non-hex character in the address body.
    #[error("Invalid hex in address: {0}")]
    InvalidHex(String),
}
