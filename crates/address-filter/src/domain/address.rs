//! Address validation and normalisation
//!
//! Keys are stored in the filter as `0x`-prefixed lowercase hex, so lookups
//! are case-insensitive regardless of how the caller spells the address.

use std::fmt;

use shared_types::{address_to_lower_hex, parse_address};

use crate::error::FilterError;

/// Turns caller-supplied address strings into canonical filter keys.
pub trait AddressHandler: Send + Sync + fmt::Debug {
    /// Reject strings that are not addresses of this chain family.
    fn validate(&self, address: &str) -> Result<(), FilterError>;

    /// Canonical key for `address`.
    fn normalize(&self, address: &str) -> Result<String, FilterError>;
}

/// 20-byte hex addresses, with or without `0x`, in any letter case.
#[derive(Debug, Clone, Copy, Default)]
pub struct EvmAddressHandler;

impl AddressHandler for EvmAddressHandler {
    fn validate(&self, address: &str) -> Result<(), FilterError> {
        self.normalize(address).map(|_| ())
    }

    fn normalize(&self, address: &str) -> Result<String, FilterError> {
        let parsed = parse_address(address.trim()).map_err(|e| FilterError::InvalidAddress {
            address: address.to_string(),
            reason: e.to_string(),
        })?;
        Ok(address_to_lower_hex(&parsed))
    }
}
