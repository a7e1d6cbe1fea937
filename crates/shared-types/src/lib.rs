//! # Shared Types Crate
//!
//! Primitive types used across the address-screening workspace.
//!
//! ## Contents
//!
//! - `Address` / `Hash` aliases and their hex codecs (EIP-55 checksums)
//! - `Transaction`: a signed legacy Ethereum transaction with its RLP hash
//! - `keccak256`: the hash used for addresses, checksums and transaction ids

pub mod address;
pub mod entities;
pub mod errors;

pub use address::{address_to_checksum_hex, address_to_lower_hex, parse_address};
pub use entities::*;
pub use errors::*;
