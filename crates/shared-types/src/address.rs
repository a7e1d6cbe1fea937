//! Address hex codecs.
//!
//! `address_to_checksum_hex` produces the EIP-55 mixed-case form, which is
//! what the guardian logs and hands to the membership store before
//! lower-casing it for lookup.

use crate::entities::{keccak256, Address};
use crate::errors::AddressParseError;

/// Parse a 20-byte address from hex, with or without `0x`, in any case.
pub fn parse_address(s: &str) -> Result<Address, AddressParseError> {
    let s = s.trim();
    let body = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);

    if body.len() != 40 {
        return Err(AddressParseError::InvalidLength(body.len()));
    }

    let mut address = [0u8; 20];
    hex::decode_to_slice(body, &mut address)
        .map_err(|e| AddressParseError::InvalidHex(e.to_string()))?;
    Ok(address)
}

/// `0x`-prefixed lowercase hex.
pub fn address_to_lower_hex(address: &Address) -> String {
    format!("0x{}", hex::encode(address))
}

/// EIP-55 checksummed hex.
pub fn address_to_checksum_hex(address: &Address) -> String {
    let lower = hex::encode(address);
    let hash = keccak256(lower.as_bytes());

    let mut out = String::with_capacity(42);
    out.push_str("0x");
    for (i, c) in lower.chars().enumerate() {
        let nibble = if i % 2 == 0 {
            hash[i / 2] >> 4
        } else {
            hash[i / 2] & 0x0f
        };
        if c.is_ascii_alphabetic() && nibble >= 8 {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
    }
    out
}
