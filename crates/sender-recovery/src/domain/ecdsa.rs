//! # ECDSA Recovery (secp256k1)
//!
//! Recovers an Ethereum address from a prehashed message and `(r, s, recovery_id)`.
//!
//! ## Security Notes
//!
//! - **Scalar Range Validation**: r and s must be in [1, n-1]
//! - **Malleability Prevention (EIP-2)**: s must be in the lower half of the order
//! - Uses k256 crate for cryptographic operations

use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};
use shared_types::{keccak256, Address, Hash, U256};

use super::errors::SignatureError;

/// secp256k1 curve order n
pub const SECP256K1_ORDER: [u8; 32] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE,
    0xBA, 0xAE, 0xDC, 0xE6, 0xAF, 0x48, 0xA0, 0x3B, 0xBF, 0xD2, 0x5E, 0x8C, 0xD0, 0x36, 0x41, 0x41,
];

/// Recover the signer's address.
///
/// `recovery_id` is the raw parity bit (0 or 1), already stripped of any
/// Homestead or EIP-155 offset.
pub fn recover_address(
    message_hash: &Hash,
    r: &U256,
    s: &U256,
    recovery_id: u8,
) -> Result<Address, SignatureError> {
    let recovery_id = RecoveryId::from_byte(recovery_id)
        .filter(|id| !id.is_x_reduced())
        .ok_or(SignatureError::InvalidRecoveryId(recovery_id as u64))?;

    let mut sig_bytes = [0u8; 64];
    r.to_big_endian(&mut sig_bytes[..32]);
    s.to_big_endian(&mut sig_bytes[32..]);

    // Rejects r or s of zero or >= n
    let sig = Signature::from_slice(&sig_bytes).map_err(|_| SignatureError::InvalidFormat)?;

    // normalize_s() only returns Some for high-S signatures
    if sig.normalize_s().is_some() {
        return Err(SignatureError::MalleableSignature);
    }

    let recovered_key = VerifyingKey::recover_from_prehash(message_hash, &sig, recovery_id)
        .map_err(|_| SignatureError::RecoveryFailed)?;

    Ok(address_from_verifying_key(&recovered_key))
}

/// Derive the Ethereum address of a public key: last 20 bytes of
/// keccak256 over the uncompressed point without its 0x04 prefix.
pub fn address_from_verifying_key(public_key: &VerifyingKey) -> Address {
    let encoded = public_key.to_encoded_point(false);
    let hash = keccak256(&encoded.as_bytes()[1..]);

    let mut address = [0u8; 20];
    address.copy_from_slice(&hash[12..]);
    address
}
