//! # Signature Errors

use thiserror::Error;

/// Errors that can occur while recovering or producing a signature.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SignatureError {
    /// r or s is zero or not below the curve order
    #[error("Invalid signature format")]
    InvalidFormat,

    /// Signature has high S value (EIP-2 malleability protection)
    #[error("Malleable signature (high S value)")]
    MalleableSignature,

    /// `v` does not map to a recovery id under the signer's rules
    #[error("Invalid recovery ID: v = {0}")]
    InvalidRecoveryId(u64),

    /// Protected transaction signed for a different chain
    #[error("Chain id mismatch: expected {expected}, got {actual:?}")]
    ChainIdMismatch { expected: u64, actual: Option<u64> },

    /// Failed to recover public key from signature
    #[error("Failed to recover public key")]
    RecoveryFailed,

    /// The signing key could not produce a usable signature
    #[error("Signing failed: {0}")]
    SigningFailed(String),
}
