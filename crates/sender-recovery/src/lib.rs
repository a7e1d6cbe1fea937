//! # Sender Recovery
//!
//! Recovers the sending address of a signed transaction from its ECDSA
//! signature.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): secp256k1 recovery and signature-value checks
//! - **Signer** (`signer.rs`): per-scheme signing hashes (`Eip155Signer`,
//!   `HomesteadSigner`) behind the `Signer` trait
//!
//! ## Security Notes
//!
//! - **Malleability Prevention (EIP-2)**: signatures with high S values are rejected
//! - **Replay Protection (EIP-155)**: a protected transaction must carry the
//!   signer's chain id

pub mod domain;
pub mod signer;

pub use domain::ecdsa::{address_from_verifying_key, recover_address};
pub use domain::errors::SignatureError;
pub use signer::{recover_sender, sign_transaction, Eip155Signer, HomesteadSigner, Signer};

// Key type used to sign transactions
pub use k256::ecdsa::SigningKey;
