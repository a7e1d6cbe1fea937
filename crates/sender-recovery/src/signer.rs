//! # Transaction Signers
//!
//! A `Signer` knows how a transaction's signing hash is built and how `v`
//! encodes the recovery id, so it can both sign and recover the sender.
//!
//! - `HomesteadSigner`: hash over the six legacy fields, `v` in {27, 28}
//! - `Eip155Signer`: hash additionally commits to the chain id,
//!   `v = chain_id * 2 + 35 + recovery_id`. Unprotected transactions are
//!   still accepted and recovered under Homestead rules.

use std::fmt;

use k256::ecdsa::SigningKey;
use rlp::RlpStream;
use shared_types::{keccak256, Address, Hash, Transaction, TxSignature, U256};

use crate::domain::ecdsa::recover_address;
use crate::domain::errors::SignatureError;

/// Signing scheme for legacy transactions.
pub trait Signer: Send + Sync + fmt::Debug {
    /// Chain id this signer commits to, if any.
    fn chain_id(&self) -> Option<u64>;

    /// Hash that is signed for `tx`.
    fn signature_hash(&self, tx: &Transaction) -> Hash;

    /// `v` value to store for the given raw recovery id.
    fn encode_v(&self, recovery_id: u8) -> Result<u64, SignatureError>;

    /// Recover the sending address of `tx`.
    fn sender(&self, tx: &Transaction) -> Result<Address, SignatureError>;
}

/// Pre-EIP-155 signer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HomesteadSigner;

impl Signer for HomesteadSigner {
    fn chain_id(&self) -> Option<u64> {
        None
    }

    fn signature_hash(&self, tx: &Transaction) -> Hash {
        let mut stream = RlpStream::new_list(6);
        tx.append_unsigned_fields(&mut stream);
        keccak256(stream.as_raw())
    }

    fn encode_v(&self, recovery_id: u8) -> Result<u64, SignatureError> {
        Ok(27 + recovery_id as u64)
    }

    fn sender(&self, tx: &Transaction) -> Result<Address, SignatureError> {
        let v = tx.signature.v;
        if v != 27 && v != 28 {
            return Err(SignatureError::InvalidRecoveryId(v));
        }
        recover_address(
            &self.signature_hash(tx),
            &tx.signature.r,
            &tx.signature.s,
            (v - 27) as u8,
        )
    }
}

/// Replay-protected signer bound to one chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Eip155Signer {
    chain_id: u64,
}

impl Eip155Signer {
    pub fn new(chain_id: u64) -> Self {
        Self { chain_id }
    }

    /// `chain_id * 2 + 35`, or `None` if it does not fit in `v`.
    fn v_offset(&self) -> Option<u64> {
        self.chain_id.checked_mul(2)?.checked_add(35)
    }
}

impl Signer for Eip155Signer {
    fn chain_id(&self) -> Option<u64> {
        Some(self.chain_id)
    }

    fn signature_hash(&self, tx: &Transaction) -> Hash {
        let mut stream = RlpStream::new_list(9);
        tx.append_unsigned_fields(&mut stream);
        stream.append(&self.chain_id);
        stream.append(&0u8);
        stream.append(&0u8);
        keccak256(stream.as_raw())
    }

    fn encode_v(&self, recovery_id: u8) -> Result<u64, SignatureError> {
        self.v_offset()
            .and_then(|offset| offset.checked_add(recovery_id as u64))
            .ok_or_else(|| {
                SignatureError::SigningFailed(format!(
                    "chain id {} cannot be encoded in v",
                    self.chain_id
                ))
            })
    }

    fn sender(&self, tx: &Transaction) -> Result<Address, SignatureError> {
        if !tx.is_protected() {
            return HomesteadSigner.sender(tx);
        }

        let actual = tx.chain_id();
        if actual != Some(self.chain_id) {
            return Err(SignatureError::ChainIdMismatch {
                expected: self.chain_id,
                actual,
            });
        }

        let recovery_id = self
            .v_offset()
            .and_then(|offset| tx.signature.v.checked_sub(offset))
            .ok_or(SignatureError::InvalidRecoveryId(tx.signature.v))?;
        if recovery_id > 1 {
            return Err(SignatureError::InvalidRecoveryId(tx.signature.v));
        }

        recover_address(
            &self.signature_hash(tx),
            &tx.signature.r,
            &tx.signature.s,
            recovery_id as u8,
        )
    }
}

/// Recover the sender of `tx` under `signer`'s rules.
pub fn recover_sender(signer: &dyn Signer, tx: &Transaction) -> Result<Address, SignatureError> {
    signer.sender(tx)
}

/// Sign `tx` with `key`, returning the transaction with its signature set.
pub fn sign_transaction(
    tx: Transaction,
    signer: &dyn Signer,
    key: &SigningKey,
) -> Result<Transaction, SignatureError> {
    let hash = signer.signature_hash(&tx);
    let (sig, recovery_id) = key
        .sign_prehash_recoverable(&hash)
        .map_err(|e| SignatureError::SigningFailed(e.to_string()))?;

    if recovery_id.is_x_reduced() {
        return Err(SignatureError::SigningFailed(
            "x-reduced recovery id cannot be encoded in v".to_string(),
        ));
    }

    let (r, s) = sig.split_bytes();
    Ok(tx.with_signature(TxSignature {
        v: signer.encode_v(recovery_id.to_byte())?,
        r: U256::from_big_endian(&r),
        s: U256::from_big_endian(&s),
    }))
}
