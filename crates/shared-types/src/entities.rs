//! # Core Entities
//!
//! Addresses, hashes and the signed legacy transaction that the guardian
//! screens.
//!
//! ## Encoding
//!
//! Transactions are identified by `keccak256(rlp(tx))` over the nine legacy
//! fields `[nonce, gasPrice, gas, to, value, data, v, r, s]`. Contract
//! creation encodes `to` as the empty string.

use rlp::RlpStream;
use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};

// Re-export U256 from primitive-types for use across all crates
pub use primitive_types::U256;

/// A 32-byte Keccak-256 hash.
pub type Hash = [u8; 32];

/// A 20-byte Ethereum address.
pub type Address = [u8; 20];

/// Keccak-256 over arbitrary bytes.
pub fn keccak256(data: &[u8]) -> Hash {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Render a hash as `0x`-prefixed lowercase hex.
pub fn hash_to_hex(hash: &Hash) -> String {
    format!("0x{}", hex::encode(hash))
}

/// ECDSA signature values as carried on a legacy transaction.
///
/// `v` is 27/28 for unprotected transactions and
/// `chain_id * 2 + 35 + recovery_id` for EIP-155 protected ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TxSignature {
    pub v: u64,
    pub r: U256,
    pub s: U256,
}

/// A signed legacy Ethereum transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Sender's nonce.
    pub nonce: u64,
    /// Gas price in wei.
    pub gas_price: U256,
    /// Gas limit.
    pub gas_limit: u64,
    /// Recipient; `None` for contract creation.
    pub to: Option<Address>,
    /// Value transferred in wei.
    pub value: U256,
    /// Call data or init code.
    pub data: Vec<u8>,
    /// Signature over the signing hash. All zero until signed.
    pub signature: TxSignature,
}

impl Transaction {
    /// Create an unsigned message-call transaction.
    pub fn new(
        nonce: u64,
        to: Address,
        value: U256,
        gas_limit: u64,
        gas_price: U256,
        data: Vec<u8>,
    ) -> Self {
        Self {
            nonce,
            gas_price,
            gas_limit,
            to: Some(to),
            value,
            data,
            signature: TxSignature::default(),
        }
    }

    /// Create an unsigned contract-creation transaction.
    pub fn new_contract_creation(
        nonce: u64,
        value: U256,
        gas_limit: u64,
        gas_price: U256,
        data: Vec<u8>,
    ) -> Self {
        Self {
            nonce,
            gas_price,
            gas_limit,
            to: None,
            value,
            data,
            signature: TxSignature::default(),
        }
    }

    /// Returns the recipient, if this is not a contract creation.
    pub fn to(&self) -> Option<&Address> {
        self.to.as_ref()
    }

    /// Whether this transaction carries an EIP-155 replay-protected `v`.
    ///
    /// Bare recovery ids (0, 1) and Homestead values (27, 28) are not.
    pub fn is_protected(&self) -> bool {
        !matches!(self.signature.v, 0 | 1 | 27 | 28)
    }

    /// Chain id encoded in `v`, for protected transactions.
    pub fn chain_id(&self) -> Option<u64> {
        let v = self.signature.v;
        if !self.is_protected() || v < 35 {
            return None;
        }
        Some((v - 35) / 2)
    }

    /// Append the six unsigned legacy fields to an RLP list.
    pub fn append_unsigned_fields(&self, stream: &mut RlpStream) {
        stream.append(&self.nonce);
        stream.append(&self.gas_price);
        stream.append(&self.gas_limit);
        match &self.to {
            Some(to) => {
                stream.append(&to.to_vec());
            }
            None => {
                stream.append_empty_data();
            }
        }
        stream.append(&self.value);
        stream.append(&self.data);
    }

    /// Full RLP encoding of the signed transaction.
    pub fn rlp_bytes(&self) -> Vec<u8> {
        let mut stream = RlpStream::new_list(9);
        self.append_unsigned_fields(&mut stream);
        stream.append(&self.signature.v);
        stream.append(&self.signature.r);
        stream.append(&self.signature.s);
        stream.as_raw().to_vec()
    }

    /// Transaction hash: `keccak256(rlp(tx))`.
    pub fn hash(&self) -> Hash {
        keccak256(&self.rlp_bytes())
    }

    /// Transaction hash as `0x` hex, the form used in log lines.
    pub fn hash_hex(&self) -> String {
        hash_to_hex(&self.hash())
    }

    /// Copy of this transaction carrying the given signature.
    pub fn with_signature(mut self, signature: TxSignature) -> Self {
        self.signature = signature;
        self
    }
}
