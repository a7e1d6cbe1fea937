//! Core Bloom filter
//!
//! Guarantees:
//! - No false negatives: after `insert(x)`, `contains(x)` is always true.
//! - False positive rate tracks `(1 - e^(-kn/m))^k`.

use bitvec::prelude::*;
use serde::{Deserialize, Serialize};

use super::hash_functions::hash_positions;
use super::parameters::{calculate_fpr, calculate_optimal_parameters, MAX_HASH_COUNT};
use crate::error::FilterError;

/// Bloom filter over arbitrary byte strings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BloomFilter {
    /// Bit array storing the filter state
    #[serde(with = "bitvec_serde")]
    bits: BitVec<u8, Lsb0>,
    /// Number of hash functions (k)
    k: usize,
    /// Size in bits (m)
    m: usize,
    /// Number of insertions (n), duplicates included
    n: usize,
}

/// Serde support for BitVec
mod bitvec_serde {
    use bitvec::prelude::*;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(bits: &BitVec<u8, Lsb0>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (bits.as_raw_slice(), bits.len()).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<BitVec<u8, Lsb0>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let (bytes, len): (Vec<u8>, usize) = Deserialize::deserialize(deserializer)?;
        if len > bytes.len().saturating_mul(8) {
            return Err(serde::de::Error::custom(format!(
                "bit length {} exceeds {} stored bytes",
                len,
                bytes.len()
            )));
        }
        let mut bits = BitVec::<u8, Lsb0>::from_vec(bytes);
        bits.truncate(len);
        Ok(bits)
    }
}

impl BloomFilter {
    /// Create an empty filter with `m` bits and `k` hash functions.
    pub fn new(m: usize, k: usize) -> Result<Self, FilterError> {
        if m == 0 {
            return Err(FilterError::InvalidParameters(
                "filter size must be greater than zero".to_string(),
            ));
        }
        if k == 0 || k > MAX_HASH_COUNT {
            return Err(FilterError::InvalidParameters(format!(
                "hash count must be in 1..={}, got {}",
                MAX_HASH_COUNT, k
            )));
        }

        Ok(Self {
            bits: bitvec![u8, Lsb0; 0; m],
            k,
            m,
            n: 0,
        })
    }

    /// Create an empty filter sized for `capacity` elements at `target_fpr`.
    pub fn with_capacity(capacity: usize, target_fpr: f64) -> Result<Self, FilterError> {
        let params = calculate_optimal_parameters(capacity, target_fpr)?;
        Self::new(params.size_bits, params.hash_count)
    }

    /// Insert an element.
    pub fn insert(&mut self, element: &[u8]) {
        for pos in hash_positions(element, self.k, self.m) {
            self.bits.set(pos, true);
        }
        self.n += 1;
    }

    /// `false` means definitely absent; `true` means possibly present.
    pub fn contains(&self, element: &[u8]) -> bool {
        hash_positions(element, self.k, self.m).all(|pos| self.bits[pos])
    }

    /// Check structural consistency, e.g. after decoding untrusted bytes.
    pub fn validate(&self) -> Result<(), FilterError> {
        if self.m == 0 || self.bits.len() != self.m {
            return Err(FilterError::CorruptSnapshot(format!(
                "declared size {} does not match bit array of {}",
                self.m,
                self.bits.len()
            )));
        }
        if self.k == 0 || self.k > MAX_HASH_COUNT {
            return Err(FilterError::CorruptSnapshot(format!(
                "hash count {} out of range",
                self.k
            )));
        }
        Ok(())
    }

    /// Estimated false positive rate at the current fill.
    pub fn false_positive_rate(&self) -> f64 {
        calculate_fpr(self.m, self.n, self.k)
    }

    /// Number of bits set.
    pub fn bits_set(&self) -> usize {
        self.bits.count_ones()
    }

    /// Filter size in bits.
    pub fn size_bits(&self) -> usize {
        self.m
    }

    /// Number of hash functions.
    pub fn hash_count(&self) -> usize {
        self.k
    }

    /// Number of insertions performed.
    pub fn elements_inserted(&self) -> usize {
        self.n
    }

    /// Whether nothing has been inserted.
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_filter_is_empty() {
        let filter = BloomFilter::new(1000, 7).unwrap();

        assert_eq!(filter.size_bits(), 1000);
        assert_eq!(filter.hash_count(), 7);
        assert_eq!(filter.elements_inserted(), 0);
        assert_eq!(filter.bits_set(), 0);
        assert!(filter.is_empty());
        assert!(!filter.contains(b"anything"));
    }

    #[test]
    fn test_invalid_dimensions_rejected() {
        assert!(BloomFilter::new(0, 7).is_err());
        assert!(BloomFilter::new(1000, 0).is_err());
        assert!(BloomFilter::new(1000, MAX_HASH_COUNT + 1).is_err());
    }

    #[test]
    fn test_no_false_negatives() {
        let mut filter = BloomFilter::with_capacity(500, 0.001).unwrap();
        let elements: Vec<String> = (0..500).map(|i| format!("0x{:040x}", i)).collect();

        for element in &elements {
            filter.insert(element.as_bytes());
        }

        for element in &elements {
            assert!(filter.contains(element.as_bytes()), "lost {}", element);
        }
    }

    #[test]
    fn test_false_positive_rate_near_target() {
        let mut filter = BloomFilter::with_capacity(1000, 0.01).unwrap();
        for i in 0..1000 {
            filter.insert(format!("in-{}", i).as_bytes());
        }

        let false_positives = (0..10_000)
            .filter(|i| filter.contains(format!("out-{}", i).as_bytes()))
            .count();

        // Target 1%, allow up to 3%
        assert!(false_positives < 300, "{} false positives", false_positives);
        assert!(filter.false_positive_rate() < 0.02);
    }

    #[test]
    fn test_insert_sets_at_most_k_bits() {
        let mut filter = BloomFilter::new(10_000, 7).unwrap();
        filter.insert(b"0xabc");

        assert!(filter.bits_set() >= 1 && filter.bits_set() <= 7);
        assert_eq!(filter.elements_inserted(), 1);
    }

    #[test]
    fn test_serde_preserves_contents() {
        let mut filter = BloomFilter::new(333, 5).unwrap();
        filter.insert(b"0xdead");

        let bytes = bincode::serialize(&filter).unwrap();
        let decoded: BloomFilter = bincode::deserialize(&bytes).unwrap();

        assert_eq!(decoded, filter);
        assert!(decoded.contains(b"0xdead"));
        assert!(decoded.validate().is_ok());
    }

    #[test]
    fn test_validate_detects_size_mismatch() {
        let mut filter = BloomFilter::new(64, 3).unwrap();
        filter.m = 128;
        assert!(matches!(
            filter.validate(),
            Err(FilterError::CorruptSnapshot(_))
        ));
    }
}
