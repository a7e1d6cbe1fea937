//! Optimal Bloom filter sizing
//!
//! - `m = -n * ln(p) / ln(2)^2`
//! - `k = (m / n) * ln(2)`
//! - `p ≈ (1 - e^(-kn/m))^k`

use std::f64::consts::LN_2;

use crate::error::FilterError;

/// Upper bound on hash functions per element.
pub const MAX_HASH_COUNT: usize = 32;

/// Sizing for one filter.
#[derive(Clone, Debug, PartialEq)]
pub struct BloomFilterParams {
    /// Number of bits in the filter
    pub size_bits: usize,
    /// Number of hash functions
    pub hash_count: usize,
    /// False positive rate at full capacity
    pub expected_fpr: f64,
}

/// Size a filter for `capacity` elements at `target_fpr`.
///
/// Rejects a zero capacity and rates outside the open interval (0, 1).
pub fn calculate_optimal_parameters(
    capacity: usize,
    target_fpr: f64,
) -> Result<BloomFilterParams, FilterError> {
    if capacity == 0 {
        return Err(FilterError::InvalidParameters(
            "capacity must be greater than zero".to_string(),
        ));
    }
    if !(target_fpr > 0.0 && target_fpr < 1.0) {
        return Err(FilterError::InvalidParameters(format!(
            "false positive rate must be in (0, 1), got {}",
            target_fpr
        )));
    }

    let n = capacity as f64;
    let m = ((-n * target_fpr.ln()) / (LN_2 * LN_2)).ceil().max(8.0) as usize;
    let k = ((m as f64 / n) * LN_2).round() as usize;
    let k = k.clamp(1, MAX_HASH_COUNT);

    Ok(BloomFilterParams {
        size_bits: m,
        hash_count: k,
        expected_fpr: calculate_fpr(m, capacity, k),
    })
}

/// False positive rate of a filter with `m` bits, `n` elements and `k` hashes.
pub fn calculate_fpr(m: usize, n: usize, k: usize) -> f64 {
    if m == 0 {
        return 1.0;
    }
    let exponent = -(k as f64) * (n as f64) / (m as f64);
    (1.0 - exponent.exp()).powi(k as i32)
}
