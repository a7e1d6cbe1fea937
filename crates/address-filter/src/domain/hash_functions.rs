//! Hash functions for the Bloom filter
//!
//! Two MurmurHash3 (x64, 128-bit) evaluations with different seeds feed a
//! double-hashing scheme, `g_i(x) = h1(x) + i * h2(x) mod m`.

use std::io::Cursor;

/// Lower 64 bits of MurmurHash3 x64/128 under `seed`.
pub fn murmur_hash(element: &[u8], seed: u32) -> u64 {
    let mut cursor = Cursor::new(element);
    // Reading from an in-memory cursor cannot fail
    murmur3::murmur3_x64_128(&mut cursor, seed).unwrap_or(0) as u64
}

/// Iterator over the `k` bit positions for `element` in a filter of `m` bits.
///
/// `m` must be non-zero.
pub fn hash_positions(element: &[u8], k: usize, m: usize) -> impl Iterator<Item = usize> {
    let h1 = murmur_hash(element, 0);
    let h2 = murmur_hash(element, 1);
    let m = m as u64;

    (0..k as u64).map(move |i| (h1.wrapping_add(i.wrapping_mul(h2)) % m) as usize)
}
