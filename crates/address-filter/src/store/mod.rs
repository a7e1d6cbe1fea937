//! Membership store backed by a Bloom filter, and its snapshot format

pub mod bloom_store;
pub mod snapshot;

pub use bloom_store::{BloomFilterStore, DEFAULT_CAPACITY, DEFAULT_FALSE_POSITIVE_RATE};
pub use snapshot::{decode_snapshot, encode_snapshot, read_snapshot, write_snapshot};
