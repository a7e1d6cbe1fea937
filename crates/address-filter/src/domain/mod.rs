//! Domain Layer - Pure filter logic
//!
//! - Bloom filter and its hashing
//! - Parameter sizing
//! - Address validation and normalisation
//!
//! No I/O and no async code lives here.

pub mod address;
pub mod bloom_filter;
pub mod hash_functions;
pub mod parameters;

pub use address::{AddressHandler, EvmAddressHandler};
pub use bloom_filter::BloomFilter;
pub use parameters::{calculate_optimal_parameters, BloomFilterParams};
