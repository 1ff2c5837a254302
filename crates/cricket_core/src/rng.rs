//! Seeded random source.
//!
//! The core never touches a process-wide generator. Every engine receives a
//! `SimRng` at construction and carries its state in snapshots.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Generator used by every engine.
pub type SimRng = ChaCha8Rng;

pub fn rng_from_seed(seed: u64) -> SimRng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Derive an independent child seed (SplitMix64 finaliser).
///
/// Used to give each tournament fixture its own stream without sharing
/// generator state between matches.
pub fn derive_seed(seed: u64, salt: u64) -> u64 {
    let mut z = seed ^ salt.wrapping_mul(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
