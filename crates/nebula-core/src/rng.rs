//! Seeded random sources for reproducible runs.
//!
//! Every engine is generic over `rand::Rng`; this module fixes the
//! workspace default (ChaCha) and derives independent per-run seeds for
//! batches using the SplitMix64 finalizer.

use rand::SeedableRng;
use rand_chacha::ChaChaRng;

/// The generator used for scenarios. Deterministic across platforms.
pub type SimRng = ChaChaRng;

/// Create a generator from a 64-bit seed.
pub fn seeded(seed: u64) -> SimRng {
    ChaChaRng::seed_from_u64(seed)
}

/// Derive the seed for run `index` of a batch started from `base`.
///
/// Distinct indices give well-separated seeds, so batch members never share
/// a random stream.
pub fn derive_seed(base: u64, index: u64) -> u64 {
    let mut z = base.wrapping_add(index.wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
