//! Seeded pseudo-random numbers for reproducible noise patterns.
//!
//! [`SeededRng`] is a Mulberry32 generator: 32 bits of state, a full 2^32
//! period, and identical output for identical seeds on every platform.
//! [`hash_to_seed`] turns human-readable tokens (preset names, seed phrases)
//! into seeds so the same text always yields the same noise.

use rand::{Error, RngCore, SeedableRng};

/// Increment added to the state on every draw.
const MULBERRY_INCREMENT: u32 = 0x6D2B_79F5;

/// FNV-1a 32-bit offset basis.
const FNV_OFFSET_BASIS: u32 = 2_166_136_261;

/// FNV-1a 32-bit prime.
const FNV_PRIME: u32 = 16_777_619;

/// Deterministic uniform generator seeded from a 32-bit value.
///
/// Each instance carries its own state; two generators created from the same
/// seed produce the same infinite sequence.
///
/// # Example
///
/// ```
/// use stipple_core::SeededRng;
///
/// let mut a = SeededRng::new(42);
/// let mut b = SeededRng::new(42);
/// assert_eq!(a.next_f64(), b.next_f64());
/// ```
#[derive(Debug, Clone)]
pub struct SeededRng {
    state: u32,
}

impl SeededRng {
    /// Create a generator from a 32-bit seed.
    #[inline]
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Create a generator seeded by [`hash_to_seed`] of `text`.
    pub fn from_text(text: &str) -> Self {
        Self::new(hash_to_seed(text))
    }

    /// Next raw 32-bit output.
    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(MULBERRY_INCREMENT);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^ (t >> 14)
    }

    /// Next float, uniform in `[0, 1)`.
    #[inline]
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32()) / 4_294_967_296.0
    }
}

impl RngCore for SeededRng {
    #[inline]
    fn next_u32(&mut self) -> u32 {
        SeededRng::next_u32(self)
    }

    fn next_u64(&mut self) -> u64 {
        let lo = u64::from(SeededRng::next_u32(self));
        let hi = u64::from(SeededRng::next_u32(self));
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = SeededRng::next_u32(self).to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for SeededRng {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u32::from_le_bytes(seed))
    }
}

/// Hash text to a 32-bit seed with FNV-1a.
///
/// Case-sensitive and byte-exact: no trimming or normalization is applied.
/// The empty string hashes to the FNV offset basis.
pub fn hash_to_seed(text: &str) -> u32 {
    text.bytes().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ u32::from(byte)).wrapping_mul(FNV_PRIME)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::seq::SliceRandom;

    #[test]
    fn test_same_seed_same_sequence() {
        for seed in [0u32, 1, 42, 0xDEAD_BEEF, u32::MAX] {
            let mut a = SeededRng::new(seed);
            let mut b = SeededRng::new(seed);
            for _ in 0..1000 {
                assert_eq!(a.next_f64().to_bits(), b.next_f64().to_bits());
            }
        }
    }

    #[test]
    fn test_different_seeds_diverge() {
        let mut a = SeededRng::new(1);
        let mut b = SeededRng::new(2);
        let a_draws: Vec<u32> = (0..16).map(|_| a.next_u32()).collect();
        let b_draws: Vec<u32> = (0..16).map(|_| b.next_u32()).collect();
        assert_ne!(a_draws, b_draws);
    }

    #[test]
    fn test_output_in_unit_interval() {
        for seed in [0u32, 7, 12345, u32::MAX] {
            let mut rng = SeededRng::new(seed);
            for _ in 0..10_000 {
                let v = rng.next_f64();
                assert!((0.0..1.0).contains(&v), "draw {v} out of range");
            }
        }
    }

    #[test]
    fn test_mean_is_roughly_half() {
        let mut rng = SeededRng::new(2024);
        let n = 20_000;
        let mean: f64 = (0..n).map(|_| rng.next_f64()).sum::<f64>() / n as f64;
        assert!((mean - 0.5).abs() < 0.02, "mean {mean}");
    }

    #[test]
    fn test_hash_is_deterministic() {
        assert_eq!(hash_to_seed("test"), hash_to_seed("test"));
    }

    #[test]
    fn test_hash_is_case_sensitive() {
        assert_ne!(hash_to_seed("Test"), hash_to_seed("test"));
    }

    #[test]
    fn test_hash_of_empty_string_is_offset_basis() {
        assert_eq!(hash_to_seed(""), FNV_OFFSET_BASIS);
    }

    #[test]
    fn test_hash_known_value() {
        // FNV-1a("a") reference value
        assert_eq!(hash_to_seed("a"), 0xE40C_292C);
    }

    #[test]
    fn test_from_text_matches_hashed_seed() {
        let mut a = SeededRng::from_text("newsprint");
        let mut b = SeededRng::new(hash_to_seed("newsprint"));
        assert_eq!(a.next_u32(), b.next_u32());
    }

    #[test]
    fn test_drives_rand_shuffle_reproducibly() {
        let mut first: Vec<u32> = (0..32).collect();
        let mut second = first.clone();
        first.shuffle(&mut SeededRng::new(9));
        second.shuffle(&mut SeededRng::new(9));
        assert_eq!(first, second);
        assert_ne!(first, (0..32).collect::<Vec<_>>());
    }

    #[test]
    fn test_fill_bytes_handles_partial_chunks() {
        let mut rng = SeededRng::new(3);
        let mut buf = [0u8; 7];
        rng.fill_bytes(&mut buf);
        let mut reference = SeededRng::new(3);
        let first = reference.next_u32().to_le_bytes();
        assert_eq!(&buf[..4], &first);
    }

    #[test]
    fn test_from_seed_uses_little_endian() {
        let mut a = SeededRng::from_seed(42u32.to_le_bytes());
        let mut b = SeededRng::new(42);
        assert_eq!(a.next_u32(), b.next_u32());
    }
}
