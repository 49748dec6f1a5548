//! Procedural blue noise threshold masks.
//!
//! A [`BlueNoiseMask`] ranks every cell of an N×N grid by the order in which a
//! farthest-point greedy pass reaches it: each step picks the cell whose
//! toroidal distance to every already-picked cell is largest. Low ranks are
//! therefore spread evenly across the tile with no directional clustering,
//! and the tile wraps seamlessly because distances are measured on a torus.
//!
//! Construction is O(N⁴). It runs once per [`BlueNoise`] provider and the
//! result is shared read-only through an [`Arc`].

use std::sync::{Arc, OnceLock};
use std::time::Instant;

use crate::api::DitherError;
use crate::rng::SeededRng;

/// Default mask edge length.
pub const BLUE_NOISE_SIZE: usize = 64;

/// Largest accepted mask edge length.
///
/// Construction cost grows with N⁴.
pub const MAX_BLUE_NOISE_SIZE: usize = 256;

/// Seed used for the default mask so every process builds the same table.
pub const BLUE_NOISE_SEED: u32 = 0x5EED_B10E;

/// An N×N table holding a permutation of `0..N²`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlueNoiseMask {
    size: usize,
    /// Row-major ranks, `ranks[y * size + x]`.
    ranks: Vec<u32>,
}

impl BlueNoiseMask {
    /// Build a mask of edge length `size` from `seed`.
    ///
    /// Returns [`DitherError::InvalidMaskSize`] unless
    /// `1 <= size <= MAX_BLUE_NOISE_SIZE`.
    pub fn build(size: usize, seed: u32) -> Result<Self, DitherError> {
        if !is_valid_size(size) {
            return Err(DitherError::InvalidMaskSize(size));
        }
        Ok(Self::generate(size, seed))
    }

    fn generate(size: usize, seed: u32) -> Self {
        let cells = size * size;
        let mut min_dist = vec![usize::MAX; cells];
        let mut chosen = vec![false; cells];
        let mut ranks = vec![0u32; cells];

        let mut rng = SeededRng::new(seed);
        let mut current = ((rng.next_f64() * cells as f64) as usize).min(cells - 1);

        for rank in 0..cells {
            chosen[current] = true;
            ranks[current] = rank as u32;
            let (cx, cy) = (current % size, current / size);

            // Fold the new point into every running minimum and find the
            // farthest unchosen cell in the same sweep. Strict `>` keeps the
            // lowest index on ties.
            let mut next = None;
            let mut next_dist = 0;
            for idx in 0..cells {
                if chosen[idx] {
                    continue;
                }
                let d = toroidal_sq_distance(idx % size, idx / size, cx, cy, size);
                if d < min_dist[idx] {
                    min_dist[idx] = d;
                }
                if next.is_none() || min_dist[idx] > next_dist {
                    next = Some(idx);
                    next_dist = min_dist[idx];
                }
            }

            match next {
                Some(idx) => current = idx,
                None => break,
            }
        }

        Self { size, ranks }
    }

    /// Edge length N.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// All ranks in row-major order.
    #[inline]
    pub fn ranks(&self) -> &[u32] {
        &self.ranks
    }

    /// Rank of the cell at `(x, y)`, wrapping both coordinates.
    #[inline]
    pub fn rank(&self, x: i64, y: i64) -> u32 {
        let n = self.size as i64;
        let wx = x.rem_euclid(n) as usize;
        let wy = y.rem_euclid(n) as usize;
        self.ranks[wy * self.size + wx]
    }

    /// Threshold at `(x, y)`: `rank / (N² - 1)`.
    ///
    /// Coordinates of any sign wrap modulo N. A 1×1 mask always yields 0.
    #[inline]
    pub fn threshold(&self, x: i64, y: i64) -> f32 {
        let max_rank = self.ranks.len() - 1;
        if max_rank == 0 {
            return 0.0;
        }
        self.rank(x, y) as f32 / max_rank as f32
    }
}

fn is_valid_size(size: usize) -> bool {
    (1..=MAX_BLUE_NOISE_SIZE).contains(&size)
}

/// Squared Euclidean distance between two cells on an N×N torus.
#[inline]
fn toroidal_sq_distance(ax: usize, ay: usize, bx: usize, by: usize, size: usize) -> usize {
    let wrap = |d: usize| if d * 2 > size { size - d } else { d };
    let dx = wrap(ax.abs_diff(bx));
    let dy = wrap(ay.abs_diff(by));
    dx * dx + dy * dy
}

/// Lazily built, memoized blue noise mask.
///
/// One provider is meant to live as long as the component that dithers with
/// it. The first [`mask()`](Self::mask) call pays the construction cost; later
/// calls return the cached table.
#[derive(Debug)]
pub struct BlueNoise {
    size: usize,
    seed: u32,
    mask: OnceLock<Arc<BlueNoiseMask>>,
}

impl Default for BlueNoise {
    fn default() -> Self {
        Self::new()
    }
}

impl BlueNoise {
    /// Provider for the default 64×64 mask.
    pub fn new() -> Self {
        Self {
            size: BLUE_NOISE_SIZE,
            seed: BLUE_NOISE_SEED,
            mask: OnceLock::new(),
        }
    }

    /// Provider for a mask of a custom size and seed.
    pub fn with_params(size: usize, seed: u32) -> Result<Self, DitherError> {
        if !is_valid_size(size) {
            return Err(DitherError::InvalidMaskSize(size));
        }
        Ok(Self {
            size,
            seed,
            mask: OnceLock::new(),
        })
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Whether the mask has been built yet.
    pub fn is_built(&self) -> bool {
        self.mask.get().is_some()
    }

    /// The mask, building it on first use.
    pub fn mask(&self) -> Arc<BlueNoiseMask> {
        self.mask
            .get_or_init(|| {
                let started = Instant::now();
                let mask = BlueNoiseMask::generate(self.size, self.seed);
                tracing::debug!(
                    size = self.size,
                    seed = self.seed,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Built blue noise mask"
                );
                Arc::new(mask)
            })
            .clone()
    }

    /// Shorthand for `self.mask().threshold(x, y)`.
    pub fn threshold(&self, x: i64, y: i64) -> f32 {
        self.mask().threshold(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_bijection(mask: &BlueNoiseMask) {
        let cells = mask.size() * mask.size();
        let mut seen = vec![false; cells];
        for &rank in mask.ranks() {
            let rank = rank as usize;
            assert!(rank < cells, "rank {rank} out of range");
            assert!(!seen[rank], "rank {rank} appears twice");
            seen[rank] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_small_masks_are_bijections() {
        for size in 1..=12 {
            let mask = BlueNoiseMask::build(size, 7).unwrap();
            assert_eq!(mask.ranks().len(), size * size);
            assert_bijection(&mask);
        }
    }

    #[test]
    fn test_default_mask_is_bijection() {
        let provider = BlueNoise::new();
        let mask = provider.mask();
        assert_eq!(mask.size(), BLUE_NOISE_SIZE);
        assert_bijection(&mask);
    }

    #[test]
    fn test_zero_size_rejected() {
        assert_eq!(
            BlueNoiseMask::build(0, 1),
            Err(DitherError::InvalidMaskSize(0))
        );
        assert!(BlueNoise::with_params(0, 1).is_err());
    }

    #[test]
    fn test_oversized_mask_rejected_before_allocation() {
        let too_big = MAX_BLUE_NOISE_SIZE + 1;
        assert_eq!(
            BlueNoiseMask::build(too_big, 1),
            Err(DitherError::InvalidMaskSize(too_big))
        );
        assert_eq!(
            BlueNoise::with_params(65_535, 1).unwrap_err(),
            DitherError::InvalidMaskSize(65_535)
        );
        assert!(BlueNoise::with_params(usize::MAX, 1).is_err());
        assert!(is_valid_size(MAX_BLUE_NOISE_SIZE));
    }

    #[test]
    fn test_single_cell_mask_does_not_divide_by_zero() {
        let mask = BlueNoiseMask::build(1, 99).unwrap();
        assert_eq!(mask.ranks(), &[0]);
        assert_eq!(mask.threshold(5, -3), 0.0);
    }

    #[test]
    fn test_same_seed_same_mask() {
        let a = BlueNoiseMask::build(16, 1234).unwrap();
        let b = BlueNoiseMask::build(16, 1234).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_first_cell_comes_from_seeded_rng() {
        let size = 16;
        let seed = 77;
        let mask = BlueNoiseMask::build(size, seed).unwrap();
        let expected = (SeededRng::new(seed).next_f64() * (size * size) as f64) as usize;
        let first = mask.ranks().iter().position(|&r| r == 0).unwrap();
        assert_eq!(first, expected);
    }

    #[test]
    fn test_second_cell_is_farthest_from_first() {
        let size = 8;
        let mask = BlueNoiseMask::build(size, 5).unwrap();
        let first = mask.ranks().iter().position(|&r| r == 0).unwrap();
        let second = mask.ranks().iter().position(|&r| r == 1).unwrap();
        let d = toroidal_sq_distance(
            first % size,
            first / size,
            second % size,
            second / size,
            size,
        );
        // On an 8×8 torus the farthest cell is offset by (4, 4)
        assert_eq!(d, 32);
    }

    #[test]
    fn test_toroidal_wraparound() {
        let provider = BlueNoise::with_params(16, 3).unwrap();
        let mask = provider.mask();
        let n = mask.size() as i64;
        for y in -20..20 {
            for x in -20..20 {
                let t = mask.threshold(x, y);
                assert_eq!(t, mask.threshold(x + n, y));
                assert_eq!(t, mask.threshold(x, y + n));
            }
        }
    }

    #[test]
    fn test_threshold_range() {
        let mask = BlueNoiseMask::build(8, 11).unwrap();
        let mut max = 0.0f32;
        for y in 0..8 {
            for x in 0..8 {
                let t = mask.threshold(x, y);
                assert!((0.0..=1.0).contains(&t));
                max = max.max(t);
            }
        }
        assert_eq!(max, 1.0);
    }

    #[test]
    fn test_early_ranks_are_not_clustered() {
        // 31 points with 5-cell plus-shaped neighborhoods cannot cover a
        // 16×16 torus, so each of the first 32 picks sits at squared
        // distance >= 2 from all earlier ones: no two are 4-adjacent.
        let size = 16;
        let mask = BlueNoiseMask::build(size, 21).unwrap();
        let early: Vec<(i64, i64)> = (0..size as i64)
            .flat_map(|y| (0..size as i64).map(move |x| (x, y)))
            .filter(|&(x, y)| mask.rank(x, y) < 32)
            .collect();
        assert_eq!(early.len(), 32);
        for &(x, y) in &early {
            for (dx, dy) in [(1, 0), (-1, 0), (0, 1), (0, -1)] {
                assert!(
                    mask.rank(x + dx, y + dy) >= 32,
                    "early ranks clustered at ({x}, {y})"
                );
            }
        }
    }

    #[test]
    fn test_toroidal_distance_wraps() {
        assert_eq!(toroidal_sq_distance(0, 0, 7, 0, 8), 1);
        assert_eq!(toroidal_sq_distance(0, 0, 4, 4, 8), 32);
        assert_eq!(toroidal_sq_distance(1, 1, 1, 1, 8), 0);
        assert_eq!(toroidal_sq_distance(0, 0, 0, 5, 8), 9);
    }

    #[test]
    fn test_provider_memoizes() {
        let provider = BlueNoise::with_params(8, 2).unwrap();
        assert!(!provider.is_built());
        let a = provider.mask();
        assert!(provider.is_built());
        let b = provider.mask();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
