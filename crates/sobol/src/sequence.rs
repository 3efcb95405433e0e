use crate::direction::{direction_numbers_for, fixed_direction_seed};
use crate::scrambling::ScramblingTable;
use lifesim_rng::MasterSeed;
use std::sync::Arc;

const BITS: usize = 32;
const NORM: f64 = 1.0 / (1u64 << 32) as f64;

/// Per-instance scrambled-Sobol sequence position (§3 `SobolState`):
/// dimension, point count, and the per-dimension 32-bit Gray-code state.
/// The direction-number table and the Owen scrambling cache are shared,
/// process-scoped, immutable resources (§5) — this struct only owns its
/// own walk through the sequence.
pub struct ScrambledSobol {
    dimension: usize,
    count: u64,
    state: Vec<u32>,
    direction: Vec<[u32; BITS]>,
    scrambler: Arc<ScramblingTable>,
}

impl ScrambledSobol {
    pub fn new(dimension: usize, master_seed: MasterSeed) -> Self {
        Self::with_scrambler(dimension, Arc::new(ScramblingTable::new(master_seed)))
    }

    /// Construct sharing an already-populated scrambling cache, so
    /// multiple sequences (e.g. one per worker) reuse the same
    /// process-scoped permutation table (§5).
    pub fn with_scrambler(dimension: usize, scrambler: Arc<ScramblingTable>) -> Self {
        assert!(dimension > 0, "Sobol sequence needs at least one dimension");
        let seed = fixed_direction_seed();
        let direction = (0..dimension)
            .map(|d| direction_numbers_for(d, &seed))
            .collect();
        Self {
            dimension,
            count: 0,
            state: vec![0; dimension],
            direction,
            scrambler,
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Produce the next scrambled point in `[0, 1)^d`.
    pub fn next(&mut self) -> Vec<f64> {
        let raw = self.advance();
        raw.iter()
            .enumerate()
            .map(|(d, &x)| self.scrambler.scramble(d, x) as f64 * NORM)
            .collect()
    }

    /// Discard the next `n` points.
    pub fn skip(&mut self, n: u64) {
        for _ in 0..n {
            self.advance();
        }
    }

    pub fn reset(&mut self) {
        self.count = 0;
        self.state.iter_mut().for_each(|x| *x = 0);
    }

    /// §4.2 (Antonov-Saleev/Bratley-Fox form): to produce the point at
    /// index i (i>=1) from the point at index i-1, XOR in `V_j[c]` where
    /// `c = rz(i-1)`, the position of the rightmost zero bit of i-1. Since
    /// `self.count` holds i at entry, `rz(i-1) == i.trailing_zeros()` (the
    /// position of i's rightmost *one* bit) for every i>=1 — the standard
    /// Gray-code identity relating the two bit positions.
    fn advance(&mut self) -> Vec<u32> {
        if self.count > 0 {
            let c = self.count.trailing_zeros() as usize;
            for d in 0..self.dimension {
                self.state[d] ^= self.direction[d][c];
            }
        }
        self.count += 1;
        self.state.clone()
    }
}

/// Round `n` up to the next power of two, so QMC sample sets stay
/// balanced across all binary subdivisions (§4.2 invariant).
pub fn round_up_pow2(n: usize) -> usize {
    if n <= 1 {
        return 1;
    }
    1usize << (usize::BITS - (n - 1).leading_zeros())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn round_up_pow2_matches_expectations() {
        assert_eq!(round_up_pow2(1), 1);
        assert_eq!(round_up_pow2(5), 8);
        assert_eq!(round_up_pow2(8), 8);
        assert_eq!(round_up_pow2(9), 16);
    }

    #[test]
    fn points_stay_in_unit_cube() {
        let mut sobol = ScrambledSobol::new(4, MasterSeed::from_str("fixture-001"));
        for _ in 0..1024 {
            for x in sobol.next() {
                assert!((0.0..1.0).contains(&x));
            }
        }
    }

    #[test]
    fn skip_matches_manual_advance() {
        let seed = MasterSeed::from_str("fixture-001");
        let mut a = ScrambledSobol::new(3, seed);
        let mut b = ScrambledSobol::new(3, seed);
        for _ in 0..10 {
            a.next();
        }
        b.skip(10);
        assert_eq!(a.next(), b.next());
    }

    #[test]
    fn reset_replays_sequence() {
        let mut sobol = ScrambledSobol::new(2, MasterSeed::from_str("fixture-001"));
        let first: Vec<Vec<f64>> = (0..8).map(|_| sobol.next()).collect();
        sobol.reset();
        let second: Vec<Vec<f64>> = (0..8).map(|_| sobol.next()).collect();
        assert_eq!(first, second);
    }

    /// Testable property 5: Sobol balance. First 2^k points in d
    /// dimensions fall with equal count into each of 2^m equal-volume
    /// bins along any single dimension, for m <= k.
    #[test]
    fn equidistribution_balance() {
        let k = 8; // 256 points
        let m = 3; // 8 bins
        let n = 1usize << k;
        let bins = 1usize << m;
        let mut sobol = ScrambledSobol::new(2, MasterSeed::from_str("fixture-001"));
        let mut counts = vec![0usize; bins];
        for _ in 0..n {
            let point = sobol.next();
            let bin = (point[0] * bins as f64).floor() as usize;
            counts[bin.min(bins - 1)] += 1;
        }
        let expected = n / bins;
        assert!(
            counts.iter().all(|&count| count == expected),
            "unbalanced Sobol bin counts {counts:?}, expected {expected} each"
        );
    }

    proptest! {
        /// Testable property 5, generalized over arbitrary `m <= k` and
        /// dimension: any single dimension's first 2^k points land with
        /// equal count in each of 2^m equal-volume bins.
        #[test]
        fn equidistribution_balance_holds_for_any_m_le_k(
            k in 2usize..=8,
            m_offset in 0usize..=6,
            dim in 0usize..3,
        ) {
            let m = (m_offset % (k + 1)).min(k);
            let n = 1usize << k;
            let bins = 1usize << m;
            let mut sobol = ScrambledSobol::new(3, MasterSeed::from_str("fixture-001"));
            let mut counts = vec![0usize; bins];
            for _ in 0..n {
                let point = sobol.next();
                let bin = (point[dim] * bins as f64).floor() as usize;
                counts[bin.min(bins - 1)] += 1;
            }
            let expected = n / bins;
            prop_assert!(
                counts.iter().all(|&count| count == expected),
                "unbalanced Sobol bin counts {:?} at k={} m={} dim={}, expected {} each",
                counts, k, m, dim, expected
            );
        }
    }
}
