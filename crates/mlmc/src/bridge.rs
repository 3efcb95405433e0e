//! Brownian-bridge coupling (§4.4): given a coarse path's increments,
//! recursively fill in midpoints so the refined (fine) path agrees with
//! the coarse path exactly at every coarse grid point. This is what
//! makes `Y_l = f(P_l) - f(P_{l-1})` a low-variance correction instead
//! of the difference of two independent estimators.
use lifesim_rng::RngStream;

/// Refine `coarse` (N standard-normal increments summing to a Brownian
/// path) into `2N` increments whose odd-indexed partial sums reproduce
/// the coarse path exactly. Midpoints are drawn with mean `(start +
/// end) / 2` and variance `(end_t - mid_t)(mid_t - start_t) / (end_t -
/// start_t)`, evaluated in elementary fine-step units so the interval
/// length already carries the process's `dt` scaling (§4.4 coupling
/// note).
pub fn refine(coarse: &[f64], rng: &mut RngStream) -> Vec<f64> {
    let n = coarse.len();
    let mut levels = vec![0.0; n + 1];
    for i in 0..n {
        levels[i + 1] = levels[i] + coarse[i];
    }

    let mut fine = Vec::with_capacity(2 * n);
    for i in 0..n {
        let start = levels[i];
        let end = levels[i + 1];
        let start_t = (2 * i) as f64;
        let mid_t = (2 * i + 1) as f64;
        let end_t = (2 * i + 2) as f64;
        let variance = (end_t - mid_t) * (mid_t - start_t) / (end_t - start_t);
        let mean = (start + end) / 2.0;
        let mid = mean + rng.next_normal(0.0, variance.sqrt());
        fine.push(mid - start);
        fine.push(end - mid);
    }
    fine
}

/// Exact inverse of [`refine`]: collapse `fine` increments pairwise
/// into the coarse increments they refine. Used by the QMC-driven path
/// (§4.4), which generates the finest level directly and derives every
/// coarser level by summation rather than by sampling a bridge.
pub fn coarsen(fine: &[f64]) -> Vec<f64> {
    assert_eq!(fine.len() % 2, 0, "coarsen requires an even number of increments");
    fine.chunks_exact(2).map(|pair| pair[0] + pair[1]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lifesim_rng::{MasterSeed, StreamFactory};

    #[test]
    fn refine_preserves_coarse_path_exactly() {
        let coarse = vec![0.3, -0.2, 0.5, 0.1];
        let factory = StreamFactory::new(MasterSeed::from_str("fixture-001"));
        let mut rng = factory.stream(20, 0);
        let fine = refine(&coarse, &mut rng);
        assert_eq!(fine.len(), coarse.len() * 2);

        let mut fine_cum = 0.0;
        let mut coarse_cum = 0.0;
        for (i, &increment) in coarse.iter().enumerate() {
            coarse_cum += increment;
            fine_cum += fine[2 * i] + fine[2 * i + 1];
            assert!((fine_cum - coarse_cum).abs() < 1e-9);
        }
    }

    #[test]
    fn coarsen_inverts_refine_sums() {
        let coarse = vec![0.1, 0.2, -0.3];
        let factory = StreamFactory::new(MasterSeed::from_str("fixture-001"));
        let mut rng = factory.stream(20, 1);
        let fine = refine(&coarse, &mut rng);
        let recovered = coarsen(&fine);
        for (a, b) in coarse.iter().zip(recovered.iter()) {
            assert!((a - b).abs() < 1e-9);
        }
    }
}
