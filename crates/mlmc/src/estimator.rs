//! Pilot variance/cost estimation, Giles optimal allocation, and the
//! main MLMC phase (§4.4 algorithm steps 1-3).
use crate::coupling::{cost_of_level, evaluate_correction};
use crate::path::PathGenerator;
use lifesim_rng::StreamFactory;
use rayon::prelude::*;

const PILOT_SAMPLES: u64 = 64;
const MIN_LEVELS_BEFORE_VARIANCE_CHECK: usize = 2;
const VARIANCE_DECAY_RATIO: f64 = 0.1;
const MAX_SAMPLES_PER_LEVEL: u64 = 200_000;

#[derive(Debug, Clone)]
pub struct LevelResult {
    pub level: usize,
    pub samples: u64,
    pub mean: f64,
    pub variance: f64,
    pub cost: f64,
}

#[derive(Debug, Clone)]
pub struct MlmcResult {
    pub estimate: f64,
    pub variance: f64,
    pub ci95: (f64, f64),
    pub levels: Vec<LevelResult>,
    pub total_cost: f64,
    pub cost_reduction: f64,
    pub converged: bool,
}

/// Run `n` independent draws of `Y_l` on distinct substreams of
/// `(role, level)`, via a fixed-order parallel map so the aggregate is
/// bit-identical regardless of worker-thread count (I3, property 1,
/// E6): every sample's substream id is its index, and results are
/// collected back into index order before any reduction happens.
fn sample_level(
    generator: &dyn PathGenerator,
    level: usize,
    n: u64,
    factory: &StreamFactory,
    role: u32,
    substream_offset: u32,
) -> Vec<f64> {
    (0..n)
        .into_par_iter()
        .map(|i| {
            let substream = substream_offset.wrapping_add(i as u32);
            let mut rng = factory.stream(role, substream);
            evaluate_correction(generator, level, &mut rng)
        })
        .collect()
}

fn mean_and_variance(samples: &[f64]) -> (f64, f64) {
    let n = samples.len() as f64;
    if n == 0.0 {
        return (0.0, 0.0);
    }
    let mean = samples.iter().sum::<f64>() / n;
    if n < 2.0 {
        return (mean, 0.0);
    }
    let variance = samples.iter().map(|&x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
    (mean, variance)
}

/// Pilot phase: fixed `PILOT_SAMPLES` per level, stopping once the
/// variance has decayed past `VARIANCE_DECAY_RATIO` relative to the
/// previous level (and at least two levels have run), or `max_levels`
/// is reached.
fn pilot_phase(
    generator: &dyn PathGenerator,
    max_levels: usize,
    factory: &StreamFactory,
    role: u32,
) -> Vec<(f64, f64)> {
    let mut estimates = Vec::new();
    for level in 0..max_levels {
        let samples = sample_level(generator, level, PILOT_SAMPLES, factory, role, level as u32 * 2);
        let (mean, variance) = mean_and_variance(&samples);
        estimates.push((mean, variance.max(1e-300)));

        if level + 1 >= MIN_LEVELS_BEFORE_VARIANCE_CHECK && level >= 1 {
            let previous_variance = estimates[level - 1].1;
            if estimates[level].1 < VARIANCE_DECAY_RATIO * previous_variance {
                break;
            }
        }
    }
    estimates
}

/// Giles optimal allocation (§4.4 step 2): `N_l = ceil(2 eps^-2 *
/// sqrt(V_l / C_l) * sum_k sqrt(V_k * C_k))`.
fn giles_allocation(pilot: &[(f64, f64)], costs: &[f64], target_mse: f64) -> Vec<u64> {
    let epsilon = (target_mse / 2.0).sqrt();
    let sum_sqrt_vc: f64 = pilot
        .iter()
        .zip(costs.iter())
        .map(|(&(_, variance), &cost)| (variance * cost).sqrt())
        .sum();

    pilot
        .iter()
        .zip(costs.iter())
        .map(|(&(_, variance), &cost)| {
            let n = 2.0 / (epsilon * epsilon) * (variance / cost).sqrt() * sum_sqrt_vc;
            n.ceil().max(1.0) as u64
        })
        .collect()
}

/// Run the full MLMC pipeline (§4.4 contract): pilot, allocate, run
/// the main phase, and combine into a single estimator.
pub fn run_mlmc(
    generator: &dyn PathGenerator,
    target_mse: f64,
    max_levels: usize,
    factory: &StreamFactory,
    role: u32,
) -> MlmcResult {
    let pilot = pilot_phase(generator, max_levels, factory, role);
    let active_levels = pilot.len();
    let costs: Vec<f64> = (0..active_levels).map(|l| cost_of_level(generator, l)).collect();

    let mut allocation = giles_allocation(&pilot, &costs, target_mse);
    let mut converged = true;
    for n in allocation.iter_mut() {
        if *n > MAX_SAMPLES_PER_LEVEL {
            *n = MAX_SAMPLES_PER_LEVEL;
            converged = false;
        }
    }

    let mut levels = Vec::with_capacity(active_levels);
    let mut estimate = 0.0;
    let mut variance = 0.0;
    let mut total_cost = 0.0;

    for level in 0..active_levels {
        let n = allocation[level];
        let samples = sample_level(generator, level, n, factory, role, 1_000_000 + level as u32 * 2);
        let (mean, sample_variance) = mean_and_variance(&samples);
        let cost = costs[level];

        estimate += mean;
        variance += sample_variance / n as f64;
        total_cost += cost * n as f64;

        levels.push(LevelResult { level, samples: n, mean, variance: sample_variance, cost });
    }

    let ci_half_width = 1.96 * variance.sqrt();
    let plain_mc_samples = (pilot[0].1 / target_mse).max(1.0);
    let plain_mc_cost = plain_mc_samples * costs[0];
    let cost_reduction = if total_cost > 0.0 { plain_mc_cost / total_cost } else { 1.0 };

    MlmcResult {
        estimate,
        variance,
        ci95: (estimate - ci_half_width, estimate + ci_half_width),
        levels,
        total_cost,
        cost_reduction,
        converged,
    }
}
