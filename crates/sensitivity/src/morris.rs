//! Morris elementary-effects screening (§4.6): cheap one-at-a-time
//! trajectories on an `L`-level grid, used to triage parameters before
//! the more expensive Saltelli pass.

use crate::transform::transform_row;
use lifesim_core::ParameterRange;
use lifesim_rng::{MasterSeed, StreamFactory};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Grid resolution for the Morris design. Elementary effects are
/// evaluated on `{0, 1/(L-1), 2/(L-1), ..., 1}`.
const LEVELS: u32 = 4;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MorrisEffect {
    pub name: String,
    pub mu: f64,
    pub mu_star: f64,
    pub sigma: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MorrisScreening {
    pub effects: Vec<MorrisEffect>,
}

/// One radial trajectory: a base point plus `d` one-at-a-time steps,
/// each moving a single coordinate by `+-delta` on the grid.
fn trajectory(d: usize, rng: &mut lifesim_rng::RngStream) -> Vec<Vec<f64>> {
    let step = 1.0 / (LEVELS as f64 - 1.0);
    let mut base: Vec<f64> = (0..d)
        .map(|_| rng.next_int(LEVELS as u64) as f64 * step)
        .collect();

    let mut order: Vec<usize> = (0..d).collect();
    for i in (1..d).rev() {
        let j = rng.next_int(i as u64 + 1) as usize;
        order.swap(i, j);
    }

    let mut points = Vec::with_capacity(d + 1);
    points.push(base.clone());
    for &i in &order {
        let forward = base[i] + step;
        base[i] = if forward <= 1.0 + 1e-9 { forward } else { base[i] - step };
        points.push(base.clone());
    }
    points
}

/// Run `r` radial trajectories over `ranges` and rank parameters by
/// `mu_star` (mean absolute elementary effect) and `sigma` (effect
/// variability, a proxy for interactions and nonlinearity).
pub fn morris_screening(
    ranges: &[ParameterRange],
    r: usize,
    seed: MasterSeed,
    model: impl Fn(&[f64]) -> f64 + Sync,
) -> MorrisScreening {
    let d = ranges.len();
    let factory = StreamFactory::new(seed);

    let trajectories: Vec<Vec<Vec<f64>>> = (0..r)
        .into_par_iter()
        .map(|t| {
            let mut rng = factory.stream(0, t as u32);
            trajectory(d, &mut rng)
        })
        .collect();

    let mut effects: Vec<Vec<f64>> = vec![Vec::with_capacity(r); d];

    for points in &trajectories {
        let transformed: Vec<Vec<f64>> = points.iter().map(|p| transform_row(ranges, p)).collect();
        let values: Vec<f64> = transformed.par_iter().map(|row| model(row)).collect();

        for step in 0..d {
            let before = &points[step];
            let after = &points[step + 1];
            let changed = (0..d).find(|&k| (before[k] - after[k]).abs() > 1e-12);
            if let Some(k) = changed {
                let delta = after[k] - before[k];
                let effect = (values[step + 1] - values[step]) / delta;
                effects[k].push(effect);
            }
        }
    }

    let effects_out = ranges
        .iter()
        .zip(effects.into_iter())
        .map(|(range, samples)| {
            let n = samples.len().max(1) as f64;
            let mu = samples.iter().sum::<f64>() / n;
            let mu_star = samples.iter().map(|e| e.abs()).sum::<f64>() / n;
            let variance = samples.iter().map(|e| (e - mu).powi(2)).sum::<f64>() / n;
            MorrisEffect {
                name: range.name.clone(),
                mu,
                mu_star,
                sigma: variance.sqrt(),
            }
        })
        .collect();

    MorrisScreening { effects: effects_out }
}
