//! QMC-driven MLMC (§4.4): scrambled Sobol points reshaped per time
//! step and dimension, piped through `Phi^-1` to produce Brownian
//! increments, then coarsened (the exact inverse of [`crate::bridge::refine`])
//! down to every lower level instead of bridging upward.
use crate::bridge::coarsen;
use crate::path::PathGenerator;
use lifesim_copula::norm_inv_cdf;
use lifesim_sobol::ScrambledSobol;

/// Draw one Sobol point of dimension `steps_for(max_level)`, invert it
/// through the standard normal quantile to get the finest level's
/// Brownian increments, then derive every coarser level's noise by
/// pairwise summation.
pub fn qmc_coupled_noise(
    generator: &dyn PathGenerator,
    max_level: usize,
    sobol: &mut ScrambledSobol,
) -> Vec<Vec<f64>> {
    let finest_steps = generator.steps_for(max_level);
    assert_eq!(
        sobol.dimension(),
        finest_steps,
        "Sobol sequence dimension must match the finest level's step count"
    );

    let point = sobol.next();
    let mut finest: Vec<f64> = point
        .iter()
        .map(|&u| norm_inv_cdf(u.clamp(1e-12, 1.0 - 1e-12)))
        .collect();

    let mut per_level = vec![Vec::new(); max_level + 1];
    per_level[max_level] = std::mem::take(&mut finest);
    for level in (0..max_level).rev() {
        per_level[level] = coarsen(&per_level[level + 1]);
    }
    per_level
}

/// The per-sample QMC correction `Y_l`, evaluated from one Sobol point
/// covering every level from `0` to `level`.
pub fn evaluate_qmc_correction(
    generator: &dyn PathGenerator,
    level: usize,
    sobol: &mut ScrambledSobol,
) -> f64 {
    let per_level = qmc_coupled_noise(generator, level, sobol);
    let fine_path = generator.generate_from_noise(level, &per_level[level]);
    let fine_value = generator.evaluate(&fine_path);
    if level == 0 {
        return fine_value;
    }
    let coarse_path = generator.generate_from_noise(level - 1, &per_level[level - 1]);
    fine_value - generator.evaluate(&coarse_path)
}
