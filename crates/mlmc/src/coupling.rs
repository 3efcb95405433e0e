//! Ties [`crate::path::PathGenerator`] to [`crate::bridge`]: walks the
//! Brownian bridge up from level 0 to the requested level, then
//! evaluates the level correction `Y_l`.
use crate::bridge::refine;
use crate::path::PathGenerator;
use lifesim_rng::RngStream;

/// Fine-level noise and, for `level > 0`, the coarse-level noise it
/// refines. Built by drawing `steps_for(0)` iid standard normals and
/// bridging upward one level at a time, so intermediate levels are
/// real Brownian paths too even though only the endpoints are used.
pub fn generate_level_noise(
    generator: &dyn PathGenerator,
    level: usize,
    rng: &mut RngStream,
) -> (Vec<f64>, Option<Vec<f64>>) {
    let base_steps = generator.steps_for(0);
    let mut noise: Vec<f64> = (0..base_steps).map(|_| rng.next_normal(0.0, 1.0)).collect();
    let mut previous = None;

    for l in 1..=level {
        let expected = generator.steps_for(l);
        assert_eq!(
            expected,
            noise.len() * 2,
            "PathGenerator::steps_for must double per level for level {l}"
        );
        let refined = refine(&noise, rng);
        previous = Some(noise);
        noise = refined;
    }

    (noise, previous)
}

/// The per-sample correction `Y_l = f(P_l) - f(P_{l-1})` (`Y_0 =
/// f(P_0)`), §4.4.
pub fn evaluate_correction(generator: &dyn PathGenerator, level: usize, rng: &mut RngStream) -> f64 {
    let (fine_noise, coarse_noise) = generate_level_noise(generator, level, rng);
    let fine_path = generator.generate_from_noise(level, &fine_noise);
    let fine_value = generator.evaluate(&fine_path);
    match coarse_noise {
        Some(coarse) => {
            let coarse_path = generator.generate_from_noise(level - 1, &coarse);
            fine_value - generator.evaluate(&coarse_path)
        }
        None => fine_value,
    }
}

/// Deterministic proxy for the cost of one `Y_l` evaluation: the
/// number of Brownian increments touched by the fine path plus (for
/// `l > 0`) the coarse path. Using step count rather than wall-clock
/// time keeps sample allocation, and therefore the final estimate,
/// independent of scheduling noise (I3, property 1).
pub fn cost_of_level(generator: &dyn PathGenerator, level: usize) -> f64 {
    let fine = generator.steps_for(level) as f64;
    if level == 0 {
        fine
    } else {
        fine + generator.steps_for(level - 1) as f64
    }
}
