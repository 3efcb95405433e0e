//! The caller-supplied contract MLMC drives (§4.4): a path generator
//! knows how many steps a level needs, how to turn noise into a path,
//! and how to score a path. MLMC itself never looks inside a path.
pub trait PathGenerator: Sync {
    /// Number of Brownian increments at `level`. Must double from one
    /// level to the next (`steps_for(l) == 2 * steps_for(l - 1)` for
    /// `l >= 1`) so the Brownian-bridge coupling in [`crate::bridge`]
    /// is well-defined.
    fn steps_for(&self, level: usize) -> usize;

    /// Build a path from standard-normal Brownian increments.
    fn generate_from_noise(&self, level: usize, noise: &[f64]) -> Vec<f64>;

    /// Build a path from `[0, 1)` uniforms (QMC entry point); the
    /// default implementation pipes each coordinate through the
    /// standard normal quantile and delegates to
    /// [`PathGenerator::generate_from_noise`].
    fn generate_from_uniform(&self, level: usize, uniforms: &[f64]) -> Vec<f64> {
        let noise: Vec<f64> = uniforms
            .iter()
            .map(|&u| lifesim_copula::norm_inv_cdf(u.clamp(1e-12, 1.0 - 1e-12)))
            .collect();
        self.generate_from_noise(level, &noise)
    }

    /// Scalar payoff/outcome of a realized path.
    fn evaluate(&self, path: &[f64]) -> f64;
}
