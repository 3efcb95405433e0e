//! Uniform-to-parameter-space transforms (§4.6 "Transforms"): uniform
//! affine, normal via `Phi^-1`, lognormal via `exp(mu + sigma Phi^-1(u))`.

use lifesim_core::{ParameterDistribution, ParameterRange};
use lifesim_copula::norm_inv_cdf;

pub fn transform(range: &ParameterRange, u: f64) -> f64 {
    let u = u.clamp(1e-12, 1.0 - 1e-12);
    match range.distribution {
        ParameterDistribution::Uniform => range.min + u * (range.max - range.min),
        ParameterDistribution::Normal { mean, std } => mean + std * norm_inv_cdf(u),
        ParameterDistribution::Lognormal { mu, sigma } => (mu + sigma * norm_inv_cdf(u)).exp(),
    }
}

/// Transform a full row of `[0, 1)` uniforms through their respective
/// parameter ranges, in order.
pub fn transform_row(ranges: &[ParameterRange], row: &[f64]) -> Vec<f64> {
    assert_eq!(ranges.len(), row.len(), "one uniform per parameter range");
    ranges.iter().zip(row.iter()).map(|(r, &u)| transform(r, u)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_transform_is_affine() {
        let range = ParameterRange::uniform("x", 10.0, 20.0);
        assert!((transform(&range, 0.0) - 10.0).abs() < 1e-6);
        assert!((transform(&range, 1.0) - 20.0).abs() < 1e-6);
        assert!((transform(&range, 0.5) - 15.0).abs() < 1e-3);
    }

    #[test]
    fn normal_transform_centers_on_mean() {
        let range = ParameterRange::normal("x", 5.0, 2.0);
        assert!((transform(&range, 0.5) - 5.0).abs() < 1e-3);
    }

    #[test]
    fn lognormal_transform_is_positive() {
        let range = ParameterRange::lognormal("x", 0.0, 1.0);
        for u in [0.01, 0.3, 0.5, 0.7, 0.99] {
            assert!(transform(&range, u) > 0.0);
        }
    }
}
