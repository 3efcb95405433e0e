//! Sensitivity input factors (§3 `ParameterRange`): read-only
//! description of one parameter's domain and prior distribution, handed
//! to the sensitivity analyzer by the orchestrator or a direct caller of
//! `analyze_sensitivity` (§6).

use serde::{Deserialize, Serialize};

/// Prior distribution tag for one parameter, with the params the
/// sensitivity analyzer's uniform-to-parameter transform needs (§4.6
/// transforms).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ParameterDistribution {
    /// affine map over `[min, max]`
    Uniform,
    /// `mean + std * Phi^-1(u)`, ignoring `[min, max]`
    Normal { mean: f64, std: f64 },
    /// `exp(mu + sigma * Phi^-1(u))`, ignoring `[min, max]`
    Lognormal { mu: f64, sigma: f64 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterRange {
    pub name: String,
    pub min: f64,
    pub max: f64,
    pub distribution: ParameterDistribution,
}

impl ParameterRange {
    pub fn uniform(name: impl Into<String>, min: f64, max: f64) -> Self {
        Self {
            name: name.into(),
            min,
            max,
            distribution: ParameterDistribution::Uniform,
        }
    }

    pub fn normal(name: impl Into<String>, mean: f64, std: f64) -> Self {
        Self {
            name: name.into(),
            min: f64::NEG_INFINITY,
            max: f64::INFINITY,
            distribution: ParameterDistribution::Normal { mean, std },
        }
    }

    pub fn lognormal(name: impl Into<String>, mu: f64, sigma: f64) -> Self {
        Self {
            name: name.into(),
            min: 0.0,
            max: f64::INFINITY,
            distribution: ParameterDistribution::Lognormal { mu, sigma },
        }
    }
}
