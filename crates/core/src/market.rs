//! Input types from the data layer (§3 `MarketPriors`): historical
//! series and marginal distributions for wage growth, inflation, asset
//! return, unemployment, and housing, broken down by economic regime.
//! Injected by the caller; read-only to the rest of the pipeline.

use serde::{Deserialize, Serialize};

/// The five economic regimes scenario generation draws from (§4.5),
/// with their fixed prior weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Regime {
    Recession,
    Downturn,
    Stable,
    Growth,
    Boom,
}

impl Regime {
    pub const ALL: [Regime; 5] = [
        Regime::Recession,
        Regime::Downturn,
        Regime::Stable,
        Regime::Growth,
        Regime::Boom,
    ];

    /// Fixed prior weights {0.10, 0.15, 0.50, 0.15, 0.10} (§4.5 step 1).
    pub fn prior_weight(self) -> f64 {
        match self {
            Regime::Recession => 0.10,
            Regime::Downturn => 0.15,
            Regime::Stable => 0.50,
            Regime::Growth => 0.15,
            Regime::Boom => 0.10,
        }
    }

    /// Aggregator re-weighting multiplier (§4.5 step 4).
    pub fn reweight_multiplier(self) -> f64 {
        match self {
            Regime::Recession => 0.8,
            Regime::Downturn => 0.9,
            Regime::Stable => 1.2,
            Regime::Growth => 1.0,
            Regime::Boom => 0.7,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Regime::Recession => 0,
            Regime::Downturn => 1,
            Regime::Stable => 2,
            Regime::Growth => 3,
            Regime::Boom => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndustryOutlook {
    Declining,
    Stable,
    Growing,
    Booming,
}

impl IndustryOutlook {
    pub const ALL: [IndustryOutlook; 4] = [
        IndustryOutlook::Declining,
        IndustryOutlook::Stable,
        IndustryOutlook::Growing,
        IndustryOutlook::Booming,
    ];

    /// Annual career-growth contribution attributed to industry
    /// outlook (§4.5 income formula).
    pub fn growth_contribution(self) -> f64 {
        match self {
            IndustryOutlook::Declining => -0.02,
            IndustryOutlook::Stable => 0.0,
            IndustryOutlook::Growing => 0.02,
            IndustryOutlook::Booming => 0.05,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GaussianParams {
    pub mean: f64,
    pub std: f64,
}

impl GaussianParams {
    pub fn new(mean: f64, std: f64) -> Self {
        Self { mean, std }
    }

    fn is_valid(&self) -> bool {
        self.mean.is_finite() && self.std.is_finite() && self.std >= 0.0
    }
}

/// One regime's marginal distributions and industry-outlook
/// categorical weights.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegimeMarketData {
    pub gdp_growth: GaussianParams,
    pub wage_growth: GaussianParams,
    pub inflation: GaussianParams,
    pub asset_return: GaussianParams,
    pub unemployment: GaussianParams,
    pub housing: GaussianParams,
    /// categorical weights over [`IndustryOutlook::ALL`], must sum to 1
    pub industry_outlook_weights: [f64; 4],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketPriors {
    by_regime: [RegimeMarketData; 5],
}

impl MarketPriors {
    pub fn new(by_regime: [RegimeMarketData; 5]) -> Self {
        Self { by_regime }
    }

    pub fn regime(&self, regime: Regime) -> &RegimeMarketData {
        &self.by_regime[regime.index()]
    }

    /// Validates every regime's distributions are well-formed finite
    /// values; returns the names of any that are not (§7
    /// `InsufficientPriors`).
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut missing = Vec::new();
        for regime in Regime::ALL {
            let data = self.regime(regime);
            let label = |field: &str| format!("{regime:?}.{field}");
            if !data.gdp_growth.is_valid() {
                missing.push(label("gdp_growth"));
            }
            if !data.wage_growth.is_valid() {
                missing.push(label("wage_growth"));
            }
            if !data.inflation.is_valid() {
                missing.push(label("inflation"));
            }
            if !data.asset_return.is_valid() {
                missing.push(label("asset_return"));
            }
            if !data.unemployment.is_valid() {
                missing.push(label("unemployment"));
            }
            if !data.housing.is_valid() {
                missing.push(label("housing"));
            }
            let weight_sum: f64 = data.industry_outlook_weights.iter().sum();
            if (weight_sum - 1.0).abs() > 1e-6 {
                missing.push(label("industry_outlook_weights"));
            }
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(missing)
        }
    }

    /// The bundled fixture priors referenced by the end-to-end test
    /// scenarios (seed `"fixture-001"`): broadly plausible historical
    /// US macro figures, not calibrated forecasts (§1 non-goals).
    pub fn fixture() -> Self {
        let recession = RegimeMarketData {
            gdp_growth: GaussianParams::new(-0.02, 0.02),
            wage_growth: GaussianParams::new(0.005, 0.02),
            inflation: GaussianParams::new(0.01, 0.015),
            asset_return: GaussianParams::new(-0.08, 0.22),
            unemployment: GaussianParams::new(0.09, 0.02),
            housing: GaussianParams::new(-0.03, 0.05),
            industry_outlook_weights: [0.45, 0.35, 0.15, 0.05],
        };
        let downturn = RegimeMarketData {
            gdp_growth: GaussianParams::new(0.005, 0.015),
            wage_growth: GaussianParams::new(0.015, 0.015),
            inflation: GaussianParams::new(0.02, 0.01),
            asset_return: GaussianParams::new(-0.02, 0.16),
            unemployment: GaussianParams::new(0.065, 0.015),
            housing: GaussianParams::new(0.0, 0.04),
            industry_outlook_weights: [0.3, 0.4, 0.25, 0.05],
        };
        let stable = RegimeMarketData {
            gdp_growth: GaussianParams::new(0.022, 0.01),
            wage_growth: GaussianParams::new(0.03, 0.012),
            inflation: GaussianParams::new(0.025, 0.008),
            asset_return: GaussianParams::new(0.07, 0.13),
            unemployment: GaussianParams::new(0.045, 0.01),
            housing: GaussianParams::new(0.03, 0.03),
            industry_outlook_weights: [0.1, 0.45, 0.35, 0.1],
        };
        let growth = RegimeMarketData {
            gdp_growth: GaussianParams::new(0.035, 0.012),
            wage_growth: GaussianParams::new(0.045, 0.015),
            inflation: GaussianParams::new(0.03, 0.01),
            asset_return: GaussianParams::new(0.11, 0.14),
            unemployment: GaussianParams::new(0.035, 0.008),
            housing: GaussianParams::new(0.06, 0.035),
            industry_outlook_weights: [0.05, 0.25, 0.5, 0.2],
        };
        let boom = RegimeMarketData {
            gdp_growth: GaussianParams::new(0.05, 0.015),
            wage_growth: GaussianParams::new(0.06, 0.02),
            inflation: GaussianParams::new(0.04, 0.015),
            asset_return: GaussianParams::new(0.18, 0.18),
            unemployment: GaussianParams::new(0.03, 0.006),
            housing: GaussianParams::new(0.09, 0.05),
            industry_outlook_weights: [0.02, 0.13, 0.45, 0.4],
        };
        Self::new([recession, downturn, stable, growth, boom])
    }
}
