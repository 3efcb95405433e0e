//! Regime and industry-outlook draws (§4.5 step 1): the single
//! categorical draw that fixes one scenario's macro backdrop for its
//! entire ten-year horizon.

use crate::types::EconomicConditions;
use lifesim_core::{IndustryOutlook, MarketPriors, Regime};
use lifesim_rng::RngStream;

/// Draw a regime from the fixed prior weights {0.10, 0.15, 0.50, 0.15,
/// 0.10}, in `Regime::ALL` order so the cumulative-weight walk is
/// deterministic in the draw alone.
pub fn draw_regime(rng: &mut RngStream) -> Regime {
    let u = rng.next_uniform();
    let mut cumulative = 0.0;
    for regime in Regime::ALL {
        cumulative += regime.prior_weight();
        if u < cumulative {
            return regime;
        }
    }
    Regime::ALL[Regime::ALL.len() - 1]
}

/// Draw one industry-outlook category from a regime's categorical
/// weights over `IndustryOutlook::ALL`.
pub fn draw_industry_outlook(rng: &mut RngStream, weights: &[f64; 4]) -> IndustryOutlook {
    let u = rng.next_uniform();
    let mut cumulative = 0.0;
    for (i, outlook) in IndustryOutlook::ALL.iter().enumerate() {
        cumulative += weights[i];
        if u < cumulative {
            return *outlook;
        }
    }
    IndustryOutlook::ALL[IndustryOutlook::ALL.len() - 1]
}

/// Draw the full regime-conditional economic backdrop for one scenario
/// (§4.5 step 1): GDP growth, inflation, unemployment from
/// regime-conditional normals, industry outlook from the regime's
/// categorical weights.
pub fn draw_economic_conditions(rng: &mut RngStream, priors: &MarketPriors) -> EconomicConditions {
    let regime = draw_regime(rng);
    let data = priors.regime(regime);
    EconomicConditions {
        regime,
        gdp_growth: rng.next_normal(data.gdp_growth.mean, data.gdp_growth.std),
        inflation: rng.next_normal(data.inflation.mean, data.inflation.std),
        unemployment: rng
            .next_normal(data.unemployment.mean, data.unemployment.std)
            .max(0.0),
        industry_outlook: draw_industry_outlook(rng, &data.industry_outlook_weights),
    }
}
