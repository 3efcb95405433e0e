//! Scenario generation and aggregation (§4.5): maps regime-conditional
//! exogenous draws to ten-year financial/career/life outcome
//! trajectories, then turns a weighted scenario set into aggregate
//! metrics, recommendations, risks, and opportunities.

mod aggregator;
mod generator;
mod path;
mod regime;
mod types;

pub use aggregator::{
    aggregate, normalize_probabilities, opportunities, recommendations, reweight_by_regime,
    AggregateMetrics, ExpectedValue, Opportunity, Recommendation, RiskFactor,
};
pub use generator::ScenarioGenerator;
pub use path::EconomicPathGenerator;
pub use regime::{draw_economic_conditions, draw_industry_outlook, draw_regime};
pub use types::{
    CareerState, DecisionOption, DecisionType, EconomicConditions, FinancialState, KeyEvent,
    LifeState, Outcomes, Profile, Scenario, YearlyOutcome,
};

use lifesim_core::MarketPriors;
use lifesim_rng::{MasterSeed, StreamFactory};
use lifesim_sobol::ScrambledSobol;
use rayon::prelude::*;

/// Generate `n` scenarios in parallel, one independent substream per
/// scenario id (§5: ordering guarantees). Samples are collected back
/// into id order before any reduction runs, so the result is
/// bit-identical regardless of worker-thread count (I3, property 1, E6).
pub fn generate_scenarios(
    priors: &MarketPriors,
    decision: DecisionType,
    option: DecisionOption,
    profile: &Profile,
    n: usize,
    factory: &StreamFactory,
    role: u32,
) -> Vec<Scenario> {
    let generator = ScenarioGenerator::new(priors, decision, option, profile);
    (0..n)
        .into_par_iter()
        .map(|i| {
            let mut rng = factory.stream(role, i as u32);
            generator.generate(i as u64, n, &mut rng)
        })
        .collect()
}

/// Like [`generate_scenarios`], but each scenario's substream origin is
/// stratified by a scrambled-Sobol point instead of drawn at the
/// counter's origin (§6 `use_qmc`, §4.8 step 4 "QMC" generator choice).
/// The `n` low-discrepancy prefixes are drawn sequentially first (Sobol
/// state is an inherently serial walk), then the actual per-scenario
/// generation runs in parallel over the precomputed prefixes — so the
/// result stays bit-identical regardless of worker-thread count (I3, E6).
pub fn generate_scenarios_qmc(
    priors: &MarketPriors,
    decision: DecisionType,
    option: DecisionOption,
    profile: &Profile,
    n: usize,
    factory: &StreamFactory,
    role: u32,
    master_seed: MasterSeed,
) -> Vec<Scenario> {
    let generator = ScenarioGenerator::new(priors, decision, option, profile);

    let mut sobol = ScrambledSobol::new(2, master_seed);
    let prefixes: Vec<[u32; 2]> = (0..n)
        .map(|_| {
            let point = sobol.next();
            [
                (point[0] * u32::MAX as f64) as u32,
                (point[1] * u32::MAX as f64) as u32,
            ]
        })
        .collect();

    prefixes
        .into_par_iter()
        .enumerate()
        .map(|(i, prefix)| {
            let mut rng = factory.stream_with_prefix(prefix, role, i as u32);
            generator.generate(i as u64, n, &mut rng)
        })
        .collect()
}
