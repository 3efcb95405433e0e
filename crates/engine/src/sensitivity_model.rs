//! Builds the scalar model function the sensitivity analyzer perturbs
//! (§4.8 step 3): a named `ParameterRange` overrides the matching
//! `Profile` field when present, everything else stays fixed, and the
//! stochastic draws inside the ten-year projection are held at one
//! frozen `RngStream` snapshot so the model is a pure function of the
//! parameter row — exactly what Saltelli sampling requires.

use lifesim_core::{MarketPriors, ParameterRange};
use lifesim_rng::RngStream;
use lifesim_scenario::{DecisionOption, DecisionType, Profile, ScenarioGenerator};

fn named(ranges: &[ParameterRange], row: &[f64], name: &str, fallback: f64) -> f64 {
    ranges
        .iter()
        .position(|r| r.name == name)
        .map(|i| row[i])
        .unwrap_or(fallback)
}

/// Build the year-10 net-worth model the orchestrator hands to
/// [`lifesim_sensitivity::sobol_indices`] / `morris_screening`. Captures
/// its own copies of the priors/profile/ranges so it can be evaluated
/// concurrently from Saltelli's `(2+d)*N` parallel model calls.
pub fn net_worth_model(
    priors: MarketPriors,
    decision: DecisionType,
    option: DecisionOption,
    base_profile: Profile,
    ranges: Vec<ParameterRange>,
    frozen_noise: RngStream,
) -> impl Fn(&[f64]) -> f64 + Sync {
    move |row: &[f64]| {
        let mut profile = base_profile.clone();
        profile.salary = named(&ranges, row, "salary", profile.salary);
        profile.monthly_expenses = named(&ranges, row, "monthly_expenses", profile.monthly_expenses);
        profile.cash = named(&ranges, row, "cash", profile.cash);
        profile.years_experience = named(&ranges, row, "years_experience", profile.years_experience);

        let generator = ScenarioGenerator::new(&priors, decision, option, &profile);
        let mut rng = frozen_noise;
        let scenario = generator.generate(0, 1, &mut rng);
        scenario.outcomes.at(10).financial.net_worth
    }
}
