//! Vine re-coupling (§4.8 step 5): re-samples each scenario's exogenous
//! macro uniforms from a vine fitted on the generated ensemble, then
//! re-projects them onto the original empirical marginals, replacing
//! the scenario's independently-drawn `gdp_growth`/`inflation`/
//! `unemployment` triple with a jointly-dependent one, and re-runs the
//! year-by-year projection (§4.5 step 2) so every outcome field reflects
//! the recoupled macro backdrop instead of the pre-recoupling draw.

use lifesim_copula::RegularVine;
use lifesim_core::MarketPriors;
use lifesim_rng::StreamFactory;
use lifesim_scenario::{DecisionOption, DecisionType, Profile, Scenario, ScenarioGenerator};
use std::collections::HashMap;

const GDP: &str = "gdp_growth";
const INFLATION: &str = "inflation";
const UNEMPLOYMENT: &str = "unemployment";

/// Nearest-rank empirical quantile: map `u in [0, 1)` back onto the
/// scale of `sorted` (already ascending).
fn empirical_quantile(sorted: &[f64], u: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let index = ((u.clamp(0.0, 1.0)) * (sorted.len() - 1) as f64).round() as usize;
    sorted[index.min(sorted.len() - 1)]
}

/// Re-couple the macro triple across `scenarios` via a freshly-fitted
/// vine (§4.3), then re-project every scenario's outcomes under its new
/// conditions, in place. No-op when fewer than 3 scenarios are present
/// (a vine needs multiple observations to estimate Kendall's tau).
///
/// `factory`/`role` supply one substream for the vine's own `simulate`
/// draws (substream 0) and one independent substream per scenario for
/// the idiosyncratic noise re-projection consumes (substream `1 + id`),
/// so re-projection neither reuses nor perturbs the original
/// generation substreams.
pub fn recouple_scenarios(
    scenarios: &mut [Scenario],
    priors: &MarketPriors,
    decision: DecisionType,
    option: DecisionOption,
    profile: &Profile,
    factory: &StreamFactory,
    role: u32,
) {
    if scenarios.len() < 3 {
        return;
    }

    let gdp: Vec<f64> = scenarios.iter().map(|s| s.conditions.gdp_growth).collect();
    let inflation: Vec<f64> = scenarios.iter().map(|s| s.conditions.inflation).collect();
    let unemployment: Vec<f64> = scenarios.iter().map(|s| s.conditions.unemployment).collect();

    let mut data = HashMap::new();
    data.insert(GDP.to_string(), gdp.clone());
    data.insert(INFLATION.to_string(), inflation.clone());
    data.insert(UNEMPLOYMENT.to_string(), unemployment.clone());

    let vine = RegularVine::fit(&data);
    let mut vine_stream = factory.stream(role, 0);
    let sampled = vine.simulate(scenarios.len(), &mut vine_stream);

    let mut sorted_gdp = gdp;
    let mut sorted_inflation = inflation;
    let mut sorted_unemployment = unemployment;
    sorted_gdp.sort_by(|a, b| a.partial_cmp(b).unwrap());
    sorted_inflation.sort_by(|a, b| a.partial_cmp(b).unwrap());
    sorted_unemployment.sort_by(|a, b| a.partial_cmp(b).unwrap());

    let generator = ScenarioGenerator::new(priors, decision, option, profile);
    let total = scenarios.len();

    // `vine.variables()` is sorted lexicographically: gdp_growth,
    // inflation, unemployment.
    for (i, (scenario, draw)) in scenarios.iter_mut().zip(sampled.into_iter()).enumerate() {
        let mut conditions = scenario.conditions;
        conditions.gdp_growth = empirical_quantile(&sorted_gdp, draw[0]);
        conditions.inflation = empirical_quantile(&sorted_inflation, draw[1]);
        conditions.unemployment = empirical_quantile(&sorted_unemployment, draw[2]);

        let mut projection_stream = factory.stream(role, 1 + i as u32);
        let reprojected = generator.project(scenario.id, total, conditions, &mut projection_stream);
        scenario.conditions = reprojected.conditions;
        scenario.outcomes = reprojected.outcomes;
        scenario.key_events = reprojected.key_events;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lifesim_core::{IndustryOutlook, Regime};
    use lifesim_rng::MasterSeed;
    use lifesim_scenario::{CareerState, EconomicConditions, FinancialState, LifeState, Outcomes, YearlyOutcome};

    fn fixture_scenarios(n: usize) -> Vec<Scenario> {
        let outcome = |year: u32| YearlyOutcome {
            year,
            financial: FinancialState { net_worth: 1.0, income: 1.0, expenses: 1.0, savings: 1.0 },
            career: CareerState { role: None, seniority: 5.0, market_value: 1.0, satisfaction: 5.0 },
            life: LifeState { happiness: 5.0, stress: 5.0, balance: 5.0, health: 5.0 },
        };
        (0..n)
            .map(|i| Scenario {
                id: i as u64,
                probability: 1.0 / n as f64,
                conditions: EconomicConditions {
                    regime: Regime::Stable,
                    gdp_growth: 0.01 * i as f64,
                    inflation: 0.02 * i as f64,
                    unemployment: 0.03 + 0.001 * i as f64,
                    industry_outlook: IndustryOutlook::Stable,
                },
                outcomes: Outcomes {
                    year1: outcome(1),
                    year3: outcome(3),
                    year5: outcome(5),
                    year10: outcome(10),
                },
                key_events: Vec::new(),
            })
            .collect()
    }

    fn fixture_profile() -> Profile {
        Profile {
            age: 30,
            salary: 120_000.0,
            monthly_expenses: 5_000.0,
            cash: 20_000.0,
            years_experience: 5.0,
            current_role: Some("Engineer".to_string()),
        }
    }

    #[test]
    fn recoupled_values_stay_within_original_marginal_range() {
        let mut scenarios = fixture_scenarios(50);
        let (gdp_min, gdp_max) = (0.0, 0.01 * 49.0);
        let priors = MarketPriors::fixture();
        let profile = fixture_profile();
        let factory = StreamFactory::new(MasterSeed::from_str("fixture-001"));
        recouple_scenarios(
            &mut scenarios,
            &priors,
            DecisionType::JobOffer,
            DecisionOption::default(),
            &profile,
            &factory,
            99,
        );
        for s in &scenarios {
            assert!(s.conditions.gdp_growth >= gdp_min - 1e-9 && s.conditions.gdp_growth <= gdp_max + 1e-9);
        }
    }

    #[test]
    fn recoupling_reprojects_outcomes_not_just_conditions() {
        let mut scenarios = fixture_scenarios(50);
        let priors = MarketPriors::fixture();
        let profile = fixture_profile();
        let factory = StreamFactory::new(MasterSeed::from_str("fixture-001"));
        recouple_scenarios(
            &mut scenarios,
            &priors,
            DecisionType::JobOffer,
            DecisionOption::default(),
            &profile,
            &factory,
            99,
        );
        // the fixture's outcomes are all flat placeholder 1.0/5.0 values;
        // re-projection under the real generator must move them off that
        // placeholder for at least one scenario.
        assert!(scenarios
            .iter()
            .any(|s| s.outcomes.year10.financial.net_worth != 1.0));
    }

    #[test]
    fn small_ensembles_are_left_untouched() {
        let mut scenarios = fixture_scenarios(2);
        let original: Vec<f64> = scenarios.iter().map(|s| s.conditions.gdp_growth).collect();
        let priors = MarketPriors::fixture();
        let profile = fixture_profile();
        let factory = StreamFactory::new(MasterSeed::from_str("fixture-001"));
        recouple_scenarios(
            &mut scenarios,
            &priors,
            DecisionType::JobOffer,
            DecisionOption::default(),
            &profile,
            &factory,
            99,
        );
        let after: Vec<f64> = scenarios.iter().map(|s| s.conditions.gdp_growth).collect();
        assert_eq!(original, after);
    }
}
