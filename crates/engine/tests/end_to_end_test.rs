//! End-to-end fixture scenarios for the testable properties in §8 that
//! no single crate's unit tests exercise on their own: reducer fidelity
//! against a real generated ensemble (E4), MLMC's cost advantage over
//! plain Monte Carlo at a fixed target MSE (E5), and determinism of the
//! full pipeline across worker-thread counts (E6).

use lifesim_core::{CancellationToken, MarketPriors, NullObserver};
use lifesim_engine::{Mode, SimulationConfig, SimulationEngine};
use lifesim_mlmc::{run_mlmc, PathGenerator};
use lifesim_reducer::reduce;
use lifesim_rng::{MasterSeed, StreamFactory};
use lifesim_scenario::{generate_scenarios, DecisionOption, DecisionType, Profile, Scenario};

fn profile() -> Profile {
    Profile {
        age: 30,
        salary: 120_000.0,
        monthly_expenses: 5_000.0,
        cash: 20_000.0,
        years_experience: 5.0,
        current_role: Some("Engineer".to_string()),
    }
}

fn weighted_mean(scenarios: &[Scenario], f: impl Fn(&Scenario) -> f64) -> f64 {
    scenarios.iter().map(|s| s.probability * f(s)).sum()
}

/// Weighted percentile by cumulative-mass walk over values sorted ascending.
fn weighted_percentile(scenarios: &[Scenario], p: f64, f: impl Fn(&Scenario) -> f64) -> f64 {
    let mut values: Vec<(f64, f64)> = scenarios.iter().map(|s| (f(s), s.probability)).collect();
    values.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());
    let mut cumulative = 0.0;
    for &(value, weight) in &values {
        cumulative += weight;
        if cumulative >= p {
            return value;
        }
    }
    values.last().map(|v| v.0).unwrap_or(0.0)
}

/// E4: reducing 1000 scenarios to 100 should preserve the weighted mean
/// year-10 net worth to within 2% and the 5th/95th weighted percentiles
/// to within 5% (§8 testable property 9, reducer fidelity bound).
#[test]
fn reducer_preserves_distribution_shape_within_bounds() {
    let priors = MarketPriors::fixture();
    let profile = profile();
    let factory = StreamFactory::new(MasterSeed::from_str("fixture-001"));

    let mut scenarios = generate_scenarios(
        &priors,
        DecisionType::JobOffer,
        DecisionOption { new_salary: Some(150_000.0) },
        &profile,
        1000,
        &factory,
        200,
    );
    lifesim_scenario::reweight_by_regime(&mut scenarios);
    lifesim_scenario::normalize_probabilities(&mut scenarios);

    let net_worth = |s: &Scenario| s.outcomes.at(10).financial.net_worth;
    let original_mean = weighted_mean(&scenarios, net_worth);
    let original_p05 = weighted_percentile(&scenarios, 0.05, net_worth);
    let original_p95 = weighted_percentile(&scenarios, 0.95, net_worth);

    let reduced = reduce(&scenarios, 100);
    assert_eq!(reduced.len(), 100);
    let total: f64 = reduced.iter().map(|s| s.probability).sum();
    assert!((total - 1.0).abs() < 1e-6, "total={total}");

    let reduced_mean = weighted_mean(&reduced, net_worth);
    let reduced_p05 = weighted_percentile(&reduced, 0.05, net_worth);
    let reduced_p95 = weighted_percentile(&reduced, 0.95, net_worth);

    let mean_drift = (reduced_mean - original_mean).abs() / original_mean.abs().max(1.0);
    assert!(mean_drift < 0.02, "mean drift {mean_drift} exceeds 2%");

    let p05_drift = (reduced_p05 - original_p05).abs() / original_p05.abs().max(1.0);
    let p95_drift = (reduced_p95 - original_p95).abs() / original_p95.abs().max(1.0);
    assert!(p05_drift < 0.05, "p05 drift {p05_drift} exceeds 5%");
    assert!(p95_drift < 0.05, "p95 drift {p95_drift} exceeds 5%");
}

/// Path generator with a known closed-form mean (1.0) and per-step unit
/// variance, used to check MLMC's cost advantage at a tight target MSE
/// (E5, property 6).
struct UnitDriftPath;

impl PathGenerator for UnitDriftPath {
    fn steps_for(&self, level: usize) -> usize {
        4 << level
    }

    fn generate_from_noise(&self, _level: usize, noise: &[f64]) -> Vec<f64> {
        noise.to_vec()
    }

    fn evaluate(&self, path: &[f64]) -> f64 {
        1.0 + path.iter().sum::<f64>() / (path.len() as f64).sqrt()
    }
}

/// E5: at a tight target MSE, MLMC's optimal allocation costs at least
/// 5x less than the plain-Monte-Carlo budget it is compared against.
#[test]
fn mlmc_achieves_at_least_5x_cost_reduction_at_tight_mse() {
    let factory = StreamFactory::new(MasterSeed::from_str("fixture-001"));
    let result = run_mlmc(&UnitDriftPath, 1e-4, 8, &factory, 300);

    assert!((result.estimate - 1.0).abs() < 0.1, "estimate={}", result.estimate);
    assert!(result.cost_reduction >= 5.0, "cost_reduction={}", result.cost_reduction);
}

/// E6: the full orchestrated pipeline produces bit-identical aggregate
/// metrics and scenario ordering regardless of how many rayon worker
/// threads are available (I3, property 1).
#[test]
fn full_pipeline_is_deterministic_across_thread_counts() {
    let priors = MarketPriors::fixture();
    let profile = profile();
    let mut config = SimulationConfig::from_mode(Mode::Balanced, "fixture-001");
    config.target_scenarios = 200;
    let cancel = CancellationToken::new();

    let run = || {
        SimulationEngine::run_simulation(
            DecisionType::JobOffer,
            DecisionOption { new_salary: Some(150_000.0) },
            &profile,
            &priors,
            &config,
            &[],
            &mut NullObserver,
            &cancel,
        )
        .unwrap()
    };

    let results: Vec<_> = [1usize, 4, 16]
        .iter()
        .map(|&threads| {
            let pool = rayon::ThreadPoolBuilder::new().num_threads(threads).build().unwrap();
            pool.install(run)
        })
        .collect();

    let baseline = &results[0];
    for other in &results[1..] {
        assert_eq!(baseline.scenarios.len(), other.scenarios.len());
        for (a, b) in baseline.scenarios.iter().zip(other.scenarios.iter()) {
            assert_eq!(a.id, b.id);
            assert!((a.probability - b.probability).abs() < 1e-15);
        }
        assert!(
            (baseline.aggregate_metrics.expected_value.financial
                - other.aggregate_metrics.expected_value.financial)
                .abs()
                < 1e-9
        );
        assert!((baseline.aggregate_metrics.volatility - other.aggregate_metrics.volatility).abs() < 1e-9);
    }
}
