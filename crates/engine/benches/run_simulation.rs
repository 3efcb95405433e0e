use lifesim_core::{CancellationToken, MarketPriors, NullObserver};
use lifesim_engine::{Mode, SimulationConfig, SimulationEngine};
use lifesim_scenario::{DecisionOption, DecisionType, Profile};

criterion::criterion_main!(benches);
criterion::criterion_group! {
    name = benches;
    config = criterion::Criterion::default()
        .without_plots()
        .sample_size(10)
        .measurement_time(std::time::Duration::from_secs(5));
    targets =
        running_fast_mode,
        running_balanced_mode,
        running_accurate_mode_with_mlmc,
}

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

fn running_fast_mode(c: &mut criterion::Criterion) {
    let priors = MarketPriors::fixture();
    let profile = profile();
    let config = SimulationConfig::from_mode(Mode::Fast, "bench-seed");
    let cancel = CancellationToken::new();

    c.bench_function("run_simulation (fast, plain MC)", |b| {
        b.iter(|| {
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
        })
    });
}

fn running_balanced_mode(c: &mut criterion::Criterion) {
    let priors = MarketPriors::fixture();
    let profile = profile();
    let mut config = SimulationConfig::from_mode(Mode::Balanced, "bench-seed");
    config.target_scenarios = 500;
    let cancel = CancellationToken::new();

    c.bench_function("run_simulation (balanced, QMC + vine + reduction)", |b| {
        b.iter(|| {
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
        })
    });
}

fn running_accurate_mode_with_mlmc(c: &mut criterion::Criterion) {
    let priors = MarketPriors::fixture();
    let profile = profile();
    let mut config = SimulationConfig::from_mode(Mode::Accurate, "bench-seed");
    config.target_scenarios = 300;
    let cancel = CancellationToken::new();

    c.bench_function("run_simulation (accurate, MLMC path-dependent decision)", |b| {
        b.iter(|| {
            SimulationEngine::run_simulation(
                DecisionType::CareerChange,
                DecisionOption { new_salary: Some(150_000.0) },
                &profile,
                &priors,
                &config,
                &[],
                &mut NullObserver,
                &cancel,
            )
            .unwrap()
        })
    });
}
