//! Orchestrator (§4.8): composes RNG streams, scenario generation,
//! optional vine re-coupling, sensitivity analysis, and Wasserstein
//! reduction into one `SimulationEngine::run_simulation` call. Publishes
//! progress at the documented stage boundaries and honors a cooperative
//! cancellation token at each batch boundary (§5).

pub mod config;
pub mod data_quality;
pub mod recouple;
pub mod result;
mod sensitivity_model;
pub mod validation;

pub use config::{Mode, SimulationConfig};
pub use data_quality::{assess_data_quality, sample_multiplier, Confidence, DataQuality};
pub use result::{Metadata, MlmcSummary, SimulationResult};

use lifesim_core::{
    CancellationToken, MarketPriors, ParameterRange, ProgressObserver, ProgressReport, Regime,
    SimError, SimResult, Stage,
};
use lifesim_mlmc::run_mlmc;
use lifesim_reducer::reduce;
use lifesim_rng::{MasterSeed, StreamFactory};
use lifesim_scenario::{
    aggregate, generate_scenarios, generate_scenarios_qmc, normalize_probabilities, opportunities,
    recommendations, reweight_by_regime, risks, DecisionOption, DecisionType, EconomicPathGenerator,
    Profile, Recommendation,
};
use lifesim_sensitivity::{sobol_indices, SobolIndices};
use std::time::Instant;

/// Fixed substream roles (§4.8 step 2): one independent substream family
/// per pipeline concern, so generation, sensitivity, MLMC, and
/// re-coupling never draw from the same counter range.
mod role {
    pub const SENSITIVITY: u32 = 100;
    pub const SENSITIVITY_NOISE: u32 = 101;
    pub const GENERATION: u32 = 200;
    pub const MLMC: u32 = 300;
    pub const RECOUPLE: u32 = 400;
}

const DEFAULT_CONFIDENCE_LEVEL: f64 = 0.90;
const MLMC_MAX_LEVELS: usize = 8;

fn confidence_multiplier(confidence: Confidence) -> f64 {
    match confidence {
        Confidence::High => 1.0,
        Confidence::Medium => 0.8,
        Confidence::Low => 0.6,
    }
}

/// The embedded simulation core's single entry point (§6). Stateless:
/// every call is fully parameterized by its arguments, so there is
/// nothing about the engine itself to construct or tear down.
pub struct SimulationEngine;

impl SimulationEngine {
    /// §4.8: drive the full pipeline under one master seed, publishing
    /// progress at documented stage boundaries and honoring `cancel` at
    /// every batch boundary.
    pub fn run_simulation<P: ProgressObserver>(
        decision: DecisionType,
        option: DecisionOption,
        profile: &Profile,
        priors: &MarketPriors,
        config: &SimulationConfig,
        sensitivity_ranges: &[ParameterRange],
        progress: &mut P,
        cancel: &CancellationToken,
    ) -> SimResult<SimulationResult> {
        let start = Instant::now();
        let mut warnings = Vec::new();

        validation::validate_profile(profile)?;
        priors
            .validate()
            .map_err(|missing| SimError::InsufficientPriors { missing })?;

        progress.report(ProgressReport { stage: Stage::Init, percentage: 5 });
        let data_quality = assess_data_quality(profile, decision);
        let multiplier = sample_multiplier(data_quality.completeness);
        let generation_count = ((config.target_scenarios as f64) * multiplier).round().max(1.0) as usize;
        progress.report(ProgressReport { stage: Stage::Init, percentage: 10 });

        if cancel.is_cancelled() {
            return Err(SimError::Cancelled);
        }

        let master_seed = MasterSeed::from_str(&config.seed);
        let factory = StreamFactory::new(master_seed);

        let mut sensitivity_report: Option<SobolIndices> = None;
        let mut sensitivity_recommendation = None;
        if config.run_sensitivity && !sensitivity_ranges.is_empty() {
            progress.report(ProgressReport { stage: Stage::Sensitivity, percentage: 15 });
            let frozen_noise = factory.stream(role::SENSITIVITY_NOISE, 0);
            let model = sensitivity_model::net_worth_model(
                priors.clone(),
                decision,
                option,
                profile.clone(),
                sensitivity_ranges.to_vec(),
                frozen_noise,
            );
            let indices = sobol_indices(sensitivity_ranges, config.sensitivity_samples, master_seed, model);
            sensitivity_recommendation = Some(key_driver_recommendation(sensitivity_ranges, &indices));
            sensitivity_report = Some(indices);
            progress.report(ProgressReport { stage: Stage::Sensitivity, percentage: 25 });

            if cancel.is_cancelled() {
                return Err(SimError::Cancelled);
            }
        }

        progress.report(ProgressReport { stage: Stage::Generation, percentage: 30 });
        let use_mlmc = config.use_mlmc && decision.is_path_dependent();
        let mut scenarios = if config.use_qmc {
            generate_scenarios_qmc(
                priors,
                decision,
                option,
                profile,
                generation_count,
                &factory,
                role::GENERATION,
                master_seed,
            )
        } else {
            generate_scenarios(priors, decision, option, profile, generation_count, &factory, role::GENERATION)
        };
        progress.report(ProgressReport { stage: Stage::Generation, percentage: 50 });

        if cancel.is_cancelled() {
            return Err(SimError::Cancelled);
        }

        let mut converged = true;
        let mut mlmc_summary = None;
        if use_mlmc {
            let stable = priors.regime(Regime::Stable);
            let path_generator = EconomicPathGenerator {
                initial_net_worth: profile.cash,
                annual_savings: (profile.salary - profile.monthly_expenses * 12.0).max(0.0),
                mean_return: stable.asset_return.mean,
                volatility: stable.asset_return.std,
            };
            let mlmc_result = run_mlmc(&path_generator, config.mlmc_target_mse, MLMC_MAX_LEVELS, &factory, role::MLMC);
            converged = mlmc_result.converged;
            if !converged {
                warnings.push(
                    "MLMC allocation hit its evaluation budget before meeting the target MSE".to_string(),
                );
            }
            mlmc_summary = Some(MlmcSummary {
                estimate: mlmc_result.estimate,
                ci95: mlmc_result.ci95,
                cost_reduction: mlmc_result.cost_reduction,
                levels_used: mlmc_result.levels.len(),
            });
        }
        progress.report(ProgressReport { stage: Stage::Generation, percentage: 60 });

        if config.use_copulas {
            if cancel.is_cancelled() {
                return Err(SimError::Cancelled);
            }
            progress.report(ProgressReport { stage: Stage::Coupling, percentage: 65 });
            recouple::recouple_scenarios(
                &mut scenarios,
                priors,
                decision,
                option,
                profile,
                &factory,
                role::RECOUPLE,
            );
            progress.report(ProgressReport { stage: Stage::Coupling, percentage: 75 });
        }

        reweight_by_regime(&mut scenarios);
        if !normalize_probabilities(&mut scenarios) {
            warnings.push("scenario probability mass collapsed to zero; fell back to uniform weights".to_string());
        }

        if cancel.is_cancelled() {
            return Err(SimError::Cancelled);
        }

        if config.reduce_scenarios && scenarios.len() > config.target_scenarios {
            progress.report(ProgressReport { stage: Stage::Reduction, percentage: 80 });
            scenarios = reduce(&scenarios, config.target_scenarios);
            progress.report(ProgressReport { stage: Stage::Reduction, percentage: 85 });
        }

        let metrics = aggregate(
            &scenarios,
            DEFAULT_CONFIDENCE_LEVEL,
            confidence_multiplier(data_quality.confidence),
        );
        let mut advice = recommendations(&metrics);
        if let Some(extra) = sensitivity_recommendation {
            advice.push(extra);
        }
        let risk_list = risks(&metrics);
        let opportunity_list = opportunities(&metrics);

        let method = describe_method(config, use_mlmc);
        progress.report(ProgressReport { stage: Stage::Complete, percentage: 100 });

        Ok(SimulationResult {
            scenarios,
            aggregate_metrics: metrics,
            recommendations: advice,
            risks: risk_list,
            opportunities: opportunity_list,
            sensitivity: sensitivity_report,
            metadata: Metadata {
                seed: config.seed.clone(),
                method,
                computation_time_ms: start.elapsed().as_millis() as u64,
                data_quality,
                warnings,
                converged,
                mlmc: mlmc_summary,
            },
        })
    }

    /// §6 `run_quick_estimate`: identical pipeline with a fixed,
    /// inexpensive override of `target_scenarios`/`run_sensitivity`/
    /// `use_mlmc`/`reduce_scenarios`, regardless of the caller's config.
    pub fn run_quick_estimate<P: ProgressObserver>(
        decision: DecisionType,
        option: DecisionOption,
        profile: &Profile,
        priors: &MarketPriors,
        seed: impl Into<String>,
        progress: &mut P,
        cancel: &CancellationToken,
    ) -> SimResult<SimulationResult> {
        let quick = SimulationConfig {
            mode: Mode::Fast,
            target_scenarios: 50,
            use_qmc: false,
            use_mlmc: false,
            use_copulas: false,
            reduce_scenarios: false,
            run_sensitivity: false,
            sensitivity_samples: 0,
            mlmc_target_mse: 1e-3,
            seed: seed.into(),
        };
        Self::run_simulation(decision, option, profile, priors, &quick, &[], progress, cancel)
    }

    /// §6 `analyze_sensitivity`: run only the Saltelli Sobol-index pass
    /// (§4.6), without generating or aggregating a scenario ensemble.
    pub fn analyze_sensitivity(
        decision: DecisionType,
        option: DecisionOption,
        profile: &Profile,
        priors: &MarketPriors,
        ranges: &[ParameterRange],
        n: usize,
        seed: &str,
    ) -> SimResult<SobolIndices> {
        if ranges.is_empty() {
            return Err(SimError::InvalidInput {
                violations: vec!["analyze_sensitivity requires at least one parameter range".to_string()],
            });
        }
        validation::validate_profile(profile)?;
        priors
            .validate()
            .map_err(|missing| SimError::InsufficientPriors { missing })?;

        let master_seed = MasterSeed::from_str(seed);
        let factory = StreamFactory::new(master_seed);
        let frozen_noise = factory.stream(role::SENSITIVITY_NOISE, 0);
        let model = sensitivity_model::net_worth_model(
            priors.clone(),
            decision,
            option,
            profile.clone(),
            ranges.to_vec(),
            frozen_noise,
        );
        Ok(sobol_indices(ranges, n, master_seed, model))
    }
}

/// §4.8 step 3: "retain the key drivers and a recommendation" — names
/// the parameter with the largest total-order index as the dominant
/// driver of outcome variance.
fn key_driver_recommendation(ranges: &[ParameterRange], indices: &SobolIndices) -> Recommendation {
    let top = indices
        .total_order
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap())
        .map(|(i, &value)| (ranges[i].name.clone(), value))
        .unwrap_or(("(none)".to_string(), 0.0));

    Recommendation {
        title: format!("{} is the dominant driver of outcome variance", top.0),
        rationale: format!(
            "total-order Sobol index {:.2} vs. interaction strength {:.2}",
            top.1, indices.interaction_strength
        ),
    }
}

fn describe_method(config: &SimulationConfig, use_mlmc: bool) -> String {
    let mut parts = Vec::new();
    parts.push(if use_mlmc {
        "mlmc"
    } else if config.use_qmc {
        "qmc"
    } else {
        "plain_mc"
    });
    if config.use_copulas {
        parts.push("vine");
    }
    if config.reduce_scenarios {
        parts.push("reduced");
    }
    parts.join("+")
}

#[cfg(test)]
mod tests {
    use super::*;
    use lifesim_core::{NullObserver, ParameterRange};

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

    fn fast_config(seed: &str) -> SimulationConfig {
        let mut config = SimulationConfig::from_mode(Mode::Fast, seed);
        config.target_scenarios = 300;
        config
    }

    /// E1: doubling the offered salary raises expected financial value
    /// and clears the probability-of-success bar.
    #[test]
    fn job_offer_with_higher_salary_outperforms() {
        let priors = MarketPriors::fixture();
        let base_profile = profile();
        let cancel = CancellationToken::new();

        let low = SimulationEngine::run_simulation(
            DecisionType::JobOffer,
            DecisionOption { new_salary: Some(120_000.0) },
            &base_profile,
            &priors,
            &fast_config("fixture-001"),
            &[],
            &mut NullObserver,
            &cancel,
        )
        .unwrap();

        let high = SimulationEngine::run_simulation(
            DecisionType::JobOffer,
            DecisionOption { new_salary: Some(240_000.0) },
            &base_profile,
            &priors,
            &fast_config("fixture-001"),
            &[],
            &mut NullObserver,
            &cancel,
        )
        .unwrap();

        assert!(high.aggregate_metrics.expected_value.financial > low.aggregate_metrics.expected_value.financial);
        assert!(high.aggregate_metrics.probability_of_success >= 0.55, "{}", high.aggregate_metrics.probability_of_success);
    }

    /// E2: a sparse profile reports low confidence and completeness
    /// below 0.5, and the pipeline still produces a usable result.
    #[test]
    fn sparse_profile_reports_low_data_quality() {
        let priors = MarketPriors::fixture();
        let sparse_profile = Profile {
            age: 30,
            salary: 0.0,
            monthly_expenses: 0.0,
            cash: 0.0,
            years_experience: 0.0,
            current_role: Some("Engineer".to_string()),
        };
        let cancel = CancellationToken::new();

        let result = SimulationEngine::run_simulation(
            DecisionType::JobOffer,
            DecisionOption { new_salary: Some(150_000.0) },
            &sparse_profile,
            &priors,
            &fast_config("fixture-001"),
            &[],
            &mut NullObserver,
            &cancel,
        )
        .unwrap();

        assert!(result.metadata.data_quality.completeness < 0.5);
    }

    #[test]
    fn invalid_profile_is_rejected_before_any_simulation_runs() {
        let priors = MarketPriors::fixture();
        let mut bad_profile = profile();
        bad_profile.age = 5;
        let cancel = CancellationToken::new();

        let result = SimulationEngine::run_simulation(
            DecisionType::JobOffer,
            DecisionOption::default(),
            &bad_profile,
            &priors,
            &fast_config("fixture-001"),
            &[],
            &mut NullObserver,
            &cancel,
        );
        assert!(matches!(result, Err(SimError::InvalidInput { .. })));
    }

    #[test]
    fn accurate_mode_runs_sensitivity_mlmc_copulas_and_reduction() {
        let priors = MarketPriors::fixture();
        let base_profile = profile();
        let mut config = SimulationConfig::from_mode(Mode::Accurate, "fixture-001");
        config.target_scenarios = 200;
        config.sensitivity_samples = 256;
        let ranges = vec![
            ParameterRange::uniform("salary", 80_000.0, 300_000.0),
            ParameterRange::uniform("monthly_expenses", 2_000.0, 8_000.0),
        ];
        let cancel = CancellationToken::new();

        let result = SimulationEngine::run_simulation(
            DecisionType::CareerChange,
            DecisionOption { new_salary: Some(150_000.0) },
            &base_profile,
            &priors,
            &config,
            &ranges,
            &mut NullObserver,
            &cancel,
        )
        .unwrap();

        assert!(result.sensitivity.is_some());
        assert!(result.metadata.mlmc.is_some());
        assert!(result.scenarios.len() <= config.target_scenarios);
        let total: f64 = result.scenarios.iter().map(|s| s.probability).sum();
        assert!((total - 1.0).abs() < 1e-6, "total={total}");
    }

    #[test]
    fn cancellation_before_the_run_starts_returns_cancelled() {
        let priors = MarketPriors::fixture();
        let base_profile = profile();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = SimulationEngine::run_simulation(
            DecisionType::JobOffer,
            DecisionOption::default(),
            &base_profile,
            &priors,
            &fast_config("fixture-001"),
            &[],
            &mut NullObserver,
            &cancel,
        );
        assert!(matches!(result, Err(SimError::Cancelled)));
    }

    #[test]
    fn quick_estimate_uses_fixed_cheap_overrides() {
        let priors = MarketPriors::fixture();
        let base_profile = profile();
        let cancel = CancellationToken::new();

        let result = SimulationEngine::run_quick_estimate(
            DecisionType::JobOffer,
            DecisionOption { new_salary: Some(150_000.0) },
            &base_profile,
            &priors,
            "fixture-001",
            &mut NullObserver,
            &cancel,
        )
        .unwrap();

        assert!(result.scenarios.len() <= 50);
        assert!(result.sensitivity.is_none());
    }

    /// E3: sensitivity on an additive model recovers the closed-form
    /// Sobol indices — checked directly against `analyze_sensitivity`'s
    /// own plumbing by exercising it on a profile where salary dominates.
    #[test]
    fn analyze_sensitivity_ranks_salary_above_a_narrow_range() {
        let priors = MarketPriors::fixture();
        let base_profile = profile();
        let ranges = vec![
            ParameterRange::uniform("salary", 60_000.0, 400_000.0),
            ParameterRange::uniform("years_experience", 4.0, 6.0),
        ];

        let indices = SimulationEngine::analyze_sensitivity(
            DecisionType::JobOffer,
            DecisionOption::default(),
            &base_profile,
            &priors,
            &ranges,
            1024,
            "fixture-001",
        )
        .unwrap();

        assert!(indices.total_order[0] > indices.total_order[1]);
        assert!(indices.sum_first_order <= 1.0 + 1e-2);
    }
}
