//! Demonstration binary (§1 "Workspace framing"): not the product
//! boundary, just enough of a caller to run the pipeline against a
//! bundled fixture and print a summary, mirroring the teacher's thin
//! `bin/trainer`-style binary around its library crates.

use clap::Parser;
use lifesim_core::{CancellationToken, MarketPriors, ProgressObserver, ProgressReport};
use lifesim_engine::{Mode, SimulationConfig, SimulationEngine};
use lifesim_scenario::{DecisionOption, DecisionType, Profile};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Decision being evaluated
    #[arg(long, value_enum, default_value_t = DecisionArg::JobOffer)]
    decision: DecisionArg,

    /// Offered annual salary, for decisions that replace base salary
    #[arg(long, default_value_t = 150_000.0)]
    new_salary: f64,

    /// Simulation mode: fast, balanced, or accurate
    #[arg(long, value_enum, default_value_t = ModeArg::Balanced)]
    mode: ModeArg,

    /// Master seed for reproducible runs
    #[arg(long, default_value = "fixture-001")]
    seed: String,

    /// Print the full result as JSON instead of a text summary
    #[arg(long)]
    json: bool,
}

#[derive(Copy, Clone, Debug, clap::ValueEnum)]
enum DecisionArg {
    JobOffer,
    CareerChange,
    Education,
    Retirement,
    Other,
}

impl From<DecisionArg> for DecisionType {
    fn from(value: DecisionArg) -> Self {
        match value {
            DecisionArg::JobOffer => DecisionType::JobOffer,
            DecisionArg::CareerChange => DecisionType::CareerChange,
            DecisionArg::Education => DecisionType::Education,
            DecisionArg::Retirement => DecisionType::Retirement,
            DecisionArg::Other => DecisionType::Other,
        }
    }
}

#[derive(Copy, Clone, Debug, clap::ValueEnum)]
enum ModeArg {
    Fast,
    Balanced,
    Accurate,
}

impl From<ModeArg> for Mode {
    fn from(value: ModeArg) -> Self {
        match value {
            ModeArg::Fast => Mode::Fast,
            ModeArg::Balanced => Mode::Balanced,
            ModeArg::Accurate => Mode::Accurate,
        }
    }
}

/// Bundled fixture profile standing in for the UI/persistence layer
/// this binary has no opinion about (§1 non-goals).
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

/// Logs stage transitions unless `--json` is set, in which case stdout
/// is reserved for the result document.
struct CliProgress {
    json: bool,
}

impl ProgressObserver for CliProgress {
    fn report(&mut self, report: ProgressReport) {
        if !self.json {
            log::info!("{:?}: {}%", report.stage, report.percentage);
        }
    }
}

fn main() {
    lifesim_core::init_logging("logs");

    let args = Args::parse();
    let priors = MarketPriors::fixture();
    let profile = fixture_profile();
    let decision: DecisionType = args.decision.into();
    let option = DecisionOption {
        new_salary: decision.replaces_base_salary().then_some(args.new_salary),
    };
    let config = SimulationConfig::from_mode(args.mode.into(), args.seed.clone());
    let cancel = CancellationToken::new();

    let mut progress = CliProgress { json: args.json };

    let result = SimulationEngine::run_simulation(
        decision,
        option,
        &profile,
        &priors,
        &config,
        &[],
        &mut progress,
        &cancel,
    );

    match result {
        Ok(result) => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&result).expect("serialize result"));
            } else {
                print_summary(&result);
            }
        }
        Err(err) => {
            eprintln!("simulation failed: {err}");
            std::process::exit(1);
        }
    }
}

fn print_summary(result: &lifesim_engine::SimulationResult) {
    let metrics = &result.aggregate_metrics;
    println!("scenarios simulated: {}", result.scenarios.len());
    println!("method: {}", result.metadata.method);
    println!("expected 10-year net worth: ${:.0}", metrics.expected_value.financial);
    println!(
        "90% confidence interval: ${:.0} .. ${:.0}",
        metrics.confidence_interval.0, metrics.confidence_interval.1
    );
    println!("probability of success: {:.0}%", metrics.probability_of_success * 100.0);
    println!("risk score: {:.1}/10   opportunity score: {:.1}/10", metrics.risk_score, metrics.opportunity_score);
    println!();
    println!("recommendations:");
    for recommendation in &result.recommendations {
        println!("  - {}: {}", recommendation.title, recommendation.rationale);
    }
    if !result.metadata.warnings.is_empty() {
        println!();
        println!("warnings:");
        for warning in &result.metadata.warnings {
            println!("  - {warning}");
        }
    }
}
