//! Probability re-weighting and weighted aggregate statistics (§4.5
//! steps 4 and "Aggregate metrics"): turns a set of generated scenarios
//! into the distribution-level numbers the caller actually wants —
//! expected value, volatility, confidence interval, probability of
//! success, and bounded risk/opportunity composites.

use crate::types::Scenario;
use lifesim_core::{Probability, Score, PROBABILITY_SUM_EPSILON};
use serde::{Deserialize, Serialize};

/// Re-weight scenario probabilities by their regime's fixed multiplier
/// (§4.5 step 4: recession x0.8, downturn x0.9, stable x1.2, growth
/// x1.0, boom x0.7) and renormalize so they sum back to 1 (I1). Falls
/// back to uniform weights if every scenario's weight collapsed to
/// zero, per §7 `NumericFailure` local-recovery guidance.
pub fn reweight_by_regime(scenarios: &mut [Scenario]) {
    for scenario in scenarios.iter_mut() {
        scenario.probability *= scenario.conditions.regime.reweight_multiplier();
    }
    normalize_probabilities(scenarios);
}

/// Renormalize probabilities to sum to 1, substituting uniform weights
/// if the total collapsed to (near) zero (§7 `NumericFailure`
/// fallback: "uniform initial weights if scenario-probability
/// normalization divides by zero").
pub fn normalize_probabilities(scenarios: &mut [Scenario]) -> bool {
    let total: Probability = scenarios.iter().map(|s| s.probability).sum();
    if total.abs() < 1e-12 {
        let uniform = 1.0 / scenarios.len().max(1) as f64;
        for scenario in scenarios.iter_mut() {
            scenario.probability = uniform;
        }
        return false;
    }
    for scenario in scenarios.iter_mut() {
        scenario.probability /= total;
    }
    true
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ExpectedValue {
    pub financial: f64,
    pub career: f64,
    pub life: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateMetrics {
    pub expected_value: ExpectedValue,
    pub volatility: f64,
    pub confidence_interval: (f64, f64),
    pub confidence_level: f64,
    pub probability_of_success: Probability,
    pub risk_score: Score,
    pub opportunity_score: Score,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub title: String,
    pub rationale: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskFactor {
    pub name: String,
    pub score: Score,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Opportunity {
    pub name: String,
    pub score: Score,
    pub description: String,
}

/// Weighted mean of `f(scenario)` over `scenarios`, assuming
/// probabilities already sum to 1 (I1).
fn weighted_mean(scenarios: &[Scenario], f: impl Fn(&Scenario) -> f64) -> f64 {
    scenarios.iter().map(|s| s.probability * f(s)).sum()
}

/// Weighted order-statistic confidence interval at `level` (e.g. 0.90):
/// sort by `f(scenario)`, walk the cumulative probability mass, and
/// report the values bracketing the central `level` mass.
fn weighted_confidence_interval(scenarios: &[Scenario], level: f64, f: impl Fn(&Scenario) -> f64) -> (f64, f64) {
    let mut values: Vec<(f64, f64)> = scenarios.iter().map(|s| (f(s), s.probability)).collect();
    values.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());

    let tail = (1.0 - level) / 2.0;
    let lower_target = tail;
    let upper_target = 1.0 - tail;

    let mut cumulative = 0.0;
    let mut lower = values.first().map(|v| v.0).unwrap_or(0.0);
    let mut upper = values.last().map(|v| v.0).unwrap_or(0.0);
    let mut lower_found = false;
    for &(value, weight) in &values {
        cumulative += weight;
        if !lower_found && cumulative >= lower_target {
            lower = value;
            lower_found = true;
        }
        if cumulative >= upper_target {
            upper = value;
            break;
        }
    }
    (lower, upper)
}

/// Total probability mass of scenarios meeting the success bar (§4.5
/// "probabilityOfSuccess ... year-10 net worth > 0, satisfaction > 5,
/// happiness > 5").
fn probability_of_success(scenarios: &[Scenario]) -> Probability {
    scenarios
        .iter()
        .filter(|s| {
            let outcome = s.outcomes.at(10);
            outcome.financial.net_worth > 0.0 && outcome.career.satisfaction > 5.0 && outcome.life.happiness > 5.0
        })
        .map(|s| s.probability)
        .sum()
}

/// Bounded composite risk/opportunity scores (§4.5: "bounded composites
/// of volatility, downside mass, and mean overall score, each in
/// [0,10]"), scaled by a data-quality `confidence` multiplier in
/// `[0, 1]` supplied by the caller (the orchestrator's data-quality
/// assessment, §4.8 step 1).
fn risk_and_opportunity(
    scenarios: &[Scenario],
    net_worth_volatility: f64,
    confidence: f64,
) -> (Score, Score) {
    let downside_mass: f64 = scenarios
        .iter()
        .filter(|s| s.outcomes.at(10).financial.net_worth <= 0.0)
        .map(|s| s.probability)
        .sum();
    let mean_overall_score = weighted_mean(scenarios, |s| {
        let outcome = s.outcomes.at(10);
        (outcome.career.satisfaction + outcome.life.happiness + outcome.life.balance + outcome.life.health) / 4.0
    });

    let volatility_component = (net_worth_volatility * 10.0).min(10.0);
    let raw_risk = 0.5 * volatility_component + 0.4 * downside_mass * 10.0 + 0.1 * (10.0 - mean_overall_score);
    let raw_opportunity = 0.6 * mean_overall_score + 0.3 * (1.0 - downside_mass) * 10.0 - 0.1 * volatility_component;

    // Risk/opportunity live on a [0, 10] composite scale, distinct from
    // the [1, 10] life/career scores `clamp_score` enforces (§4.5).
    let risk = (raw_risk * confidence).clamp(0.0, 10.0);
    let opportunity = (raw_opportunity * confidence).clamp(0.0, 10.0);
    (risk, opportunity)
}

/// Aggregate a weighted scenario set into `AggregateMetrics` (§4.5
/// "Aggregate metrics"). `confidence_level` is the requested CI level
/// (default 0.90); `data_quality_confidence` scales the risk/opportunity
/// composites.
pub fn aggregate(scenarios: &[Scenario], confidence_level: f64, data_quality_confidence: f64) -> AggregateMetrics {
    let total: Probability = scenarios.iter().map(|s| s.probability).sum();
    lifesim_core::assert_invariant(
        (total - 1.0).abs() < 1e-6,
        format!("scenario probabilities must sum to 1, got {total}"),
    );

    let net_worth = |s: &Scenario| s.outcomes.at(10).financial.net_worth;
    let career_value = |s: &Scenario| {
        let c = &s.outcomes.at(10).career;
        (c.seniority + c.satisfaction) / 2.0
    };
    let life_value = |s: &Scenario| s.outcomes.at(10).life.happiness;

    let mean_net_worth = weighted_mean(scenarios, net_worth);
    let variance_net_worth = weighted_mean(scenarios, |s| (net_worth(s) - mean_net_worth).powi(2));
    let volatility = if mean_net_worth.abs() > 1e-9 {
        variance_net_worth.sqrt() / mean_net_worth.abs()
    } else {
        0.0
    };

    let expected_value = ExpectedValue {
        financial: mean_net_worth,
        career: weighted_mean(scenarios, career_value),
        life: weighted_mean(scenarios, life_value),
    };

    let confidence_interval = weighted_confidence_interval(scenarios, confidence_level, net_worth);
    let (risk_score, opportunity_score) = risk_and_opportunity(scenarios, volatility, data_quality_confidence);

    AggregateMetrics {
        expected_value,
        volatility,
        confidence_interval,
        confidence_level,
        probability_of_success: probability_of_success(scenarios),
        risk_score,
        opportunity_score,
    }
}

/// Heuristic recommendations/risks/opportunities from the aggregate
/// metrics and scenario set (§1 "ranked recommendations, risks, and
/// opportunities"). These are plain descriptive heuristics, not a
/// learned model — the narrative layer that turns them into prose is
/// an external collaborator (§1 non-goals).
pub fn recommendations(metrics: &AggregateMetrics) -> Vec<Recommendation> {
    let mut out = Vec::new();
    if metrics.probability_of_success < 0.5 {
        out.push(Recommendation {
            title: "Build a larger financial buffer before committing".to_string(),
            rationale: format!(
                "only {:.0}% of simulated paths clear the success bar",
                metrics.probability_of_success * 100.0
            ),
        });
    }
    if metrics.volatility > 0.6 {
        out.push(Recommendation {
            title: "Diversify exposure to reduce outcome variance".to_string(),
            rationale: format!("projected net worth volatility is {:.2}", metrics.volatility),
        });
    }
    if metrics.opportunity_score > 7.0 {
        out.push(Recommendation {
            title: "This path shows strong upside under the simulated priors".to_string(),
            rationale: format!("opportunity score {:.1}/10", metrics.opportunity_score),
        });
    }
    if out.is_empty() {
        out.push(Recommendation {
            title: "Outcomes are broadly balanced across simulated futures".to_string(),
            rationale: "no single risk or opportunity dominates the distribution".to_string(),
        });
    }
    out
}

pub fn risks(metrics: &AggregateMetrics) -> Vec<RiskFactor> {
    let mut out = Vec::new();
    if metrics.risk_score > 5.0 {
        out.push(RiskFactor {
            name: "Outcome variance".to_string(),
            score: metrics.risk_score,
            description: "the simulated distribution has meaningful downside mass".to_string(),
        });
    }
    if metrics.probability_of_success < 0.5 {
        out.push(RiskFactor {
            name: "Success probability".to_string(),
            score: (10.0 - metrics.probability_of_success * 10.0).clamp(0.0, 10.0),
            description: "fewer than half of simulated futures clear the success bar".to_string(),
        });
    }
    out
}

pub fn opportunities(metrics: &AggregateMetrics) -> Vec<Opportunity> {
    let mut out = Vec::new();
    if metrics.opportunity_score > 5.0 {
        out.push(Opportunity {
            name: "Favorable expected value".to_string(),
            score: metrics.opportunity_score,
            description: "simulated outcomes skew positive relative to the baseline".to_string(),
        });
    }
    out
}
