//! `SimulationResult` and its `Metadata` (§3, §4.8 step 8): the
//! orchestrator's single return value, carrying the scenario set,
//! aggregate metrics, advice, optional sensitivity report, and
//! reproducibility/timing metadata.

use crate::data_quality::DataQuality;
use lifesim_scenario::{AggregateMetrics, Opportunity, Recommendation, RiskFactor, Scenario};
use lifesim_sensitivity::SobolIndices;
use serde::{Deserialize, Serialize};

/// Corroborating MLMC net-worth estimate for path-dependent decisions
/// (§9 open-question resolution 3, §4.8 step 4): runs alongside the
/// regular scenario ensemble rather than replacing it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MlmcSummary {
    pub estimate: f64,
    pub ci95: (f64, f64),
    pub cost_reduction: f64,
    pub levels_used: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    pub seed: String,
    pub method: String,
    pub computation_time_ms: u64,
    pub data_quality: DataQuality,
    pub warnings: Vec<String>,
    /// `false` only when MLMC hit its evaluation budget before meeting
    /// `mlmc_target_mse` (§7 `NonConvergent`, returned as a flag rather
    /// than an error so the caller still gets a usable result).
    pub converged: bool,
    pub mlmc: Option<MlmcSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    pub scenarios: Vec<Scenario>,
    pub aggregate_metrics: AggregateMetrics,
    pub recommendations: Vec<Recommendation>,
    pub risks: Vec<RiskFactor>,
    pub opportunities: Vec<Opportunity>,
    pub sensitivity: Option<SobolIndices>,
    pub metadata: Metadata,
}
