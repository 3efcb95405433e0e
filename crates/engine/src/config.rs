//! `SimulationConfig` (§6 "Configuration"): a `mode` preset expands into
//! concrete flags at construction time, the way the teacher's training
//! pipeline expands a `Mode` enum into phase parameters.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    Fast,
    Balanced,
    Accurate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub mode: Mode,
    pub target_scenarios: usize,
    pub use_qmc: bool,
    pub use_mlmc: bool,
    pub use_copulas: bool,
    pub reduce_scenarios: bool,
    pub run_sensitivity: bool,
    pub sensitivity_samples: usize,
    pub mlmc_target_mse: f64,
    pub seed: String,
}

impl SimulationConfig {
    /// Expand `mode` into concrete pipeline flags (§6 "mode" option).
    pub fn from_mode(mode: Mode, seed: impl Into<String>) -> Self {
        let seed = seed.into();
        match mode {
            Mode::Fast => Self {
                mode,
                target_scenarios: 200,
                use_qmc: false,
                use_mlmc: false,
                use_copulas: false,
                reduce_scenarios: false,
                run_sensitivity: false,
                sensitivity_samples: 256,
                mlmc_target_mse: 1e-3,
                seed,
            },
            Mode::Balanced => Self {
                mode,
                target_scenarios: 1_000,
                use_qmc: true,
                use_mlmc: true,
                use_copulas: true,
                reduce_scenarios: true,
                run_sensitivity: true,
                sensitivity_samples: 1_024,
                mlmc_target_mse: 1e-4,
                seed,
            },
            Mode::Accurate => Self {
                mode,
                target_scenarios: 5_000,
                use_qmc: true,
                use_mlmc: true,
                use_copulas: true,
                reduce_scenarios: true,
                run_sensitivity: true,
                sensitivity_samples: 4_096,
                mlmc_target_mse: 1e-5,
                seed,
            },
        }
    }
}
