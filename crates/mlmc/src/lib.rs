//! Multilevel Monte Carlo with Brownian-bridge coupling (§4.4): a
//! telescoping sum of coupled coarse/fine path corrections, with
//! Giles-optimal sample allocation and an alternate QMC-driven path
//! for variance reduction on top of variance reduction.

mod bridge;
mod coupling;
mod estimator;
mod path;
mod qmc;

pub use bridge::{coarsen, refine};
pub use coupling::{cost_of_level, evaluate_correction, generate_level_noise};
pub use estimator::{run_mlmc, LevelResult, MlmcResult};
pub use path::PathGenerator;
pub use qmc::{evaluate_qmc_correction, qmc_coupled_noise};
