//! Owen-scrambled Sobol low-discrepancy sequences (§4.2). Direction
//! numbers come from a fixed, master-seed-independent table; scrambling
//! permutations are keyed by the simulation's master seed so distinct
//! runs of the same configuration still decorrelate across seeds while
//! staying reproducible within one.

mod direction;
mod scrambling;
mod sequence;

pub use scrambling::ScramblingTable;
pub use sequence::{round_up_pow2, ScrambledSobol};
