use thiserror::Error;

/// Error kinds surfaced across the pipeline (§7).
///
/// Local recovery (validation, clamping, RNG guards) never reaches this
/// type — it substitutes a documented fallback and records a warning
/// instead. Fatal internal-invariant violations never reach this type
/// either — they panic, per §7, because they indicate a bug. What's left
/// is the subset the caller can legitimately act on.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimError {
    #[error("invalid input: {violations:?}")]
    InvalidInput { violations: Vec<String> },

    #[error("insufficient market priors, missing: {missing:?}")]
    InsufficientPriors { missing: Vec<String> },

    #[error("numeric failure at {site}")]
    NumericFailure { site: String },

    #[error("non-convergent: {reason}")]
    NonConvergent { reason: String },

    #[error("cancelled")]
    Cancelled,
}

pub type SimResult<T> = Result<T, SimError>;
