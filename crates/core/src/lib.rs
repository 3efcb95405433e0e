pub mod cancellation;
pub mod error;
pub mod market;
pub mod parameter;
pub mod progress;

pub use cancellation::CancellationToken;
pub use error::SimError;
pub use market::{GaussianParams, IndustryOutlook, MarketPriors, Regime, RegimeMarketData};
pub use parameter::{ParameterDistribution, ParameterRange};
pub use progress::{MonotonicProgress, NullObserver, ProgressObserver, ProgressReport, Stage};

/// dimensional analysis types shared across the pipeline
pub type Money = f64;
pub type Probability = f64;
pub type Score = f64;
pub type Years = u32;

/// clamp bound for all 1-10 life/career scores (I2)
pub const SCORE_MIN: Score = 1.0;
pub const SCORE_MAX: Score = 10.0;

/// tolerance for probability-sum invariants (I1, testable property 2)
pub const PROBABILITY_SUM_EPSILON: Probability = 1e-9;

/// the horizons every scenario is projected to (§4.5)
pub const HORIZONS: [Years; 4] = [1, 3, 5, 10];

/// clamp a 1-10 score, per invariant I2. Called after every stochastic
/// update to career/life metrics.
pub fn clamp_score(value: Score) -> Score {
    value.clamp(SCORE_MIN, SCORE_MAX)
}

/// test-only helper for constructing arbitrary instances of a type,
/// used by property tests across the workspace.
pub trait Arbitrary {
    fn random() -> Self;
}

/// initialize combined terminal + file logging, mirroring the teacher's
/// `init()` convention. Only available when the `native` feature is on.
#[cfg(feature = "native")]
pub fn init_logging(log_dir: &str) {
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config.clone(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    std::fs::create_dir_all(log_dir).expect("create log directory");
    let time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("time moves forward")
        .as_secs();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config,
        std::fs::File::create(format!("{log_dir}/{time}.log")).expect("create log file"),
    );
    simplelog::CombinedLogger::init(vec![term, file]).expect("initialize logger");
}

/// fatal invariant violation. these indicate a bug, not a recoverable
/// error, so they panic rather than propagate (§7).
pub fn assert_invariant(condition: bool, message: impl std::fmt::Display) {
    if !condition {
        panic!("invariant violated: {message}");
    }
}
