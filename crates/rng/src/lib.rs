//! Philox-4x32-10 counter-based RNG (§4.1): deterministic, splittable,
//! reproducible. Every independent substream is derived purely from a
//! parent state and an index, so the orchestrator can fan work out over
//! a worker pool and still get bit-identical results regardless of
//! thread count (I3, §5).

mod factory;
mod philox;
mod stream;

pub use factory::{MasterSeed, StreamFactory};
pub use stream::{RngState, RngStream};
