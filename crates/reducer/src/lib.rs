//! Wasserstein scenario reduction (§4.7): a weighted distance between
//! scenario outcome profiles, Heitsch–Römisch forward selection down to
//! a target count, and a nested-distance multistage variant for
//! scenario trees.

mod distance;
mod forward_selection;
mod tree;

pub use distance::scenario_distance;
pub use forward_selection::reduce;
pub use tree::{build_tree, collapse_to_breadth, ScenarioTreeNode};
