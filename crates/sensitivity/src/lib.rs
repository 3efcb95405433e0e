//! Global sensitivity analysis (§4.6): Saltelli Sobol indices for
//! variance decomposition, Morris elementary effects for cheap
//! screening, and the uniform-to-parameter-space transforms both share.

mod morris;
mod saltelli;
mod transform;

pub use morris::{morris_screening, MorrisEffect, MorrisScreening};
pub use saltelli::{sobol_indices, SobolIndices};
pub use transform::{transform, transform_row};
