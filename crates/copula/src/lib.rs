//! Regular vine copulas fit by Dissmann's method (§4.3): pair copulas
//! {Gaussian, Clayton, Gumbel, Student-t} composed over a maximum
//! spanning tree of Kendall's tau, used to couple otherwise-independent
//! exogenous factors (market return, inflation, career shock) with
//! realistic cross-factor dependence.

mod kendall;
mod pair;
mod special;
mod vine;

pub use kendall::{kendall_tau, pseudo_uniform};
pub use pair::{PairCopula, STUDENT_T_DF};
pub use special::{bivariate_norm_cdf, incomplete_beta, lgamma, norm_cdf, norm_inv_cdf};
pub use vine::{RegularVine, VineEdge};
