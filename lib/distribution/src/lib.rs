//! Poisson distribution library
//!
//! Computes exact Poisson tables and point probabilities, the matching normal
//! approximation with continuity correction, and sweeps over the rate
//! parameter.
//!
//! # Module Structure
//!
//! - `dist`: Statistical distributions (incomplete Gamma, error function, Normal, Poisson)
//! - `engine`: PMF / CDF / CCDF tables over a window and point queries
//! - `approx`: Normal approximation, overlay curves and point estimates
//! - `sweep`: Rate sweeps producing one table per frame
//! - `params`: Validated input parameters
//! - `error`: Error type shared by all of the above

pub mod approx;
pub mod dist;
pub mod engine;
pub mod error;
pub mod params;
pub mod sweep;

// Re-export commonly used types and functions for external use
pub use crate::approx::{NormalCurve, NormalParameters, PointEstimate, estimate, estimate_at};
pub use crate::engine::{
    DistributionTable, PointProbabilities, TableRow, compute_table, point_probabilities,
};
pub use crate::error::{DistError, Result};
pub use crate::params::DistributionParameters;
pub use crate::sweep::{RateSweep, SweepFrame, linspace};
