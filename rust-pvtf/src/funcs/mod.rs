pub mod common;
pub mod normal_curve;
pub mod poisson_point;
pub mod poisson_sweep;
pub mod poisson_table;

pub use normal_curve::*;
pub use poisson_point::*;
pub use poisson_sweep::*;
pub use poisson_table::*;
