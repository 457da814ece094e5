//! Statistical helpers: empirical quantiles and the standard normal quantile.

mod normal;
mod quantile;

pub use normal::normal_quantile;
pub use quantile::{empirical_quantile, empirical_quantile_sorted};
