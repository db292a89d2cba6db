//! Statistics module.
//!
//! Order-statistic helpers shared by the outlier detector.

mod quantile;

pub use quantile::{QuantileMethod, quantile, quartiles};
