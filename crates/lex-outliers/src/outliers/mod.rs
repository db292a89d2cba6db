//! Outlier module.
//!
//! IQR-based detection and capping. Outliers are clamped to the nearest
//! fence, never deleted.

mod detector;
mod handler;

pub use detector::{
    cap, cap_column, compute_bounds, compute_bounds_with, detect_outliers, fence_bounds,
};
pub use handler::OutlierHandler;
