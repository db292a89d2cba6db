//! IQR Outlier Detection and Capping Library
//!
//! Finds values outside the Tukey fences of a numeric column and clamps them
//! to the nearest fence.
//!
//! # Overview
//!
//! - **Bounds**: `Q1 - 1.5*IQR` and `Q3 + 1.5*IQR`, with quartiles computed by
//!   linear interpolation between order statistics (position `(n - 1) * p`)
//! - **Detection**: records strictly outside the bounds, in input order
//! - **Capping**: out-of-bound values replaced by the nearest bound; row count
//!   is preserved, rows are never deleted
//! - **Data frames**: the same operations over polars columns
//! - **Reporting**: text and JSON reports of counts and bounds per column
//!
//! Missing values must be resolved before a column reaches this crate; a
//! missing marker, NaN or Infinity is rejected with
//! [`OutlierError::InvalidInput`].
//!
//! # Quick Start
//!
//! ```rust
//! use lex_outliers::{cap, compute_bounds, detect_outliers, Record};
//!
//! let column = [1.0, 2.0, 3.0, 4.0, 5.0, 100.0];
//! let bounds = compute_bounds(&column).unwrap();
//! assert_eq!((bounds.lower, bounds.upper), (-1.5, 8.5));
//!
//! let records: Vec<Record> = column
//!     .iter()
//!     .map(|&v| Record::new().with("sales", v))
//!     .collect();
//! let outliers = detect_outliers(&records, "sales", bounds.lower, bounds.upper).unwrap();
//! assert_eq!(outliers.len(), 1);
//!
//! assert_eq!(cap(100.0, bounds.lower, bounds.upper).unwrap(), 8.5);
//! ```
//!
//! # Data Frames
//!
//! ```rust,ignore
//! use lex_outliers::{OutlierConfig, OutlierHandler};
//!
//! let config = OutlierConfig::builder().iqr_multiplier(3.0).build()?;
//! let summaries = OutlierHandler::handle_numeric_columns(&mut df, &config)?;
//! for s in &summaries {
//!     println!("{}: {} outliers outside {}", s.column, s.outlier_count(), s.bounds);
//! }
//! ```

pub mod config;
pub mod error;
pub mod outliers;
pub mod reporting;
pub mod statistics;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use config::{ConfigValidationError, OutlierConfig, OutlierConfigBuilder, OutlierTreatment};
pub use error::{OutlierError, Result as OutlierResult, ResultExt};
pub use outliers::{
    OutlierHandler, cap, cap_column, compute_bounds, compute_bounds_with, detect_outliers,
    fence_bounds,
};
pub use reporting::{OutlierReport, ReportGenerator, ReportParams};
pub use statistics::{QuantileMethod, quantile, quartiles};
pub use types::{Bounds, OutlierSummary, Record, Value, column_values};
