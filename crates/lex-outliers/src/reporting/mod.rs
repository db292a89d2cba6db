//! Report generation module.
//!
//! Turns per-column [`OutlierSummary`](crate::types::OutlierSummary) values
//! into a report that can be:
//! - printed as human-readable text (default CLI output)
//! - printed as JSON (`--json` CLI flag)
//! - written to a JSON file (`--emit-report` CLI flag)
//!
//! # Example
//!
//! ```rust,ignore
//! use lex_outliers::reporting::{ReportGenerator, ReportParams};
//!
//! let report = ReportGenerator::build_report(ReportParams {
//!     input_file: Some("data/sales.csv"),
//!     output_file: None,
//!     config: &config,
//!     rows: df.height(),
//!     summaries: &summaries,
//! });
//!
//! println!("{}", ReportGenerator::render_text(&report));
//! ```

mod generator;

pub use generator::{OutlierReport, ReportGenerator, ReportParams};
