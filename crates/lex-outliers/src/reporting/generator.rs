use crate::config::{OutlierConfig, OutlierTreatment};
use crate::error::Result;
use crate::types::OutlierSummary;
use chrono::Local;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

// ============================================================================
// Report Types
// ============================================================================

/// Outlier report for CLI and library output.
///
/// Use this for both JSON output (`--json`) and file writing (`--emit-report`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutlierReport {
    /// Timestamp when the report was generated
    pub generated_at: String,
    /// Path to the input file, if the data came from one
    pub input_file: Option<String>,
    /// Path to the capped data file (if written)
    pub output_file: Option<String>,
    /// Configuration the run used
    pub config: OutlierConfig,
    /// Number of rows in the processed table
    pub rows: usize,
    /// Per-column results, in processing order
    pub columns: Vec<OutlierSummary>,
    /// Outliers across all columns
    pub total_outliers: usize,
    /// Targeted columns left untouched because their data was invalid
    #[serde(default)]
    pub skipped_columns: Vec<String>,
}

/// Parameters for building an [`OutlierReport`].
pub struct ReportParams<'a> {
    pub input_file: Option<&'a str>,
    pub output_file: Option<&'a str>,
    pub config: &'a OutlierConfig,
    pub rows: usize,
    pub summaries: &'a [OutlierSummary],
    pub skipped_columns: &'a [String],
}

/// Builds, renders and writes outlier reports.
pub struct ReportGenerator {
    output_dir: PathBuf,
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new(PathBuf::from("output"))
    }
}

impl ReportGenerator {
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }

    pub fn build_report(params: ReportParams<'_>) -> OutlierReport {
        OutlierReport {
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            input_file: params.input_file.map(str::to_string),
            output_file: params.output_file.map(str::to_string),
            config: params.config.clone(),
            rows: params.rows,
            columns: params.summaries.to_vec(),
            total_outliers: params.summaries.iter().map(|s| s.outlier_count()).sum(),
            skipped_columns: params.skipped_columns.to_vec(),
        }
    }

    /// Human-readable summary: outlier count and fences per column.
    pub fn render_text(report: &OutlierReport) -> String {
        let verb = match report.config.treatment {
            OutlierTreatment::Cap => "capped",
            OutlierTreatment::Flag => "flagged",
        };

        let mut lines = vec![
            "=".repeat(80),
            "OUTLIER REPORT".to_string(),
            "=".repeat(80),
            format!(
                "Rows: {}   Columns: {}   Fence multiplier: {}   Quantiles: {:?}",
                report.rows,
                report.columns.len(),
                report.config.iqr_multiplier,
                report.config.quantile_method
            ),
            String::new(),
            format!(
                "{:<24} {:>12} {:>12} {:>12} {:>9} {:>8}",
                "Column", "Q1", "Q3", "IQR", "Outliers", "Share"
            ),
            "-".repeat(80),
        ];

        for summary in &report.columns {
            lines.push(format!(
                "{:<24} {:>12.4} {:>12.4} {:>12.4} {:>9} {:>7.1}%",
                truncate_str(&summary.column, 23),
                summary.bounds.q1,
                summary.bounds.q3,
                summary.bounds.iqr,
                summary.outlier_count(),
                summary.outlier_ratio() * 100.0
            ));
        }

        lines.push(String::new());
        for summary in &report.columns {
            if summary.outlier_count() == 0 {
                lines.push(format!(
                    "  {}: no values outside {}",
                    summary.column, summary.bounds
                ));
            } else {
                lines.push(format!(
                    "  {}: {} {} values ({} below, {} above) to {}",
                    summary.column,
                    verb,
                    summary.outlier_count(),
                    summary.low_count,
                    summary.high_count,
                    summary.bounds
                ));
            }
        }

        if !report.skipped_columns.is_empty() {
            lines.push(format!(
                "  Skipped (invalid data): {}",
                report.skipped_columns.join(", ")
            ));
        }

        lines.push(String::new());
        lines.push(format!(
            "Total outliers {}: {}",
            verb, report.total_outliers
        ));
        if let Some(output) = &report.output_file {
            lines.push(format!("Capped data: {}", output));
        }

        lines.join("\n")
    }

    /// Write the report as pretty JSON to `<base>_outliers.json`.
    pub fn write_report_to_file(
        &self,
        report: &OutlierReport,
        report_base_name: &str,
    ) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;

        let report_path = self
            .output_dir
            .join(format!("{}_outliers.json", report_base_name));
        let mut file = File::create(&report_path)?;
        file.write_all(serde_json::to_string_pretty(report)?.as_bytes())?;

        info!("Report saved: {}", report_path.display());

        Ok(report_path)
    }

    /// Write the processed frame to `<base>_capped.csv`.
    pub fn write_capped_csv(&self, df: &mut DataFrame, base_name: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;

        let output_path = self.output_dir.join(format!("{}_capped.csv", base_name));
        let mut file = File::create(&output_path)?;

        CsvWriter::new(&mut file)
            .include_header(true)
            .with_separator(b',')
            .finish(df)?;

        info!("Dataset saved: {}", output_path.display());

        Ok(output_path)
    }
}

fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
