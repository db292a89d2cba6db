//! Column-level outlier handling over record sets and polars data frames.

use super::detector::{cap_column, compute_bounds_with};
use crate::config::{OutlierConfig, OutlierTreatment};
use crate::error::{OutlierError, Result, ResultExt};
use crate::types::{Bounds, OutlierSummary, Record, Value, column_values};
use crate::utils::{is_numeric_dtype, numeric_column_names};
use polars::prelude::*;
use tracing::{debug, info, warn};

/// Detects and treats outliers one column at a time.
pub struct OutlierHandler;

impl OutlierHandler {
    /// Bounds, outlier positions and (optionally) capped values for a column.
    fn process_values(
        column: &str,
        values: &[f64],
        config: &OutlierConfig,
    ) -> Result<(OutlierSummary, Option<Vec<f64>>)> {
        let bounds = compute_bounds_with(values, config)
            .context(format!("Computing bounds for column '{}'", column))?;

        let mut low_count = 0;
        let mut high_count = 0;
        let mut outlier_rows = Vec::new();
        for (idx, &v) in values.iter().enumerate() {
            if bounds.is_low(v) {
                low_count += 1;
                outlier_rows.push(idx);
            } else if bounds.is_high(v) {
                high_count += 1;
                outlier_rows.push(idx);
            }
        }

        let capped = match config.treatment {
            OutlierTreatment::Cap => Some(cap_column(values, &bounds)?),
            OutlierTreatment::Flag => None,
        };

        debug!(
            "Column '{}': bounds {} (q1={}, q3={}), {} low / {} high outliers",
            column, bounds, bounds.q1, bounds.q3, low_count, high_count
        );

        let summary = OutlierSummary {
            column: column.to_string(),
            bounds,
            total: values.len(),
            low_count,
            high_count,
            outlier_rows,
            capped: capped.is_some(),
        };

        Ok((summary, capped))
    }

    /// Handle one column of an in-memory record set.
    ///
    /// Either every record is updated or none is.
    pub fn handle_records(
        records: &mut [Record],
        column: &str,
        config: &OutlierConfig,
    ) -> Result<OutlierSummary> {
        let values = column_values(records, column)?;
        let (summary, capped) = Self::process_values(column, &values, config)?;

        if let Some(capped) = capped {
            for (record, value) in records.iter_mut().zip(capped) {
                record.set(column, Value::Numeric(value));
            }
        }

        Ok(summary)
    }

    /// Read a numeric column of `df` as finite `f64` values.
    pub fn column_f64(df: &DataFrame, column: &str) -> Result<Vec<f64>> {
        let col = df
            .column(column)
            .map_err(|_| OutlierError::ColumnNotFound(column.to_string()))?;

        if !is_numeric_dtype(col.dtype()) {
            return Err(OutlierError::NonNumericColumn {
                column: column.to_string(),
                found: col.dtype().to_string(),
            });
        }

        if col.null_count() > 0 {
            return Err(OutlierError::invalid_input(format!(
                "column '{}' has {} missing values; resolve missing values first",
                column,
                col.null_count()
            )));
        }

        let series = col.as_materialized_series().cast(&DataType::Float64)?;
        let values: Vec<f64> = series.f64()?.into_iter().flatten().collect();

        if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
            return Err(OutlierError::invalid_input(format!(
                "column '{}' holds non-finite value {}",
                column, bad
            )));
        }

        Ok(values)
    }

    /// Handle one numeric column of a data frame.
    ///
    /// With [`OutlierTreatment::Cap`] the column is replaced by its capped
    /// `Float64` version; row count never changes.
    pub fn handle_column(
        df: &mut DataFrame,
        column: &str,
        config: &OutlierConfig,
    ) -> Result<OutlierSummary> {
        let values = Self::column_f64(df, column)?;
        let (summary, capped) = Self::process_values(column, &values, config)?;

        if let Some(capped) = capped {
            let series = Series::new(column.into(), capped);
            df.replace(column, series)
                .context(format!("Replacing column '{}'", column))?;
        }

        Ok(summary)
    }

    /// Columns a run over `df` targets: the configured selection, or every
    /// numeric column in frame order.
    pub fn target_columns(df: &DataFrame, config: &OutlierConfig) -> Vec<String> {
        match &config.columns {
            Some(columns) => columns.clone(),
            None => numeric_column_names(df),
        }
    }

    /// Handle every selected numeric column of a data frame.
    ///
    /// Without an explicit selection, non-numeric columns are skipped. A
    /// selected column that is absent or non-numeric is an error. By default
    /// the first failing column aborts the call and columns already handled
    /// stay capped; with `skip_invalid`, columns failing on their data are
    /// logged and left unchanged.
    pub fn handle_numeric_columns(
        df: &mut DataFrame,
        config: &OutlierConfig,
    ) -> Result<Vec<OutlierSummary>> {
        let targets = Self::target_columns(df, config);

        let mut summaries = Vec::with_capacity(targets.len());
        for column in &targets {
            match Self::handle_column(df, column, config) {
                Ok(summary) => summaries.push(summary),
                Err(e) if config.skip_invalid && e.is_data_error() => {
                    warn!("Skipping column '{}': {}", column, e);
                }
                Err(e) => return Err(e),
            }
        }

        let total: usize = summaries.iter().map(|s| s.outlier_count()).sum();
        info!(
            "Processed {} of {} columns, {} outliers {}",
            summaries.len(),
            targets.len(),
            total,
            match config.treatment {
                OutlierTreatment::Cap => "capped",
                OutlierTreatment::Flag => "flagged",
            }
        );

        Ok(summaries)
    }

    /// Boolean mask marking rows of `column` outside `bounds`.
    pub fn outlier_mask(df: &DataFrame, column: &str, bounds: &Bounds) -> Result<BooleanChunked> {
        let values = Self::column_f64(df, column)?;
        let mask_values: Vec<bool> = values.iter().map(|&v| !bounds.contains(v)).collect();
        Ok(BooleanChunked::from_slice("outlier".into(), &mask_values))
    }
}
