//! Configuration types for outlier handling.
//!
//! This module provides configuration options using the builder pattern,
//! mirroring how the CLI and library callers set up a run.

use crate::statistics::QuantileMethod;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default Tukey fence multiplier.
pub const DEFAULT_IQR_MULTIPLIER: f64 = 1.5;

/// What to do with values outside the IQR fences.
///
/// Rows are never deleted: capping keeps the record count and aggregate sums
/// intact, at the cost of slightly underestimating variance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OutlierTreatment {
    /// Clamp outliers to the nearest fence (Q1 - k*IQR, Q3 + k*IQR)
    #[default]
    Cap,
    /// Only report outliers, leave values untouched
    Flag,
}

/// Configuration for outlier detection and capping.
///
/// Use [`OutlierConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use lex_outliers::config::{OutlierConfig, OutlierTreatment};
///
/// let config = OutlierConfig::builder()
///     .iqr_multiplier(3.0)
///     .treatment(OutlierTreatment::Flag)
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutlierConfig {
    /// Multiplier applied to the IQR when building fences.
    /// Default: 1.5
    pub iqr_multiplier: f64,

    /// Quantile definition used for Q1 and Q3.
    /// Default: Linear
    pub quantile_method: QuantileMethod,

    /// Treatment applied to detected outliers.
    /// Default: Cap
    pub treatment: OutlierTreatment,

    /// Columns to process. If None, every numeric column is processed.
    /// Default: None
    pub columns: Option<Vec<String>>,

    /// Output directory for capped data and reports.
    /// Default: "output"
    pub output_dir: PathBuf,

    /// Whether to write capped data and reports to disk.
    /// Default: true
    pub save_to_disk: bool,

    /// Skip columns that fail on their data (missing values, non-numeric,
    /// absent) instead of aborting the run.
    /// Default: false
    #[serde(default)]
    pub skip_invalid: bool,
}

impl Default for OutlierConfig {
    fn default() -> Self {
        Self {
            iqr_multiplier: DEFAULT_IQR_MULTIPLIER,
            quantile_method: QuantileMethod::default(),
            treatment: OutlierTreatment::default(),
            columns: None,
            output_dir: PathBuf::from("output"),
            save_to_disk: true,
            skip_invalid: false,
        }
    }
}

impl OutlierConfig {
    /// Create a new configuration builder.
    pub fn builder() -> OutlierConfigBuilder {
        OutlierConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !self.iqr_multiplier.is_finite() || self.iqr_multiplier < 0.0 {
            return Err(ConfigValidationError::InvalidMultiplier(
                self.iqr_multiplier,
            ));
        }

        if let Some(columns) = &self.columns
            && columns.is_empty()
        {
            return Err(ConfigValidationError::EmptyColumnSelection);
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid IQR multiplier: {0} (must be finite and non-negative)")]
    InvalidMultiplier(f64),

    #[error("Column selection is empty (omit it to process every numeric column)")]
    EmptyColumnSelection,
}

impl From<ConfigValidationError> for crate::error::OutlierError {
    fn from(err: ConfigValidationError) -> Self {
        crate::error::OutlierError::InvalidConfig(err.to_string())
    }
}

/// Builder for [`OutlierConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct OutlierConfigBuilder {
    iqr_multiplier: Option<f64>,
    quantile_method: Option<QuantileMethod>,
    treatment: Option<OutlierTreatment>,
    columns: Option<Vec<String>>,
    output_dir: Option<PathBuf>,
    save_to_disk: Option<bool>,
    skip_invalid: Option<bool>,
}

impl OutlierConfigBuilder {
    /// Set the fence multiplier (1.5 for "mild", 3.0 for "extreme" outliers).
    pub fn iqr_multiplier(mut self, multiplier: f64) -> Self {
        self.iqr_multiplier = Some(multiplier);
        self
    }

    /// Set the quantile definition used for the quartiles.
    pub fn quantile_method(mut self, method: QuantileMethod) -> Self {
        self.quantile_method = Some(method);
        self
    }

    /// Set the treatment for detected outliers.
    pub fn treatment(mut self, treatment: OutlierTreatment) -> Self {
        self.treatment = Some(treatment);
        self
    }

    /// Restrict processing to the given columns.
    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Set the output directory for capped data and reports.
    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(path.into());
        self
    }

    /// Enable or disable writing results to disk.
    pub fn save_to_disk(mut self, save: bool) -> Self {
        self.save_to_disk = Some(save);
        self
    }

    /// Skip columns with invalid data instead of failing the run.
    pub fn skip_invalid(mut self, skip: bool) -> Self {
        self.skip_invalid = Some(skip);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `OutlierConfig` or an error if validation fails.
    pub fn build(self) -> Result<OutlierConfig, ConfigValidationError> {
        let config = OutlierConfig {
            iqr_multiplier: self.iqr_multiplier.unwrap_or(DEFAULT_IQR_MULTIPLIER),
            quantile_method: self.quantile_method.unwrap_or_default(),
            treatment: self.treatment.unwrap_or_default(),
            columns: self.columns,
            output_dir: self.output_dir.unwrap_or_else(|| PathBuf::from("output")),
            save_to_disk: self.save_to_disk.unwrap_or(true),
            skip_invalid: self.skip_invalid.unwrap_or(false),
        };

        config.validate()?;
        Ok(config)
    }
}
