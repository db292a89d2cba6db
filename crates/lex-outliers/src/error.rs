//! Error types for outlier detection and capping.
//!
//! Every fallible operation in the crate returns [`OutlierError`]. Errors are
//! never retried internally; a failing column fails as a whole and the caller
//! decides whether to skip it or abort.
//!
//! Errors serialize as `{ "code": ..., "message": ... }` so they can be
//! embedded in JSON reports.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for outlier handling.
#[derive(Error, Debug)]
pub enum OutlierError {
    /// Input violated a precondition (empty column, missing marker, NaN/Infinity).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Column was not found in the record set or data frame.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// Column exists but does not hold numeric data.
    #[error("Column '{column}' is not numeric (found {found})")]
    NonNumericColumn { column: String, found: String },

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error with added context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<OutlierError>,
    },
}

impl OutlierError {
    /// Shorthand for [`OutlierError::InvalidInput`].
    pub fn invalid_input(message: impl Into<String>) -> Self {
        OutlierError::InvalidInput(message.into())
    }

    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        OutlierError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Stable error code for report consumers.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::NonNumericColumn { .. } => "NON_NUMERIC_COLUMN",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Whether the error comes from the data itself rather than the environment.
    ///
    /// Callers processing many columns typically skip a column on these and
    /// abort on everything else.
    pub fn is_data_error(&self) -> bool {
        match self {
            Self::InvalidInput(_) | Self::ColumnNotFound(_) | Self::NonNumericColumn { .. } => {
                true
            }
            Self::WithContext { source, .. } => source.is_data_error(),
            _ => false,
        }
    }
}

impl Serialize for OutlierError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("OutlierError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for outlier operations.
pub type Result<T> = std::result::Result<T, OutlierError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| OutlierError::Polars(e).with_context(context))
    }
}
