use crate::error::{OutlierError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A single cell of a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Numeric(f64),
    Categorical(String),
    /// Explicit missing marker; must be resolved before outlier handling.
    Missing,
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Numeric(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Categorical(v.to_string())
    }
}

impl From<Option<f64>> for Value {
    fn from(v: Option<f64>) -> Self {
        v.map_or(Value::Missing, Value::Numeric)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Numeric(v) => write!(f, "{}", v),
            Value::Categorical(s) => write!(f, "{}", s),
            Value::Missing => write!(f, "<missing>"),
        }
    }
}

/// One row: column name to cell value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub fields: HashMap<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, handy for literals and tests.
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(column.into(), value.into());
        self
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.fields.get(column)
    }

    pub fn set(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(column.into(), value.into());
    }

    /// The finite numeric value of `column`.
    ///
    /// Missing, categorical and non-finite cells are `InvalidInput`; an
    /// absent column is `ColumnNotFound`.
    pub fn numeric(&self, column: &str) -> Result<f64> {
        match self.fields.get(column) {
            None => Err(OutlierError::ColumnNotFound(column.to_string())),
            Some(Value::Numeric(v)) if v.is_finite() => Ok(*v),
            Some(Value::Numeric(v)) => Err(OutlierError::invalid_input(format!(
                "column '{}' holds non-finite value {}",
                column, v
            ))),
            Some(Value::Missing) => Err(OutlierError::invalid_input(format!(
                "column '{}' holds a missing value; resolve missing values first",
                column
            ))),
            Some(Value::Categorical(s)) => Err(OutlierError::invalid_input(format!(
                "column '{}' holds categorical value '{}'",
                column, s
            ))),
        }
    }
}

/// Extract one numeric column from an ordered record collection.
///
/// All-or-nothing: the first bad cell fails the whole column.
pub fn column_values(records: &[Record], column: &str) -> Result<Vec<f64>> {
    records.iter().map(|r| r.numeric(column)).collect()
}

/// Tukey fences derived from a column's quartiles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub lower: f64,
    pub upper: f64,
    pub q1: f64,
    pub q3: f64,
    pub iqr: f64,
}

impl Bounds {
    /// Whether `value` lies inside `[lower, upper]`.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }

    pub fn is_low(&self, value: f64) -> bool {
        value < self.lower
    }

    pub fn is_high(&self, value: f64) -> bool {
        value > self.upper
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:.4}, {:.4}]", self.lower, self.upper)
    }
}

// ============================================================================
// Handler Output Types
// ============================================================================

/// Result of outlier handling for one column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutlierSummary {
    pub column: String,
    pub bounds: Bounds,
    /// Number of values examined.
    pub total: usize,
    /// Values strictly below the lower fence.
    pub low_count: usize,
    /// Values strictly above the upper fence.
    pub high_count: usize,
    /// Positions (in input order) of the outlying rows.
    pub outlier_rows: Vec<usize>,
    /// Whether outlying values were replaced by the nearest fence.
    pub capped: bool,
}

impl OutlierSummary {
    pub fn outlier_count(&self) -> usize {
        self.low_count + self.high_count
    }

    /// Fraction of rows flagged, 0.0 for an empty column.
    pub fn outlier_ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.outlier_count() as f64 / self.total as f64
        }
    }
}
