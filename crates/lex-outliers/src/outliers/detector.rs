//! IQR fence computation, outlier detection and capping primitives.
//!
//! Quartiles use [`QuantileMethod::Linear`] unless configured otherwise:
//! the `p`-quantile sits at position `(n - 1) * p` of the sorted column and
//! fractional positions interpolate between neighbouring order statistics.

use crate::config::{DEFAULT_IQR_MULTIPLIER, OutlierConfig};
use crate::error::{OutlierError, Result};
use crate::statistics::{QuantileMethod, quartiles};
use crate::types::{Bounds, Record};

/// Fences `[Q1 - 1.5*IQR, Q3 + 1.5*IQR]` using linear interpolation.
///
/// Fails with `InvalidInput` when `column` is empty or holds NaN/Infinity.
pub fn compute_bounds(column: &[f64]) -> Result<Bounds> {
    fence_bounds(column, DEFAULT_IQR_MULTIPLIER, QuantileMethod::Linear)
}

/// Fences using the multiplier and quantile method from `config`.
pub fn compute_bounds_with(column: &[f64], config: &OutlierConfig) -> Result<Bounds> {
    fence_bounds(column, config.iqr_multiplier, config.quantile_method)
}

/// Fences `[Q1 - k*IQR, Q3 + k*IQR]`.
///
/// Fences and IQR are clamped to `[f64::MIN, f64::MAX]`, so bounds of a
/// finite column are always finite and usable by [`cap`].
pub fn fence_bounds(column: &[f64], multiplier: f64, method: QuantileMethod) -> Result<Bounds> {
    if !multiplier.is_finite() || multiplier < 0.0 {
        return Err(OutlierError::InvalidConfig(format!(
            "IQR multiplier must be finite and non-negative, got {}",
            multiplier
        )));
    }

    let (q1, q3) = quartiles(column, method)?;

    // Finite inputs can still overflow here; fences saturate at the f64 range.
    let iqr = (q3 - q1).min(f64::MAX);
    let spread = multiplier * iqr;

    Ok(Bounds {
        lower: (q1 - spread).max(f64::MIN),
        upper: (q3 + spread).min(f64::MAX),
        q1,
        q3,
        iqr,
    })
}

fn check_bounds(lower: f64, upper: f64) -> Result<()> {
    if !lower.is_finite() || !upper.is_finite() {
        return Err(OutlierError::invalid_input(format!(
            "bounds must be finite, got [{}, {}]",
            lower, upper
        )));
    }
    if lower > upper {
        return Err(OutlierError::invalid_input(format!(
            "lower bound {} exceeds upper bound {}",
            lower, upper
        )));
    }
    Ok(())
}

/// Records whose `column_name` value is strictly outside `[lower, upper]`.
///
/// Output keeps input order. Nothing is mutated. A record without the
/// column, or with a missing/categorical/non-finite cell, fails the whole
/// call.
pub fn detect_outliers<'a>(
    records: &'a [Record],
    column_name: &str,
    lower: f64,
    upper: f64,
) -> Result<Vec<&'a Record>> {
    check_bounds(lower, upper)?;

    let mut outliers = Vec::new();
    for record in records {
        let value = record.numeric(column_name)?;
        if value < lower || value > upper {
            outliers.push(record);
        }
    }
    Ok(outliers)
}

/// Clamp `value` to `[lower, upper]`.
///
/// NaN/Infinity in any argument, or `lower > upper`, is `InvalidInput`.
pub fn cap(value: f64, lower: f64, upper: f64) -> Result<f64> {
    check_bounds(lower, upper)?;
    if !value.is_finite() {
        return Err(OutlierError::invalid_input(format!(
            "cannot cap non-finite value {}",
            value
        )));
    }

    Ok(if value < lower {
        lower
    } else if value > upper {
        upper
    } else {
        value
    })
}

/// Cap every value of a column. All-or-nothing.
pub fn cap_column(column: &[f64], bounds: &Bounds) -> Result<Vec<f64>> {
    column
        .iter()
        .map(|&v| cap(v, bounds.lower, bounds.upper))
        .collect()
}
