//! Quantile estimation over finite samples.

use crate::error::{OutlierError, Result};
use serde::{Deserialize, Serialize};

/// How a quantile is picked between two order statistics.
///
/// All methods place the `p`-quantile at position `h = (n - 1) * p` of the
/// sorted sample and differ only in how a fractional `h` is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QuantileMethod {
    /// Interpolate linearly between `x[floor(h)]` and `x[ceil(h)]`
    #[default]
    Linear,
    /// Take `x[floor(h)]`
    Lower,
    /// Take `x[ceil(h)]`
    Higher,
    /// Take the order statistic nearest to `h`, ties to the even index
    Nearest,
    /// Average of `x[floor(h)]` and `x[ceil(h)]`
    Midpoint,
}

/// Copy and sort a sample, rejecting empty input and non-finite values.
fn sorted_finite(values: &[f64]) -> Result<Vec<f64>> {
    if values.is_empty() {
        return Err(OutlierError::invalid_input(
            "cannot compute quantiles of an empty sequence",
        ));
    }

    if let Some((idx, value)) = values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(OutlierError::invalid_input(format!(
            "non-finite value {} at position {}",
            value, idx
        )));
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    Ok(sorted)
}

/// Quantile of an already sorted, non-empty, finite sample.
///
/// `p` must lie in `[0, 1]`; callers go through [`quantile`] or
/// [`quartiles`] which check this.
fn quantile_sorted(sorted: &[f64], p: f64, method: QuantileMethod) -> f64 {
    debug_assert!(!sorted.is_empty());
    let last = sorted.len() - 1;
    let h = last as f64 * p;
    let lo = (h.floor() as usize).min(last);
    let hi = (h.ceil() as usize).min(last);

    if sorted[lo] == sorted[hi] {
        return sorted[lo];
    }

    // Weighted sums stay finite for finite inputs; differences may not.
    match method {
        QuantileMethod::Linear => {
            let frac = h - lo as f64;
            (1.0 - frac) * sorted[lo] + frac * sorted[hi]
        }
        QuantileMethod::Lower => sorted[lo],
        QuantileMethod::Higher => sorted[hi],
        QuantileMethod::Nearest => sorted[(h.round_ties_even() as usize).min(last)],
        QuantileMethod::Midpoint => sorted[lo] / 2.0 + sorted[hi] / 2.0,
    }
}

fn check_probability(p: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&p) {
        return Err(OutlierError::invalid_input(format!(
            "quantile probability {} is outside [0, 1]",
            p
        )));
    }
    Ok(())
}

/// The `p`-quantile of `values` using `method`.
///
/// Input order does not matter. Fails with `InvalidInput` on an empty
/// sample, a NaN/Infinity entry, or `p` outside `[0, 1]`.
pub fn quantile(values: &[f64], p: f64, method: QuantileMethod) -> Result<f64> {
    check_probability(p)?;
    let sorted = sorted_finite(values)?;
    Ok(quantile_sorted(&sorted, p, method))
}

/// First and third quartiles `(q1, q3)`, sorting the sample once.
pub fn quartiles(values: &[f64], method: QuantileMethod) -> Result<(f64, f64)> {
    let sorted = sorted_finite(values)?;
    Ok((
        quantile_sorted(&sorted, 0.25, method),
        quantile_sorted(&sorted, 0.75, method),
    ))
}
