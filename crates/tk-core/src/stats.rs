//! Small statistics over sampled series.

use crate::error::{TkError, TkResult};
use crate::numeric::Real;

/// Median of a slice, averaging the two middle values for even lengths.
///
/// Returns NaN for an empty slice so that callers see the hole instead of a
/// silently invented level.
pub fn median(values: &[Real]) -> Real {
    if values.is_empty() {
        return Real::NAN;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        0.5 * (sorted[mid - 1] + sorted[mid])
    } else {
        sorted[mid]
    }
}

/// Root-mean-square error between two equally long series.
///
/// Any non-finite prediction scores as `+inf`, so a broken candidate can never
/// win a comparison.
pub fn rmse(y_true: &[Real], y_hat: &[Real]) -> TkResult<Real> {
    if y_true.len() != y_hat.len() {
        return Err(TkError::LengthMismatch {
            what: "rmse inputs",
            expected: y_true.len(),
            got: y_hat.len(),
        });
    }
    if y_true.is_empty() {
        return Err(TkError::InvalidArg {
            what: "rmse needs at least one sample",
        });
    }
    if y_hat.iter().any(|v| !v.is_finite()) {
        return Ok(Real::INFINITY);
    }
    let sum_sq: Real = y_true
        .iter()
        .zip(y_hat)
        .map(|(a, b)| (a - b) * (a - b))
        .sum();
    Ok((sum_sq / y_true.len() as Real).sqrt())
}

/// Index of the first sample with `values[i] >= threshold`.
pub fn first_at_or_above(values: &[Real], threshold: Real) -> Option<usize> {
    values.iter().position(|&v| v >= threshold)
}
