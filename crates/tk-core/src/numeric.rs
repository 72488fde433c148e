/// Floating point type used throughout the workspace.
pub type Real = f64;

/// Magnitude below which a step (input or output) counts as absent.
pub const STEP_EPSILON: Real = 1e-9;

/// True when every value in the slice is finite.
pub fn all_finite(values: &[Real]) -> bool {
    values.iter().all(|v| v.is_finite())
}

/// True when each value is strictly greater than the one before it.
///
/// NaN breaks the ordering and makes the result false.
pub fn strictly_increasing(values: &[Real]) -> bool {
    values.windows(2).all(|w| w[1] > w[0])
}
