//! Step-event detection and static gain extraction.

use serde::{Deserialize, Serialize};
use tk_core::{STEP_EPSILON, median};
use tracing::{debug, warn};

use crate::error::{DataError, DataResult};

/// Tunables for step detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StepDetectConfig {
    /// Samples on each side of the step used for the level medians.
    pub narrow_window: usize,
    /// Window tried once when the narrow one sees no step.
    pub wide_window: usize,
    /// Smallest step magnitude accepted for input and output.
    pub epsilon: f64,
}

impl Default for StepDetectConfig {
    fn default() -> Self {
        Self {
            narrow_window: 25,
            wide_window: 50,
            epsilon: STEP_EPSILON,
        }
    }
}

/// Levels and magnitudes derived from the step event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepInfo {
    /// Index of the first post-step sample.
    pub step_index: usize,
    /// Time of the first post-step sample.
    pub step_time: f64,
    /// Median window that produced a valid input step.
    pub window: usize,
    /// Pre-step input level.
    pub u0: f64,
    /// Input step magnitude.
    pub du: f64,
    /// Pre-step output level.
    pub y0: f64,
    /// Output step magnitude (normalization denominator).
    pub dy: f64,
    /// Static gain `dy / du`.
    pub k: f64,
}

impl StepInfo {
    /// Final output level `y0 + dy`.
    pub fn y_final(&self) -> f64 {
        self.y0 + self.dy
    }
}

/// Index of the first sample after the largest absolute input jump.
///
/// Ties go to the earliest jump. Requires at least two samples.
pub fn step_index(u: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, w) in u.windows(2).enumerate() {
        let jump = (w[1] - w[0]).abs();
        if best.is_none_or(|(_, b)| jump > b) {
            best = Some((i, jump));
        }
    }
    best.map(|(i, _)| i + 1)
}

/// Pre-step and post-step medians over `window` samples each side of `step`.
fn levels(values: &[f64], step: usize, window: usize) -> (f64, f64) {
    let pre = &values[step.saturating_sub(window)..step];
    let post = &values[step..(step + window).min(values.len())];
    (median(pre), median(post))
}

/// Detect the input step in `(t, u, y)` and derive levels and static gain.
///
/// # Errors
///
/// Returns [`DataError::InvalidStep`] when neither window finds an input step
/// larger than `epsilon`, or when the output does not move by more than `epsilon`.
pub fn detect_step(t: &[f64], u: &[f64], y: &[f64], cfg: &StepDetectConfig) -> DataResult<StepInfo> {
    let n = t.len().min(u.len()).min(y.len());
    let s = step_index(&u[..n]).ok_or(DataError::InsufficientData {
        count: n,
        required: 2,
    })?;

    let mut window = cfg.narrow_window.max(1);
    let (mut u0, mut u1) = levels(&u[..n], s, window);
    let mut du = u1 - u0;
    if !(du.abs() >= cfg.epsilon) {
        debug!(du, window, "input step below epsilon, widening window");
        window = cfg.wide_window.max(1);
        (u0, u1) = levels(&u[..n], s, window);
        du = u1 - u0;
    }
    if !(du.abs() >= cfg.epsilon) {
        warn!(du, "no valid input step");
        return Err(DataError::InvalidStep {
            what: "input step magnitude below epsilon",
            magnitude: du,
        });
    }

    let (y0, _) = levels(&y[..n], s, window);
    let trail_start = n.saturating_sub(2 * window).max(s);
    let y1 = median(&y[trail_start..n]);
    let dy = y1 - y0;
    if !(dy.abs() >= cfg.epsilon) {
        warn!(dy, "output does not respond to the step");
        return Err(DataError::InvalidStep {
            what: "output step magnitude below epsilon",
            magnitude: dy,
        });
    }

    let info = StepInfo {
        step_index: s,
        step_time: t[s],
        window,
        u0,
        du,
        y0,
        dy,
        k: dy / du,
    };
    debug!(?info, "step detected");
    Ok(info)
}
