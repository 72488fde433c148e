//! Step-response performance metrics.

use serde::{Deserialize, Serialize};

/// Standard set-point response metrics. `None` marks a metric that is
/// undefined for the given response.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct PerformanceMetrics {
    /// 10% to 90% rise time (s).
    pub tr: Option<f64>,
    /// Time after which the response stays inside the settling band (s).
    pub ts: Option<f64>,
    /// Peak overshoot in percent of the final value.
    pub mp: Option<f64>,
    /// Absolute error between the final value and the last sample.
    pub ess: Option<f64>,
}

impl PerformanceMetrics {
    /// Compute metrics for `y(t)` approaching `y_final`.
    ///
    /// Rise time and overshoot follow the sign of `y_final`: a negative step
    /// rises through `0.1 y_final` and `0.9 y_final` from above and overshoots
    /// below its final value. Rise time is undefined for `y_final == 0`.
    ///
    /// `band` is the settling band as a fraction of `|y_final|`. Settling time
    /// is the sample following the last one outside the band: `t[0]` if the
    /// response never leaves it, `None` if the final sample is still outside.
    pub fn from_response(t: &[f64], y: &[f64], y_final: f64, band: f64) -> Self {
        let n = t.len().min(y.len());
        let (t, y) = (&t[..n], &y[..n]);
        if n == 0 || !y.iter().any(|v| v.is_finite()) {
            return Self::default();
        }

        let ess = (y_final - y[n - 1]).abs();

        // Levels are crossed in the direction of the step, so falling
        // responses are scanned below their targets.
        let dir = if y_final < 0.0 { -1.0 } else { 1.0 };
        let first_reaching = |frac: f64| y.iter().position(|&v| dir * v >= frac * y_final.abs()).map(|i| t[i]);
        let tr = match (first_reaching(0.1), first_reaching(0.9)) {
            (Some(t10), Some(t90)) if y_final != 0.0 => Some(t90 - t10),
            _ => None,
        };

        let peak = y.iter().filter(|v| v.is_finite()).map(|v| dir * v).fold(f64::NEG_INFINITY, f64::max);
        let mp = if y_final != 0.0 && peak > y_final.abs() {
            (peak - y_final.abs()) / y_final.abs() * 100.0
        } else {
            0.0
        };

        let tol = band * y_final.abs();
        // NaN samples compare false and count as outside.
        let inside = |v: f64| (v - y_final).abs() <= tol;
        let ts = match y.iter().rposition(|&v| !inside(v)) {
            None => Some(t[0]),
            Some(last) if last + 1 < n => Some(t[last + 1]),
            Some(_) => None,
        };

        Self {
            tr,
            ts,
            mp: Some(mp),
            ess: Some(ess),
        }
    }
}
