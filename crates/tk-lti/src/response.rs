//! Unit-step responses sampled on caller supplied time grids.

use nalgebra::{DMatrix, DVector};
use tk_core::{all_finite, strictly_increasing};
use tracing::debug;

use crate::error::{LtiError, LtiResult};
use crate::pade::pade;
use crate::state_space::StateSpace;
use crate::transfer_function::TransferFunction;

/// Relative tolerance for reusing the previous discretization.
const DT_REUSE_REL_TOL: f64 = 1e-9;

/// Unit-step response of `tf` sampled exactly at `t`.
///
/// The step is applied at `t = 0` of the supplied axis with zero initial state.
/// Samples before zero read zero; the output has the same length as `t`.
/// Non-uniform grids are handled by exact zero-order-hold propagation between
/// consecutive samples.
///
/// # Errors
///
/// Returns [`LtiError::InvalidTimeGrid`] when `t` contains non-finite values or
/// is not strictly increasing, and [`LtiError::Improper`] for improper systems.
pub fn step_response(tf: &TransferFunction, t: &[f64]) -> LtiResult<Vec<f64>> {
    if !all_finite(t) {
        return Err(LtiError::InvalidTimeGrid {
            what: "time values must be finite",
        });
    }
    if !strictly_increasing(t) {
        return Err(LtiError::InvalidTimeGrid {
            what: "time values must be strictly increasing",
        });
    }
    if tf.is_zero() {
        return Ok(vec![0.0; t.len()]);
    }

    let ss = StateSpace::from_tf(tf)?;
    let n = ss.order();
    let mut y = Vec::with_capacity(t.len());

    if n == 0 {
        y.extend(t.iter().map(|&ti| if ti < 0.0 { 0.0 } else { ss.d }));
        return Ok(y);
    }

    let mut x = DVector::zeros(n);
    let mut t_prev = 0.0;
    let mut cached: Option<(f64, DMatrix<f64>, DVector<f64>)> = None;

    for &ti in t {
        if ti < 0.0 {
            y.push(0.0);
            continue;
        }
        let dt = ti - t_prev;
        if dt > 0.0 {
            let reuse = matches!(&cached, Some((h, _, _)) if (h - dt).abs() <= DT_REUSE_REL_TOL * dt);
            if !reuse {
                let (phi, gamma) = ss.discretize(dt);
                cached = Some((dt, phi, gamma));
            }
            if let Some((_, phi, gamma)) = &cached {
                x = phi * &x + gamma;
            }
            t_prev = ti;
        }
        y.push(ss.output(&x, 1.0));
    }

    Ok(y)
}

/// Unit-step response of `k e^{-theta s} / (tau s + 1)` with the delay replaced
/// by a Padé approximation of `pade_order`.
///
/// Invalid model parameters (`tau <= 0`, `theta < 0`, any non-finite value)
/// yield a NaN vector of the same length as `t` instead of an error.
pub fn fopdt_step(k: f64, tau: f64, theta: f64, t: &[f64], pade_order: usize) -> Vec<f64> {
    let valid = k.is_finite() && tau.is_finite() && theta.is_finite() && tau > 0.0 && theta >= 0.0;
    if !valid {
        return vec![f64::NAN; t.len()];
    }

    let result = TransferFunction::new(vec![k], vec![tau, 1.0]).and_then(|plant| {
        let delay = pade(theta, pade_order)?;
        step_response(&plant.series(&delay), t)
    });

    match result {
        Ok(y) => y,
        Err(e) => {
            debug!(k, tau, theta, error = %e, "FOPDT step response failed");
            vec![f64::NAN; t.len()]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn grid(t_end: f64, n: usize) -> Vec<f64> {
        (0..n).map(|i| t_end * i as f64 / (n - 1) as f64).collect()
    }

    #[test]
    fn first_order_matches_analytic() {
        let g = TransferFunction::new(vec![2.0], vec![0.5, 1.0]).unwrap();
        let t = grid(5.0, 101);
        let y = step_response(&g, &t).unwrap();
        for (ti, yi) in t.iter().zip(&y) {
            assert_relative_eq!(*yi, 2.0 * (1.0 - (-ti / 0.5).exp()), epsilon = 1e-9);
        }
    }

    #[test]
    fn non_uniform_grid_matches_analytic() {
        let g = TransferFunction::new(vec![1.0], vec![1.0, 1.0]).unwrap();
        let t = vec![0.0, 0.01, 0.3, 0.31, 1.7, 4.0];
        let y = step_response(&g, &t).unwrap();
        assert_eq!(y.len(), t.len());
        for (ti, yi) in t.iter().zip(&y) {
            assert_relative_eq!(*yi, 1.0 - (-ti).exp(), epsilon = 1e-9);
        }
    }

    #[test]
    fn samples_before_zero_are_zero() {
        let g = TransferFunction::new(vec![1.0], vec![1.0, 1.0]).unwrap();
        let t = vec![-1.0, -0.5, 0.0, 1.0];
        let y = step_response(&g, &t).unwrap();
        assert_eq!(&y[..2], &[0.0, 0.0]);
        assert_relative_eq!(y[3], 1.0 - (-1.0_f64).exp(), epsilon = 1e-9);
    }

    #[test]
    fn second_order_underdamped_settles_to_gain() {
        // wn = 2, zeta = 0.3
        let g = TransferFunction::new(vec![4.0], vec![1.0, 1.2, 4.0]).unwrap();
        let t = grid(30.0, 3001);
        let y = step_response(&g, &t).unwrap();
        let peak = y.iter().cloned().fold(f64::MIN, f64::max);
        assert!(peak > 1.3);
        assert_relative_eq!(*y.last().unwrap(), 1.0, epsilon = 1e-3);
    }

    #[test]
    fn rejects_non_increasing_time() {
        let g = TransferFunction::identity();
        assert!(step_response(&g, &[0.0, 1.0, 1.0]).is_err());
        assert!(step_response(&g, &[0.0, f64::NAN]).is_err());
    }

    #[test]
    fn null_function_gives_zeros() {
        let y = step_response(&TransferFunction::zero(), &[0.0, 1.0, 2.0]).unwrap();
        assert_eq!(y, vec![0.0; 3]);
    }

    #[test]
    fn fopdt_high_order_delay_tracks_exact_curve() {
        let t = grid(10.0, 1001);
        let y = fopdt_step(2.0, 1.0, 0.5, &t, 10);
        for (ti, yi) in t.iter().zip(&y) {
            let exact = if *ti < 0.5 { 0.0 } else { 2.0 * (1.0 - (-(ti - 0.5)).exp()) };
            assert!((yi - exact).abs() < 0.05, "t={ti}: {yi} vs {exact}");
        }
    }

    #[test]
    fn fopdt_zero_delay_is_first_order() {
        let t = grid(5.0, 51);
        let y = fopdt_step(1.5, 2.0, 0.0, &t, 10);
        for (ti, yi) in t.iter().zip(&y) {
            assert_relative_eq!(*yi, 1.5 * (1.0 - (-ti / 2.0).exp()), epsilon = 1e-9);
        }
    }

    #[test]
    fn fopdt_invalid_parameters_yield_nan() {
        let t = grid(1.0, 11);
        for (k, tau, theta) in [
            (1.0, 0.0, 0.1),
            (1.0, -1.0, 0.1),
            (1.0, 1.0, -0.1),
            (f64::NAN, 1.0, 0.1),
            (1.0, f64::INFINITY, 0.1),
        ] {
            let y = fopdt_step(k, tau, theta, &t, 10);
            assert_eq!(y.len(), t.len());
            assert!(y.iter().all(|v| v.is_nan()));
        }
    }
}
