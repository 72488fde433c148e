//! Loop assembly and set-point step simulation.

use serde::{Deserialize, Serialize};
use tk_controls::PidParameters;
use tk_lti::{StateSpace, TransferFunction, pade, step_response};
use tracing::{debug, info, warn};

use crate::error::{SimError, SimResult};
use crate::metrics::PerformanceMetrics;

/// Simulation tunables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Padé order of the plant delay inside the loop.
    pub pade_order: usize,
    /// Smallest integral time accepted from a manual override.
    pub min_ti: f64,
    /// Settling band as a fraction of the final value.
    pub settle_band: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            pade_order: 1,
            min_ti: 1e-6,
            settle_band: 0.02,
        }
    }
}

/// FOPDT plant `k e^{-theta s} / (tau s + 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plant {
    pub k: f64,
    pub tau: f64,
    pub theta: f64,
}

impl Plant {
    pub fn new(k: f64, tau: f64, theta: f64) -> Self {
        Self { k, tau, theta }
    }

    fn check(&self) -> SimResult<()> {
        if !self.k.is_finite() || !self.tau.is_finite() {
            return Err(SimError::InvalidModel {
                what: "k and tau must be finite",
            });
        }
        if self.tau <= 0.0 {
            return Err(SimError::InvalidModel {
                what: "tau must be positive",
            });
        }
        if !self.theta.is_finite() || self.theta < 0.0 {
            return Err(SimError::InvalidModel {
                what: "theta must be finite and non-negative",
            });
        }
        Ok(())
    }

    /// Plant transfer function with the delay replaced by Padé of `pade_order`.
    pub fn transfer_function(&self, pade_order: usize) -> SimResult<TransferFunction> {
        self.check()?;
        let lag = TransferFunction::new([self.k], [self.tau, 1.0])?;
        let delay = pade(self.theta, pade_order)?;
        Ok(lag.series(&delay))
    }
}

/// Simulated set-point step and its metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClosedLoopResponse {
    /// Simulation time, starting at zero.
    pub t: Vec<f64>,
    /// Output deviation from the initial level, heading for `target`.
    pub y: Vec<f64>,
    /// Commanded change `setpoint - y0`.
    pub target: f64,
    pub metrics: PerformanceMetrics,
}

impl ClosedLoopResponse {
    /// Output in absolute units, offset by the initial level `y0`.
    pub fn absolute(&self, y0: f64) -> Vec<f64> {
        self.y.iter().map(|v| y0 + v).collect()
    }
}

/// `T(s) = Gc Gp / (1 + Gc Gp)`.
pub fn closed_loop_tf(plant: &Plant, pid: &PidParameters, cfg: &SimConfig) -> SimResult<TransferFunction> {
    let gp = plant.transfer_function(cfg.pade_order)?;
    let gc = pid.transfer_function();
    Ok(gc.series(&gp).feedback_unity()?)
}

/// Simulate a set-point step from `y0` to `setpoint` on the axis `t`.
///
/// The step is applied at `t[0]`; the returned axis is `t - t[0]`.
///
/// # Errors
///
/// [`SimError::InvalidModel`] for a non-physical plant,
/// [`SimError::Unstable`] if a closed-loop pole lies in the closed right
/// half-plane or the response leaves the finite range, and
/// [`SimError::Lti`] for an invalid time axis.
pub fn simulate_closed_loop(
    plant: &Plant,
    pid: &PidParameters,
    t: &[f64],
    y0: f64,
    setpoint: f64,
    cfg: &SimConfig,
) -> SimResult<ClosedLoopResponse> {
    let loop_tf = closed_loop_tf(plant, pid, cfg)?;
    debug!(order = loop_tf.den().degree(), null = loop_tf.is_zero(), "closed loop assembled");
    if !loop_tf.is_zero() {
        let abscissa = StateSpace::from_tf(&loop_tf)?.spectral_abscissa();
        if abscissa.is_nan() || abscissa >= 0.0 {
            warn!(abscissa, kp = pid.kp, ti = pid.ti, td = pid.td, "closed loop has unstable poles");
            return Err(SimError::Unstable {
                what: format!("rightmost pole has real part {abscissa:.4}"),
            });
        }
    }

    let t0 = t.first().copied().unwrap_or(0.0);
    let t_sim: Vec<f64> = t.iter().map(|ti| ti - t0).collect();
    let unit = step_response(&loop_tf, &t_sim)?;

    let target = setpoint - y0;
    let y: Vec<f64> = unit.iter().map(|v| v * target).collect();
    if let Some(i) = y.iter().position(|v| !v.is_finite()) {
        return Err(SimError::Unstable {
            what: format!("response diverged at t = {}", t_sim[i]),
        });
    }

    let metrics = PerformanceMetrics::from_response(&t_sim, &y, target, cfg.settle_band);
    info!(
        kp = pid.kp,
        ti = pid.ti,
        td = pid.td,
        tr = ?metrics.tr,
        ts = ?metrics.ts,
        mp = ?metrics.mp,
        "closed loop simulated"
    );

    Ok(ClosedLoopResponse {
        t: t_sim,
        y,
        target,
        metrics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn axis(t_end: f64, dt: f64) -> Vec<f64> {
        let n = (t_end / dt).round() as usize;
        (0..=n).map(|i| i as f64 * dt).collect()
    }

    #[test]
    fn null_controller_gives_flat_response() {
        let plant = Plant::new(2.0, 1.0, 0.5);
        let t = axis(10.0, 0.1);
        let r = simulate_closed_loop(&plant, &PidParameters::ZERO, &t, 0.0, 1.0, &SimConfig::default()).unwrap();
        assert!(r.y.iter().all(|&v| v == 0.0));
        assert_eq!(r.metrics.ts, None);
        assert_eq!(r.metrics.mp, Some(0.0));
        assert_eq!(r.metrics.ess, Some(1.0));
    }

    #[test]
    fn pole_cancelling_pi_gives_first_order_loop() {
        // Ti = tau cancels the plant pole: T(s) = 1/(s + 1) for k = Kp = 1.
        let plant = Plant::new(1.0, 1.0, 0.0);
        let pid = PidParameters::new(1.0, 1.0, 0.0);
        let t: Vec<f64> = axis(10.0, 0.01).iter().map(|ti| ti + 3.0).collect();
        let r = simulate_closed_loop(&plant, &pid, &t, 1.0, 3.0, &SimConfig::default()).unwrap();

        assert_eq!(r.target, 2.0);
        assert_relative_eq!(r.t[0], 0.0);
        for (ti, yi) in r.t.iter().zip(&r.y) {
            assert_relative_eq!(*yi, 2.0 * (1.0 - (-ti).exp()), epsilon = 1e-6);
        }

        let m = r.metrics;
        assert_relative_eq!(m.tr.unwrap(), 9.0_f64.ln(), epsilon = 0.02);
        assert_relative_eq!(m.ts.unwrap(), 50.0_f64.ln(), epsilon = 0.02);
        assert_eq!(m.mp, Some(0.0));
        assert!(m.ess.unwrap() < 1e-3);

        let abs = r.absolute(1.0);
        assert_relative_eq!(abs[abs.len() - 1], 3.0, epsilon = 1e-3);
    }

    #[test]
    fn tuned_loop_tracks_setpoint() {
        let plant = Plant::new(2.0, 4.0, 1.0);
        let pid = tk_controls::tune(tk_controls::TuningMethod::Imc, 2.0, 4.0, 1.0, Some(2.0));
        let t = axis(60.0, 0.05);
        let r = simulate_closed_loop(&plant, &pid, &t, 0.0, 1.0, &SimConfig::default()).unwrap();
        assert!(r.metrics.ess.unwrap() < 0.01);
        assert!(r.metrics.ts.is_some());
        assert!(r.metrics.tr.is_some());
    }

    #[test]
    fn over_tuned_loop_is_unstable() {
        // Loop gain 12 against a 1 s delay on a 4 s lag: the response grows but stays finite.
        let plant = Plant::new(2.0, 4.0, 1.0);
        let pid = PidParameters::new(6.0, 2.0, 0.0);
        let t = axis(20.0, 0.05);
        let err = simulate_closed_loop(&plant, &pid, &t, 0.0, 1.0, &SimConfig::default()).unwrap_err();
        assert!(matches!(err, SimError::Unstable { .. }));

        let loop_tf = closed_loop_tf(&plant, &pid, &SimConfig::default()).unwrap();
        let unit = step_response(&loop_tf, &t).unwrap();
        assert!(unit.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn invalid_plants_are_rejected() {
        let t = axis(1.0, 0.1);
        let pid = PidParameters::new(1.0, 1.0, 0.0);
        for plant in [
            Plant::new(f64::NAN, 1.0, 0.0),
            Plant::new(1.0, 0.0, 0.0),
            Plant::new(1.0, f64::INFINITY, 0.0),
            Plant::new(1.0, 1.0, -0.5),
        ] {
            assert!(matches!(
                simulate_closed_loop(&plant, &pid, &t, 0.0, 1.0, &SimConfig::default()),
                Err(SimError::InvalidModel { .. })
            ));
        }
    }

    #[test]
    fn unordered_time_axis_is_an_lti_error() {
        let plant = Plant::new(1.0, 1.0, 0.2);
        let pid = PidParameters::new(1.0, 1.0, 0.0);
        assert!(matches!(
            simulate_closed_loop(&plant, &pid, &[0.0, 2.0, 1.0], 0.0, 1.0, &SimConfig::default()),
            Err(SimError::Lti(_))
        ));
    }
}
