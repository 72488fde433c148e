//! Classical FOPDT tuning correlations.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ControlError;
use crate::pid::PidParameters;

/// ITAE set-point correlation constants `A..F`.
pub const ITAE_CONSTANTS: [f64; 6] = [0.965, -0.85, 0.796, -0.147, 0.308, 0.929];

/// Closed-loop time constant used by IMC when none (or a non-positive one) is given.
pub const DEFAULT_IMC_LAMBDA: f64 = 1.0;

/// Tuning rule for a PID controller on an FOPDT plant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TuningMethod {
    ZieglerNicholsOpenLoop,
    Imc,
    ChrNoOvershoot,
    ChrWithOvershoot,
    Itae,
    CohenCoon,
}

impl TuningMethod {
    pub const ALL: [TuningMethod; 6] = [
        TuningMethod::ZieglerNicholsOpenLoop,
        TuningMethod::Imc,
        TuningMethod::ChrNoOvershoot,
        TuningMethod::ChrWithOvershoot,
        TuningMethod::Itae,
        TuningMethod::CohenCoon,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TuningMethod::ZieglerNicholsOpenLoop => "Ziegler-Nichols-OpenLoop",
            TuningMethod::Imc => "IMC",
            TuningMethod::ChrNoOvershoot => "CHR-NoOvershoot",
            TuningMethod::ChrWithOvershoot => "CHR-WithOvershoot",
            TuningMethod::Itae => "ITAE",
            TuningMethod::CohenCoon => "Cohen-Coon",
        }
    }
}

impl fmt::Display for TuningMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TuningMethod {
    type Err = ControlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        TuningMethod::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ControlError::InvalidArg {
                what: format!("unknown tuning method '{s}'"),
            })
    }
}

/// Evaluate `method` for the plant `k e^{-theta s} / (tau s + 1)`.
///
/// An invalid plant (`tau <= 0`, `theta < 0`, `k` zero or non-finite) gives
/// [`PidParameters::ZERO`]. `lambda` is only read by IMC. Correlations that
/// divide by `theta` return non-finite gains when `theta == 0`.
pub fn tune(method: TuningMethod, k: f64, tau: f64, theta: f64, lambda: Option<f64>) -> PidParameters {
    let valid = k.is_finite() && k != 0.0 && tau > 0.0 && theta >= 0.0 && theta.is_finite();
    if !valid {
        warn!(%method, k, tau, theta, "invalid plant model, returning zero gains");
        return PidParameters::ZERO;
    }

    let r = theta / tau;
    let (kp, ti, td) = match method {
        TuningMethod::ZieglerNicholsOpenLoop => (1.2 * tau / (k * theta), 2.0 * theta, theta / 2.0),
        TuningMethod::Imc => {
            let lambda = lambda.filter(|l| *l > 0.0).unwrap_or(DEFAULT_IMC_LAMBDA);
            (
                (2.0 * tau + theta) / (k * (2.0 * lambda + theta)),
                tau + theta / 2.0,
                tau * theta / (2.0 * tau + theta),
            )
        }
        TuningMethod::ChrNoOvershoot => (0.6 * tau / (k * theta), tau, theta / 2.0),
        TuningMethod::ChrWithOvershoot => (0.95 * tau / (k * theta), 1.357 * tau, 0.473 * theta),
        TuningMethod::Itae => {
            let [a, b, c, d, e, f] = ITAE_CONSTANTS;
            ((a / k) * r.powf(b), tau * (c + d * r), tau * e * r.powf(f))
        }
        TuningMethod::CohenCoon => (
            (16.0 * tau + 3.0 * theta) / (12.0 * theta * k),
            theta * (32.0 + 6.0 * r) / (13.0 + 8.0 * r),
            4.0 * theta / (11.0 + 2.0 * r),
        ),
    };

    let pid = PidParameters { kp, ti, td };
    debug!(%method, kp, ti, td, "tuned");
    pid
}
