//! PID parameters and their transfer function.

use serde::{Deserialize, Serialize};
use tk_lti::TransferFunction;

use crate::error::{ControlError, ControlResult};

/// Ideal parallel PID: `Gc(s) = Kp + Kp/(Ti s) + Kp Td s`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PidParameters {
    /// Proportional gain.
    pub kp: f64,
    /// Integral time (s).
    pub ti: f64,
    /// Derivative time (s).
    pub td: f64,
}

impl Default for PidParameters {
    fn default() -> Self {
        Self::ZERO
    }
}

impl PidParameters {
    /// All gains zero; what tuning returns for an invalid model.
    pub const ZERO: PidParameters = PidParameters {
        kp: 0.0,
        ti: 0.0,
        td: 0.0,
    };

    /// Inert but non-singular controller used when a tuning result is unusable.
    pub const SAFE_DEFAULT: PidParameters = PidParameters {
        kp: 0.0,
        ti: 0.01,
        td: 0.0,
    };

    pub fn new(kp: f64, ti: f64, td: f64) -> Self {
        Self { kp, ti, td }
    }

    pub fn is_finite(&self) -> bool {
        self.kp.is_finite() && self.ti.is_finite() && self.td.is_finite()
    }

    /// Check that the parameters describe a realizable controller.
    ///
    /// # Errors
    ///
    /// [`ControlError::NonFinite`] for NaN or infinite gains, then
    /// [`ControlError::ControllerSingular`] for `ti <= 0`.
    pub fn validate(&self) -> ControlResult<()> {
        if !self.kp.is_finite() {
            return Err(ControlError::NonFinite { what: "kp" });
        }
        if !self.ti.is_finite() {
            return Err(ControlError::NonFinite { what: "ti" });
        }
        if !self.td.is_finite() {
            return Err(ControlError::NonFinite { what: "td" });
        }
        if self.ti <= 0.0 {
            return Err(ControlError::ControllerSingular { ti: self.ti });
        }
        Ok(())
    }

    /// True when the controller reduces to the null transfer function.
    pub fn is_null(&self) -> bool {
        self.validate().is_err() || (self.kp == 0.0 && self.ti == 0.0 && self.td == 0.0)
    }

    /// `(Kp Td s^2 + Kp s + Kp/Ti) / s`, or the null function for singular,
    /// non-finite or all-zero parameters.
    pub fn transfer_function(&self) -> TransferFunction {
        if self.is_null() {
            return TransferFunction::zero();
        }
        let PidParameters { kp, ti, td } = *self;
        TransferFunction::new([kp * td, kp, kp / ti], [1.0, 0.0])
            .unwrap_or_else(|_| TransferFunction::zero())
    }
}
