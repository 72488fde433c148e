//! The identified first-order-plus-dead-time model.

use serde::{Deserialize, Serialize};

use crate::method::IdentMethod;

/// `G(s) = k e^{-theta s} / (tau s + 1)` with its provenance and fit score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FopdtModel {
    /// Static gain.
    pub k: f64,
    /// Time constant (s).
    pub tau: f64,
    /// Dead time measured from the step instant (s).
    pub theta: f64,
    /// Rule that won the fit.
    pub method: IdentMethod,
    /// Root-mean-square error against the experimental output.
    pub rmse: f64,
}

impl FopdtModel {
    /// `tau > 0`, `theta >= 0`, `k != 0`, all finite.
    pub fn is_valid(&self) -> bool {
        self.k.is_finite()
            && self.tau.is_finite()
            && self.theta.is_finite()
            && self.tau > 0.0
            && self.theta >= 0.0
            && self.k != 0.0
    }

    /// Controllability ratio `theta / tau`.
    pub fn ratio(&self) -> f64 {
        self.theta / self.tau
    }
}
