//! Reaction-curve identification rules.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Rule that produced an FOPDT model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IdentMethod {
    /// Smith: 28.3% and 63.2% crossings.
    Smith,
    /// Sundaresan & Krishnaswamy: 35.3% and 85.3% crossings.
    Sundaresan,
    /// First order without delay from the 10%-90% rise.
    DelayFree,
}

impl IdentMethod {
    /// Two-point rules, in evaluation (and tie-break) order.
    pub const RULES: [IdentMethod; 2] = [IdentMethod::Smith, IdentMethod::Sundaresan];

    /// Normalized response fractions whose crossing times feed the rule.
    pub fn fractions(self) -> (f64, f64) {
        match self {
            IdentMethod::Smith => (0.283, 0.632),
            IdentMethod::Sundaresan => (0.353, 0.853),
            IdentMethod::DelayFree => (0.1, 0.9),
        }
    }

    /// `(tau, theta)` from the crossing times `t1 < t2`, measured from the step.
    pub fn estimate(self, t1: f64, t2: f64) -> (f64, f64) {
        match self {
            IdentMethod::Smith => {
                let tau = 1.5 * (t2 - t1);
                (tau, t2 - tau)
            }
            IdentMethod::Sundaresan => ((2.0 / 3.0) * (t2 - t1), 1.3 * t1 - 0.29 * t2),
            IdentMethod::DelayFree => ((t2 - t1) / 2.2, 0.0),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            IdentMethod::Smith => "Smith",
            IdentMethod::Sundaresan => "Sundaresan",
            IdentMethod::DelayFree => "DelayFree",
        }
    }
}

impl fmt::Display for IdentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
