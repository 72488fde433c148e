//! Rational transfer functions `N(s)/D(s)`.

use std::ops::Mul;

use crate::error::{LtiError, LtiResult};
use crate::poly::Polynomial;

/// Single-input single-output rational transfer function.
///
/// The denominator is kept monic (leading coefficient 1).
#[derive(Debug, Clone, PartialEq)]
pub struct TransferFunction {
    num: Polynomial,
    den: Polynomial,
}

impl TransferFunction {
    /// Create a transfer function from coefficient lists, highest power first.
    ///
    /// # Errors
    ///
    /// Returns [`LtiError::ZeroDenominator`] for an empty or all-zero denominator
    /// and [`LtiError::InvalidArg`] for non-finite coefficients.
    pub fn new(num: impl Into<Vec<f64>>, den: impl Into<Vec<f64>>) -> LtiResult<Self> {
        Self::from_polys(Polynomial::new(num), Polynomial::new(den))
    }

    /// Create from already built polynomials.
    pub fn from_polys(num: Polynomial, den: Polynomial) -> LtiResult<Self> {
        if den.is_zero() {
            return Err(LtiError::ZeroDenominator);
        }
        if !num.is_finite() || !den.is_finite() {
            return Err(LtiError::InvalidArg {
                what: "transfer function coefficients must be finite",
            });
        }
        let lead = den.leading();
        Ok(Self {
            num: num.scale(1.0 / lead),
            den: den.scale(1.0 / lead),
        })
    }

    /// The null transfer function: output is always zero.
    pub fn zero() -> Self {
        Self {
            num: Polynomial::zero(),
            den: Polynomial::constant(1.0),
        }
    }

    /// Unit gain, no dynamics.
    pub fn identity() -> Self {
        Self {
            num: Polynomial::constant(1.0),
            den: Polynomial::constant(1.0),
        }
    }

    pub fn num(&self) -> &Polynomial {
        &self.num
    }

    pub fn den(&self) -> &Polynomial {
        &self.den
    }

    pub fn is_zero(&self) -> bool {
        self.num.is_zero()
    }

    pub fn is_proper(&self) -> bool {
        self.num.is_zero() || self.num.degree() <= self.den.degree()
    }

    /// Steady-state gain `N(0)/D(0)`; infinite for a pole at the origin.
    pub fn dc_gain(&self) -> f64 {
        self.num.eval(0.0) / self.den.eval(0.0)
    }

    /// Series connection `self * other`.
    pub fn series(&self, other: &TransferFunction) -> TransferFunction {
        let num = &self.num * &other.num;
        let den = &self.den * &other.den;
        // Product of two monic polynomials is monic, no renormalization needed.
        TransferFunction { num, den }
    }

    /// Unity negative feedback around `self`: `G / (1 + G)`.
    ///
    /// # Errors
    ///
    /// Returns [`LtiError::ZeroDenominator`] if `D + N` cancels identically.
    pub fn feedback_unity(&self) -> LtiResult<TransferFunction> {
        if self.is_zero() {
            return Ok(TransferFunction::zero());
        }
        let den = &self.den + &self.num;
        TransferFunction::from_polys(self.num.clone(), den)
    }
}

impl Mul for &TransferFunction {
    type Output = TransferFunction;

    fn mul(self, rhs: &TransferFunction) -> TransferFunction {
        self.series(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn normalizes_denominator() {
        let g = TransferFunction::new(vec![2.0], vec![4.0, 2.0]).unwrap();
        assert_eq!(g.den().coeffs(), &[1.0, 0.5]);
        assert_eq!(g.num().coeffs(), &[0.5]);
        assert_relative_eq!(g.dc_gain(), 1.0);
    }

    #[test]
    fn rejects_zero_denominator() {
        assert_eq!(
            TransferFunction::new(vec![1.0], vec![0.0, 0.0]),
            Err(LtiError::ZeroDenominator)
        );
    }

    #[test]
    fn rejects_non_finite() {
        assert!(TransferFunction::new(vec![f64::NAN], vec![1.0]).is_err());
    }

    #[test]
    fn series_multiplies_gains() {
        let a = TransferFunction::new(vec![2.0], vec![1.0, 1.0]).unwrap();
        let b = TransferFunction::new(vec![3.0], vec![2.0, 1.0]).unwrap();
        let ab = &a * &b;
        assert_relative_eq!(ab.dc_gain(), 6.0);
        assert_eq!(ab.den().degree(), 2);
    }

    #[test]
    fn unity_feedback_of_first_order() {
        // G = 1/(s+1) -> T = 1/(s+2)
        let g = TransferFunction::new(vec![1.0], vec![1.0, 1.0]).unwrap();
        let t = g.feedback_unity().unwrap();
        assert_eq!(t.den().coeffs(), &[1.0, 2.0]);
        assert_relative_eq!(t.dc_gain(), 0.5);
    }

    #[test]
    fn feedback_of_null_is_null() {
        let t = TransferFunction::zero().feedback_unity().unwrap();
        assert!(t.is_zero());
    }

    #[test]
    fn properness() {
        let pid = TransferFunction::new(vec![1.0, 1.0, 1.0], vec![1.0, 0.0]).unwrap();
        assert!(!pid.is_proper());
        assert!(TransferFunction::identity().is_proper());
    }
}
