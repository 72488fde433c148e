//! Real polynomials in `s`, coefficients highest power first.

use std::ops::{Add, Mul};

/// Polynomial `c[0]*s^n + c[1]*s^(n-1) + ... + c[n]`.
///
/// Leading zeros are trimmed on construction; the zero polynomial is stored as `[0.0]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Polynomial {
    coeffs: Vec<f64>,
}

impl Polynomial {
    /// Build from coefficients, highest power first.
    pub fn new(coeffs: impl Into<Vec<f64>>) -> Self {
        let mut coeffs: Vec<f64> = coeffs.into();
        let first_nonzero = coeffs.iter().position(|&c| c != 0.0);
        match first_nonzero {
            Some(idx) => {
                coeffs.drain(..idx);
            }
            None => coeffs = vec![0.0],
        }
        Self { coeffs }
    }

    /// The zero polynomial.
    pub fn zero() -> Self {
        Self { coeffs: vec![0.0] }
    }

    /// Constant polynomial.
    pub fn constant(c: f64) -> Self {
        Self::new(vec![c])
    }

    pub fn coeffs(&self) -> &[f64] {
        &self.coeffs
    }

    pub fn degree(&self) -> usize {
        self.coeffs.len() - 1
    }

    pub fn is_zero(&self) -> bool {
        self.coeffs.iter().all(|&c| c == 0.0)
    }

    pub fn is_finite(&self) -> bool {
        self.coeffs.iter().all(|c| c.is_finite())
    }

    /// Leading (highest power) coefficient.
    pub fn leading(&self) -> f64 {
        self.coeffs[0]
    }

    /// Evaluate at a real point using Horner's rule.
    pub fn eval(&self, s: f64) -> f64 {
        self.coeffs.iter().fold(0.0, |acc, &c| acc * s + c)
    }

    /// Multiply every coefficient by `k`.
    pub fn scale(&self, k: f64) -> Self {
        Self::new(self.coeffs.iter().map(|c| c * k).collect::<Vec<_>>())
    }
}

impl Add for &Polynomial {
    type Output = Polynomial;

    fn add(self, rhs: &Polynomial) -> Polynomial {
        let n = self.coeffs.len().max(rhs.coeffs.len());
        let pad_a = n - self.coeffs.len();
        let pad_b = n - rhs.coeffs.len();
        let sum: Vec<f64> = (0..n)
            .map(|i| {
                let a = if i >= pad_a { self.coeffs[i - pad_a] } else { 0.0 };
                let b = if i >= pad_b { rhs.coeffs[i - pad_b] } else { 0.0 };
                a + b
            })
            .collect();
        Polynomial::new(sum)
    }
}

impl Mul for &Polynomial {
    type Output = Polynomial;

    fn mul(self, rhs: &Polynomial) -> Polynomial {
        let mut out = vec![0.0; self.coeffs.len() + rhs.coeffs.len() - 1];
        for (i, a) in self.coeffs.iter().enumerate() {
            for (j, b) in rhs.coeffs.iter().enumerate() {
                out[i + j] += a * b;
            }
        }
        Polynomial::new(out)
    }
}
