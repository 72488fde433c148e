//! State-space realization and exact zero-order-hold discretization.

use nalgebra::linalg::Schur;
use nalgebra::{DMatrix, DVector};

use crate::error::{LtiError, LtiResult};
use crate::transfer_function::TransferFunction;

const SCHUR_MAX_ITER: usize = 10_000;

/// Continuous-time realization `x' = A x + B u`, `y = C x + D u`.
#[derive(Debug, Clone)]
pub struct StateSpace {
    pub a: DMatrix<f64>,
    pub b: DVector<f64>,
    pub c: DVector<f64>,
    pub d: f64,
}

impl StateSpace {
    /// Frequency-scaled controllable canonical realization of a proper transfer function.
    ///
    /// The polynomial variable is rescaled by `w0 = |a_n|^(1/n)` before building
    /// the companion form, which keeps high-order Padé denominators (whose raw
    /// coefficients span many decades) well conditioned for the matrix exponential.
    ///
    /// # Errors
    ///
    /// Returns [`LtiError::Improper`] when the numerator degree exceeds the denominator degree.
    pub fn from_tf(tf: &TransferFunction) -> LtiResult<Self> {
        if !tf.is_proper() {
            return Err(LtiError::Improper {
                num: tf.num().degree(),
                den: tf.den().degree(),
            });
        }

        let den = tf.den().coeffs();
        let n = den.len() - 1;

        // Numerator padded to n+1 coefficients.
        let mut num = vec![0.0; n + 1];
        if !tf.is_zero() {
            let raw = tf.num().coeffs();
            num[n + 1 - raw.len()..].copy_from_slice(raw);
        }

        if n == 0 {
            return Ok(Self {
                a: DMatrix::zeros(0, 0),
                b: DVector::zeros(0),
                c: DVector::zeros(0),
                d: num[0],
            });
        }

        let w0 = {
            let an = den[n].abs();
            let w = an.powf(1.0 / n as f64);
            if an > 0.0 && w.is_finite() && w > 0.0 { w } else { 1.0 }
        };

        // a'_i = a_i / w0^i, b'_i = b_i / w0^i (den is monic so a'_0 = 1).
        let mut a_s = vec![0.0; n + 1];
        let mut b_s = vec![0.0; n + 1];
        let mut scale = 1.0;
        for i in 0..=n {
            a_s[i] = den[i] / scale;
            b_s[i] = num[i] / scale;
            scale *= w0;
        }

        let d = b_s[0];
        let mut a = DMatrix::zeros(n, n);
        for i in 0..n - 1 {
            a[(i, i + 1)] = w0;
        }
        for j in 0..n {
            // Last row: -a'_n, -a'_{n-1}, ..., -a'_1
            a[(n - 1, j)] = -w0 * a_s[n - j];
        }
        let mut b = DVector::zeros(n);
        b[n - 1] = w0;
        let c = DVector::from_fn(n, |j, _| b_s[n - j] - a_s[n - j] * d);

        Ok(Self { a, b, c, d })
    }

    pub fn order(&self) -> usize {
        self.a.nrows()
    }

    /// Largest real part among the poles; `-inf` for a static gain.
    ///
    /// The system is asymptotically stable exactly when this is negative.
    /// NaN when `A` is not finite or the Schur iteration does not converge.
    pub fn spectral_abscissa(&self) -> f64 {
        if self.order() == 0 {
            return f64::NEG_INFINITY;
        }
        if !self.a.iter().all(|v| v.is_finite()) {
            return f64::NAN;
        }
        match Schur::try_new(self.a.clone(), f64::EPSILON, SCHUR_MAX_ITER) {
            Some(schur) => schur
                .complex_eigenvalues()
                .iter()
                .map(|p| p.re)
                .fold(f64::NEG_INFINITY, f64::max),
            None => f64::NAN,
        }
    }

    /// Exact discretization under a constant input held over `dt`.
    ///
    /// Returns `(Phi, Gamma)` with `x[k+1] = Phi x[k] + Gamma u`, computed from
    /// `exp([[A, B], [0, 0]] * dt)`.
    pub fn discretize(&self, dt: f64) -> (DMatrix<f64>, DVector<f64>) {
        let n = self.order();
        let mut m = DMatrix::zeros(n + 1, n + 1);
        m.view_mut((0, 0), (n, n)).copy_from(&(&self.a * dt));
        m.view_mut((0, n), (n, 1)).copy_from(&(&self.b * dt));
        let e = m.exp();
        let phi = e.view((0, 0), (n, n)).into_owned();
        let gamma = e.view((0, n), (n, 1)).column(0).into_owned();
        (phi, gamma)
    }

    /// Output for state `x` and input `u`.
    pub fn output(&self, x: &DVector<f64>, u: f64) -> f64 {
        self.c.dot(x) + self.d * u
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn first_order_realization_matches_dc_gain() {
        let g = TransferFunction::new(vec![2.0], vec![1.0, 1.0]).unwrap();
        let ss = StateSpace::from_tf(&g).unwrap();
        assert_eq!(ss.order(), 1);
        // DC gain = D - C A^-1 B
        let dc = ss.d - ss.c[0] * ss.b[0] / ss.a[(0, 0)];
        assert_relative_eq!(dc, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn static_gain_has_no_states() {
        let g = TransferFunction::new(vec![3.0], vec![1.0]).unwrap();
        let ss = StateSpace::from_tf(&g).unwrap();
        assert_eq!(ss.order(), 0);
        assert_eq!(ss.d, 3.0);
    }

    #[test]
    fn biproper_has_feedthrough() {
        // (s + 3)/(s + 1) = 1 + 2/(s + 1)
        let g = TransferFunction::new(vec![1.0, 3.0], vec![1.0, 1.0]).unwrap();
        let ss = StateSpace::from_tf(&g).unwrap();
        assert_relative_eq!(ss.d, 1.0);
        let dc = ss.d - ss.c[0] * ss.b[0] / ss.a[(0, 0)];
        assert_relative_eq!(dc, 3.0, epsilon = 1e-12);
    }

    #[test]
    fn spectral_abscissa_locates_rightmost_pole() {
        // (s + 2)(s + 5)
        let g = TransferFunction::new(vec![1.0], vec![1.0, 7.0, 10.0]).unwrap();
        let ss = StateSpace::from_tf(&g).unwrap();
        assert_relative_eq!(ss.spectral_abscissa(), -2.0, epsilon = 1e-9);

        // (s - 1)(s + 3), far from unit scale
        let g = TransferFunction::new(vec![1.0], vec![1.0, 2.0, -3.0]).unwrap();
        assert_relative_eq!(StateSpace::from_tf(&g).unwrap().spectral_abscissa(), 1.0, epsilon = 1e-9);

        // s^2 + 0.2 s + 4: lightly damped pair at -0.1 +- j
        let g = TransferFunction::new(vec![1.0], vec![1.0, 0.2, 4.0]).unwrap();
        assert_relative_eq!(StateSpace::from_tf(&g).unwrap().spectral_abscissa(), -0.1, epsilon = 1e-9);

        let k = TransferFunction::new(vec![3.0], vec![1.0]).unwrap();
        assert_eq!(StateSpace::from_tf(&k).unwrap().spectral_abscissa(), f64::NEG_INFINITY);
    }

    #[test]
    fn improper_rejected() {
        let g = TransferFunction::new(vec![1.0, 0.0, 1.0], vec![1.0, 0.0]).unwrap();
        assert!(matches!(
            StateSpace::from_tf(&g),
            Err(LtiError::Improper { num: 2, den: 1 })
        ));
    }

    #[test]
    fn discretize_first_order() {
        // x' = -x + u  ->  Phi = e^-dt, Gamma = 1 - e^-dt (up to realization scaling)
        let g = TransferFunction::new(vec![1.0], vec![1.0, 1.0]).unwrap();
        let ss = StateSpace::from_tf(&g).unwrap();
        let (phi, gamma) = ss.discretize(0.5);
        assert_relative_eq!(phi[(0, 0)], (-0.5_f64).exp(), epsilon = 1e-10);
        let y = ss.output(&gamma, 1.0);
        assert_relative_eq!(y, 1.0 - (-0.5_f64).exp(), epsilon = 1e-10);
    }
}
