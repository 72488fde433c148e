//! Padé approximation of a pure transport delay `e^{-theta*s}`.

use crate::error::{LtiError, LtiResult};
use crate::poly::Polynomial;
use crate::transfer_function::TransferFunction;

/// Rational `[order/order]` Padé approximation of `e^{-theta*s}`.
///
/// Denominator coefficients are `c_k = (2n-k)! n! / ((2n)! k! (n-k)!) * theta^k`
/// for `s^k`; the numerator uses the same magnitudes with alternating sign.
/// `theta == 0` yields the identity for every order.
///
/// # Errors
///
/// Returns [`LtiError::InvalidArg`] for negative or non-finite `theta`, or for
/// `order == 0` with a non-zero delay.
pub fn pade(theta: f64, order: usize) -> LtiResult<TransferFunction> {
    if !theta.is_finite() || theta < 0.0 {
        return Err(LtiError::InvalidArg {
            what: "delay must be finite and non-negative",
        });
    }
    if theta == 0.0 {
        return Ok(TransferFunction::identity());
    }
    if order == 0 {
        return Err(LtiError::InvalidArg {
            what: "Padé order must be at least 1",
        });
    }

    let n = order as f64;
    // Ascending powers of s; ratio recurrence avoids factorial overflow.
    let mut ascending = Vec::with_capacity(order + 1);
    let mut c = 1.0;
    ascending.push(c);
    for k in 0..order {
        let kf = k as f64;
        c *= theta * (n - kf) / ((2.0 * n - kf) * (kf + 1.0));
        ascending.push(c);
    }

    let den: Vec<f64> = ascending.iter().rev().copied().collect();
    let num: Vec<f64> = ascending
        .iter()
        .enumerate()
        .rev()
        .map(|(k, &c)| if k % 2 == 0 { c } else { -c })
        .collect();

    TransferFunction::from_polys(Polynomial::new(num), Polynomial::new(den))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn zero_delay_is_identity_for_any_order() {
        for order in [0, 1, 2, 5, 10, 20] {
            assert_eq!(pade(0.0, order).unwrap(), TransferFunction::identity());
        }
    }

    #[test]
    fn first_order_coefficients() {
        // (1 - theta/2 s) / (1 + theta/2 s), normalized monic
        let d = pade(2.0, 1).unwrap();
        assert_eq!(d.den().coeffs(), &[1.0, 1.0]);
        assert_eq!(d.num().coeffs(), &[-1.0, 1.0]);
    }

    #[test]
    fn second_order_coefficients() {
        // 1 - theta s/2 + theta^2 s^2/12 over 1 + theta s/2 + theta^2 s^2/12
        let theta = 0.6;
        let d = pade(theta, 2).unwrap();
        let c2 = theta * theta / 12.0;
        assert_relative_eq!(d.den().coeffs()[1], (theta / 2.0) / c2, epsilon = 1e-12);
        assert_relative_eq!(d.den().coeffs()[2], 1.0 / c2, epsilon = 1e-9);
        assert_relative_eq!(d.num().coeffs()[1], -(theta / 2.0) / c2, epsilon = 1e-12);
    }

    #[test]
    fn unit_dc_gain() {
        for order in [1, 3, 10] {
            assert_relative_eq!(pade(0.5, order).unwrap().dc_gain(), 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn negative_delay_rejected() {
        assert!(pade(-0.1, 3).is_err());
        assert!(pade(f64::NAN, 3).is_err());
    }

    proptest! {
        #[test]
        fn numerator_mirrors_denominator(theta in 0.01f64..20.0, order in 1usize..12) {
            let d = pade(theta, order).unwrap();
            let (num, den) = (d.num().coeffs(), d.den().coeffs());
            prop_assert_eq!(num.len(), order + 1);
            prop_assert_eq!(den.len(), order + 1);
            prop_assert!(den.iter().all(|&c| c > 0.0));
            for (a, b) in num.iter().zip(den) {
                prop_assert_eq!(a.abs(), *b);
            }
            prop_assert_eq!(d.dc_gain(), 1.0);
        }
    }
}
