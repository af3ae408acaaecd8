//! Analog low-pass prototypes.
//!
//! Each prototype is normalized to a unit passband edge (a unit stopband
//! edge for the inverse Chebyshev family) and built as a product of one
//! first-order section when the order is odd and `⌊order/2⌋` second-order
//! sections. Sections have unit DC gain.

use super::Approximation;
use crate::special::elliptic::{
    arc_jac_sc1, complete_elliptic_integral, elliptic_degree, landen_iterations, TOLERANCE,
};
use crate::{Error, Polynomial, PolynomialSpec, Result};
use std::f64::consts::PI;
use tracing::trace;

/// Laplace variable of every prototype.
pub const VARIABLE: &str = "s";

/// Returns the analog low-pass prototype of `approximation`.
///
/// # Errors
///
/// Returns [`Error::UnsupportedApproximation`] for Bessel and Thiran,
/// [`Error::InvalidParameter`] for a zero order, and
/// [`Error::MissingParameter`] when the family needs a ripple factor that is
/// not given.
pub fn analog_prototype(
    approximation: Approximation,
    order: u16,
    epsilon_pass: Option<f64>,
    epsilon_stop: Option<f64>,
) -> Result<Polynomial> {
    if order == 0 {
        return Err(Error::InvalidParameter("order must be positive".to_owned()));
    }
    let pass = || epsilon_pass.ok_or(Error::MissingParameter("passband ripple or attenuation"));
    let stop = || epsilon_stop.ok_or(Error::MissingParameter("stopband ripple or attenuation"));
    match approximation {
        Approximation::Butterworth => Ok(buttap(order)),
        Approximation::Chebyshev => Ok(cheb1ap(order, pass()?)),
        Approximation::InverseChebyshev => Ok(cheb2ap(order, stop()?)),
        Approximation::Elliptic => ellipap(order, pass()?, stop()?),
        Approximation::Bessel | Approximation::Thiran => {
            Err(Error::UnsupportedApproximation(approximation.to_string()))
        }
    }
}

/// `a / (s + a)`.
fn first_order(a: f64) -> Polynomial {
    trace!(pole = -a, "first-order section");
    Polynomial::new(
        &PolynomialSpec::new(VARIABLE)
            .numerator(vec![(0, a)])
            .denominator(vec![(0, a), (1, 1.0)]),
    )
}

/// `c / (s² + b·s + c)`, or `(c / z²)·(s² + z²) / (s² + b·s + c)` with a zero
/// pair at `±j·z`; `zero_squared` is `z²`.
fn second_order(zero_squared: Option<f64>, b: f64, c: f64) -> Polynomial {
    trace!(b, c, ?zero_squared, "second-order section");
    let numerator = match zero_squared {
        Some(z2) => vec![(0, c), (2, c / z2)],
        None => vec![(0, c)],
    };
    Polynomial::new(
        &PolynomialSpec::new(VARIABLE)
            .numerator(numerator)
            .denominator(vec![(0, c), (1, b), (2, 1.0)]),
    )
}

/// Angle of the `k`th pole pair, `(2k + 1)π / (2n)`.
fn pole_angle(k: u16, order: u16) -> f64 {
    f64::from(2 * k + 1) * PI / (2.0 * f64::from(order))
}

fn odd_section(order: u16, a: f64) -> Polynomial {
    if order % 2 == 1 {
        first_order(a)
    } else {
        Polynomial::constant(1.0, VARIABLE)
    }
}

/// Butterworth prototype: poles `−sin θₖ ± j·cos θₖ` on the unit circle.
#[must_use]
pub fn buttap(order: u16) -> Polynomial {
    (0..order / 2).fold(odd_section(order, 1.0), |prototype, k| {
        let theta = pole_angle(k, order);
        prototype * second_order(None, 2.0 * theta.sin(), 1.0)
    })
}

/// Chebyshev type I prototype with passband ripple factor `epsilon`.
///
/// Poles are `−sinh(d)·sin θₖ ± j·cosh(d)·cos θₖ` with `d = asinh(1/ε) / n`.
/// Even orders are scaled by `1/√(1 + ε²)` so that the passband peak is 1.
#[must_use]
pub fn cheb1ap(order: u16, epsilon: f64) -> Polynomial {
    let d = (1.0 / epsilon).asinh() / f64::from(order);
    let (alpha, beta) = (d.sinh(), d.cosh());
    let prototype = (0..order / 2).fold(odd_section(order, alpha), |prototype, k| {
        let theta = pole_angle(k, order);
        let (a, b) = (alpha * theta.sin(), beta * theta.cos());
        prototype * second_order(None, 2.0 * a, a * a + b * b)
    });
    if order % 2 == 0 {
        prototype.scale(1.0 / (1.0 + epsilon * epsilon).sqrt())
    } else {
        prototype
    }
}

/// Chebyshev type II (inverse Chebyshev) prototype with stopband ripple
/// factor `epsilon`; the stopband starts at 1.
///
/// Poles are the reciprocals of type I poles with `d = asinh(ε) / n`; zeros
/// sit at `±j / cos θₖ`.
#[must_use]
pub fn cheb2ap(order: u16, epsilon: f64) -> Polynomial {
    let d = epsilon.asinh() / f64::from(order);
    let (alpha, beta) = (d.sinh(), d.cosh());
    (0..order / 2).fold(odd_section(order, 1.0 / alpha), |prototype, k| {
        let theta = pole_angle(k, order);
        let (a, b) = (alpha * theta.sin(), beta * theta.cos());
        let c = a * a + b * b;
        let zero_squared = 1.0 / theta.cos().powi(2);
        prototype * second_order(Some(zero_squared), 2.0 * a / c, 1.0 / c)
    })
}

/// Elliptic (Cauer) prototype with passband and stopband ripple factors.
///
/// The selectivity `k` solves the degree equation for the discrimination
/// `k₁ = εp/εs`. With `sn, cn, dn` taken at `j·K(k)/n` and `sv, cv, dv` at
/// `v₀ = K(k)·sc⁻¹(1/εp, k₁')/(n·K(k₁))` with modulus `k'`, zeros are at
/// `±j/(k·sn)` and poles at `−(cn·dn·sv·cv ± j·sn·dv) / (1 − dn²·sv²)`.
///
/// The sections are returned multiplied out. Zeros and poles crowd towards
/// `±j` as the order grows, so evaluating the expanded coefficients loses
/// accuracy in the passband from about order 9 with 3 dB/20 dB figures
/// (order 12 dips to 0.52 against a floor of 0.708). The sections
/// themselves stay exact.
///
/// # Errors
///
/// Returns [`Error::InvalidParameter`] unless `0 < εp < εs`, and any error
/// of the elliptic function evaluations.
pub fn ellipap(order: u16, epsilon_pass: f64, epsilon_stop: f64) -> Result<Polynomial> {
    if !(epsilon_pass > 0.0 && epsilon_pass < epsilon_stop) {
        return Err(Error::InvalidParameter(format!(
            "elliptic design needs 0 < εp < εs, got εp = {} and εs = {}",
            epsilon_pass, epsilon_stop
        )));
    }
    let n = f64::from(order);
    let k1 = epsilon_pass / epsilon_stop;
    let k = elliptic_degree(order, k1, TOLERANCE)?;
    let k_complement = ((1.0 - k) * (1.0 + k)).sqrt();
    let quarter = complete_elliptic_integral(k, TOLERANCE)?;
    let r = arc_jac_sc1(1.0 / epsilon_pass, k1)?;
    let v0 = quarter * r / (n * complete_elliptic_integral(k1, TOLERANCE)?);
    let v = landen_iterations(v0, k_complement, TOLERANCE)?;
    trace!(k, k1, v0, "elliptic parameters");

    let mut prototype = odd_section(order, v.sn / v.cn);
    for j in (1..order).rev().step_by(2) {
        let u = landen_iterations(f64::from(j) * quarter / n, k, TOLERANCE)?;
        let denominator = 1.0 - (u.dn * v.sn).powi(2);
        let re = u.cn * u.dn * v.sn * v.cn / denominator;
        let im = u.sn * v.dn / denominator;
        let zero_squared = (k * u.sn).powi(-2);
        prototype = prototype * second_order(Some(zero_squared), 2.0 * re, re * re + im * im);
    }
    if order % 2 == 0 {
        prototype = prototype.scale(1.0 / (1.0 + epsilon_pass * epsilon_pass).sqrt());
    }
    Ok(prototype)
}

#[cfg(test)]
mod test {
    use super::{analog_prototype, cheb1ap, cheb2ap, ellipap};
    use crate::signal::filter::{ripple_factor, Approximation};
    use crate::special::elliptic::{elliptic_degree, TOLERANCE};
    use crate::{Error, Polynomial};
    use approx::assert_abs_diff_eq;

    fn gain(p: &Polynomial, omega: f64) -> f64 {
        p.frequency_response(omega).norm()
    }

    #[test]
    fn buttap() {
        let p = super::buttap(2);
        assert_abs_diff_eq!(
            p.denominator().coefficient(1),
            std::f64::consts::SQRT_2,
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(p.denominator().coefficient(0), 1.0, epsilon = 1e-12);

        let p = super::buttap(3);
        let coefficients = (0..=3)
            .map(|e| p.denominator().coefficient(e))
            .collect::<Vec<_>>();
        for (c, expected) in coefficients.iter().zip([1.0, 2.0, 2.0, 1.0].iter()) {
            assert_abs_diff_eq!(c, expected, epsilon = 1e-12);
        }
        assert_eq!(p.numerator().rendered(), "1");
    }

    #[test]
    fn butterworth_degree_matches_order() {
        for order in 1..=12 {
            let p = super::buttap(order);
            assert_eq!(p.denominator().degree(), Some(i64::from(order)));
            assert_eq!(p.numerator().degree(), Some(0));
        }
    }

    #[test]
    fn butterworth_magnitude() {
        for order in 1..=8 {
            let p = super::buttap(order);
            for &omega in &[0.0_f64, 0.5, 1.0, 2.0] {
                let expected = 1.0 / (1.0 + omega.powi(2 * i32::from(order))).sqrt();
                assert_abs_diff_eq!(gain(&p, omega), expected, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn chebyshev_passband() {
        let epsilon = ripple_factor(None, Some(1.0)).unwrap();
        let floor = 1.0 / (1.0 + epsilon * epsilon).sqrt();
        for order in 1..=7 {
            let p = cheb1ap(order, epsilon);
            assert_eq!(p.denominator().degree(), Some(i64::from(order)));
            assert_abs_diff_eq!(gain(&p, 1.0), floor, epsilon = 1e-9);
            let dc = if order % 2 == 0 { floor } else { 1.0 };
            assert_abs_diff_eq!(p.evaluate(0.0), dc, epsilon = 1e-9);
            for i in 0..=50 {
                let g = gain(&p, f64::from(i) / 50.0);
                assert!(g <= 1.0 + 1e-9 && g >= floor - 1e-9);
            }
        }
    }

    #[test]
    fn chebyshev_third_order_denominator() {
        // 1 dB ripple: s³ + 0.988341s² + 1.238409s + 0.491307.
        let epsilon = ripple_factor(None, Some(1.0)).unwrap();
        let p = cheb1ap(3, epsilon);
        assert_abs_diff_eq!(p.denominator().coefficient(2), 0.988_341, epsilon = 1e-5);
        assert_abs_diff_eq!(p.denominator().coefficient(1), 1.238_409, epsilon = 1e-5);
        assert_abs_diff_eq!(p.denominator().coefficient(0), 0.491_307, epsilon = 1e-5);
    }

    #[test]
    fn inverse_chebyshev_stopband() {
        let epsilon = ripple_factor(None, Some(40.0)).unwrap();
        let ceiling = 1.0 / (1.0 + epsilon * epsilon).sqrt();
        for order in 1..=7 {
            let p = cheb2ap(order, epsilon);
            assert_eq!(p.denominator().degree(), Some(i64::from(order)));
            assert_eq!(
                p.numerator().degree(),
                Some(i64::from(order - order % 2))
            );
            assert_abs_diff_eq!(p.evaluate(0.0), 1.0, epsilon = 1e-9);
            assert_abs_diff_eq!(gain(&p, 1.0), ceiling, epsilon = 1e-9);
            for i in 0..=40 {
                let omega = 1.0 + f64::from(i) * 0.25;
                assert!(gain(&p, omega) <= ceiling + 1e-9);
            }
        }
    }

    #[test]
    fn elliptic_response() {
        let epsilon_pass = ripple_factor(None, Some(0.5)).unwrap();
        let epsilon_stop = ripple_factor(None, Some(40.0)).unwrap();
        let floor = 1.0 / (1.0 + epsilon_pass * epsilon_pass).sqrt();
        let ceiling = 1.0 / (1.0 + epsilon_stop * epsilon_stop).sqrt();
        for order in 1..=6 {
            let p = ellipap(order, epsilon_pass, epsilon_stop).unwrap();
            assert_eq!(p.denominator().degree(), Some(i64::from(order)));
            assert_eq!(
                p.numerator().degree(),
                Some(i64::from(order - order % 2))
            );
            let dc = if order % 2 == 0 { floor } else { 1.0 };
            assert_abs_diff_eq!(p.evaluate(0.0), dc, epsilon = 1e-9);
            assert_abs_diff_eq!(gain(&p, 1.0), floor, epsilon = 1e-7);
            for i in 0..=50 {
                let g = gain(&p, f64::from(i) / 50.0);
                assert!(g <= 1.0 + 1e-7 && g >= floor - 1e-7);
            }

            let k = elliptic_degree(order, epsilon_pass / epsilon_stop, TOLERANCE).unwrap();
            for &factor in &[1.0, 1.01, 1.5, 2.0, 5.0, 20.0] {
                assert!(gain(&p, factor / k) <= ceiling * (1.0 + 1e-6));
            }
        }
    }

    #[test]
    fn elliptic_expanded_response_up_to_order_eight() {
        let epsilon_pass = ripple_factor(None, Some(3.0)).unwrap();
        let epsilon_stop = ripple_factor(None, Some(20.0)).unwrap();
        let floor = 1.0 / (1.0 + epsilon_pass * epsilon_pass).sqrt();
        for order in 1..=8 {
            let p = ellipap(order, epsilon_pass, epsilon_stop).unwrap();
            for i in 0..=200 {
                let g = gain(&p, f64::from(i) / 200.0);
                assert!(g <= 1.0 + 1e-6 && g >= floor - 1e-6);
            }
        }
    }

    #[test]
    fn elliptic_rejects_inverted_ripple() {
        assert!(matches!(
            ellipap(3, 0.5, 0.1),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn prototype_dispatch() {
        let p = analog_prototype(Approximation::Butterworth, 4, None, None).unwrap();
        assert_eq!(p, super::buttap(4));
        assert_eq!(
            analog_prototype(Approximation::Bessel, 4, None, None),
            Err(Error::UnsupportedApproximation("bessel".to_owned()))
        );
        assert_eq!(
            analog_prototype(Approximation::Thiran, 4, None, None),
            Err(Error::UnsupportedApproximation("thiran".to_owned()))
        );
        assert_eq!(
            analog_prototype(Approximation::Chebyshev, 4, None, Some(10.0)),
            Err(Error::MissingParameter("passband ripple or attenuation"))
        );
        assert_eq!(
            analog_prototype(Approximation::InverseChebyshev, 4, Some(0.5), None),
            Err(Error::MissingParameter("stopband ripple or attenuation"))
        );
        assert!(matches!(
            analog_prototype(Approximation::Butterworth, 0, None, None),
            Err(Error::InvalidParameter(_))
        ));
    }
}
