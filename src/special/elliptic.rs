//! Complete elliptic integrals and Jacobi elliptic functions.
//!
//! Moduli follow the `k` convention (not the parameter `m = k²`).
//!
//! # References
//! - DLMF 19.8: AGM method for complete elliptic integrals
//! - DLMF 22.7: Landen transformations

use crate::{Error, Result};
use num_complex::Complex64;
use num_traits::{Float, FloatConst};
use std::f64::consts::{FRAC_PI_2, PI};
use tracing::warn;

/// Step limit for the AGM and Landen iterations.
pub const MAX_ITERATIONS: usize = 64;

/// Default convergence tolerance.
pub const TOLERANCE: f64 = 1e-12;

/// Iterator over the steps `(a, b) ← ((a + b) / 2, √(a·b))` of the
/// arithmetic-geometric mean.
#[derive(Debug, Clone, Copy)]
pub struct ArithmeticGeometricMean<T> {
    a: T,
    b: T,
}

impl<T: Float> ArithmeticGeometricMean<T> {
    #[must_use]
    pub fn new(a: T, b: T) -> Self {
        Self { a, b }
    }
}

impl<T: Float> Iterator for ArithmeticGeometricMean<T> {
    type Item = (T, T);

    fn next(&mut self) -> Option<Self::Item> {
        let two = T::one() + T::one();
        let a = (self.a + self.b) / two;
        let b = (self.a * self.b).sqrt();
        self.a = a;
        self.b = b;
        Some((a, b))
    }
}

/// Jacobi elliptic functions at one argument, with their derivatives with
/// respect to that argument.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JacobiElliptic<T> {
    pub sn: T,
    pub cn: T,
    pub dn: T,
    pub d_sn: T,
    pub d_cn: T,
    pub d_dn: T,
}

impl<T: Float> JacobiElliptic<T> {
    fn new(sn: T, cn: T, dn: T, k: T) -> Self {
        Self {
            sn,
            cn,
            dn,
            d_sn: cn * dn,
            d_cn: -sn * dn,
            d_dn: -k * k * sn * cn,
        }
    }
}

fn to_f64<T: Float>(value: T) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}

fn check_tolerance<T: Float>(tolerance: T) -> Result<T> {
    if tolerance.is_finite() && tolerance >= T::zero() {
        Ok(tolerance)
    } else {
        Err(Error::InvalidTolerance(to_f64(tolerance)))
    }
}

fn check_modulus<T: Float>(k: T) -> Result<T> {
    if k >= T::zero() && k < T::one() {
        Ok(k)
    } else {
        Err(Error::InvalidModulus(to_f64(k)))
    }
}

/// `√((1 − k)(1 + k))`, the complementary modulus.
fn complement<T: Float>(k: T) -> T {
    ((T::one() - k) * (T::one() + k)).sqrt()
}

/// Runs the AGM from `(a, b)` until `|a − b| ≤ tolerance`, or until the gap
/// stops shrinking once rounding dominates it.
fn agm_limit<T: Float>(a: T, b: T, tolerance: T, routine: &'static str) -> Result<T> {
    let mut gap = (a - b).abs();
    if gap <= tolerance {
        return Ok(a);
    }
    for (a, b) in ArithmeticGeometricMean::new(a, b).take(MAX_ITERATIONS) {
        let next = (a - b).abs();
        if next <= tolerance || next >= gap {
            return Ok(a);
        }
        gap = next;
    }
    warn!(routine, tolerance = to_f64(tolerance), "AGM did not converge");
    Err(Error::NonConvergence {
        routine,
        iterations: MAX_ITERATIONS,
    })
}

/// Complete elliptic integral of the first kind, `K(k) = π / (2·AGM(1, √(1 − k²)))`.
///
/// # Errors
///
/// Returns [`Error::InvalidModulus`] unless `0 ≤ k < 1`,
/// [`Error::InvalidTolerance`] for a negative tolerance, and
/// [`Error::NonConvergence`] if the AGM does not settle.
pub fn complete_elliptic_integral<T>(k: T, tolerance: T) -> Result<T>
where
    T: Float + FloatConst,
{
    let k = check_modulus(k)?;
    let tolerance = check_tolerance(tolerance)?;
    let two = T::one() + T::one();
    let mean = agm_limit(T::one(), complement(k), tolerance, "complete_elliptic_integral")?;
    Ok(T::PI() / (two * mean))
}

/// Complementary complete elliptic integral, `K'(k) = K(√(1 − k²)) = π / (2·AGM(1, k))`.
///
/// Evaluated directly from `k`, so it stays accurate for small moduli.
///
/// # Errors
///
/// Returns [`Error::InvalidModulus`] unless `0 < k ≤ 1`.
pub fn complementary_elliptic_integral<T>(k: T, tolerance: T) -> Result<T>
where
    T: Float + FloatConst,
{
    if !(k > T::zero() && k <= T::one()) {
        return Err(Error::InvalidModulus(to_f64(k)));
    }
    let tolerance = check_tolerance(tolerance)?;
    let two = T::one() + T::one();
    let mean = agm_limit(T::one(), k, tolerance, "complementary_elliptic_integral")?;
    Ok(T::PI() / (two * mean))
}

/// Jacobi elliptic functions `sn(u, k)`, `cn(u, k)`, `dn(u, k)` by descending
/// Landen transformation.
///
/// The modulus is reduced by `kₙ₊₁ = (1 − k'ₙ) / (1 + k'ₙ)` and the argument
/// by `uₙ₊₁ = uₙ / (1 + kₙ₊₁)` until it falls below `tolerance`, where the
/// functions reduce to `sin`, `cos` and 1. The ascent then applies
/// `sn = (1 + k₁)·s / (1 + k₁s²)`, `cn = c·d / (1 + k₁s²)` and
/// `dn = (1 − k₁s²) / (1 + k₁s²)` at each level.
///
/// # Errors
///
/// Returns [`Error::InvalidModulus`] unless `0 ≤ k < 1`,
/// [`Error::InvalidTolerance`] for a negative tolerance, and
/// [`Error::NonConvergence`] if the descent does not reach the tolerance.
pub fn landen_iterations<T: Float>(u: T, k: T, tolerance: T) -> Result<JacobiElliptic<T>> {
    let k = check_modulus(k)?;
    let tolerance = check_tolerance(tolerance)?;

    let mut moduli = Vec::new();
    let mut current = k;
    while current > tolerance {
        if moduli.len() == MAX_ITERATIONS {
            warn!(k = to_f64(k), "Landen descent did not converge");
            return Err(Error::NonConvergence {
                routine: "landen_iterations",
                iterations: MAX_ITERATIONS,
            });
        }
        let c = complement(current);
        current = (T::one() - c) / (T::one() + c);
        moduli.push(current);
    }

    let v = moduli.iter().fold(u, |v, &kn| v / (T::one() + kn));
    let mut sn = v.sin();
    let mut cn = v.cos();
    let mut dn = T::one();
    for &kn in moduli.iter().rev() {
        let ks2 = kn * sn * sn;
        let denominator = T::one() + ks2;
        let next_sn = (T::one() + kn) * sn / denominator;
        let next_cn = cn * dn / denominator;
        let next_dn = (T::one() - ks2) / denominator;
        sn = next_sn;
        cn = next_cn;
        dn = next_dn;
    }
    Ok(JacobiElliptic::new(sn, cn, dn, k))
}

/// Inverse of `sn(·, k)` at a complex point.
///
/// # Errors
///
/// Returns [`Error::InvalidModulus`] unless `0 ≤ k ≤ 1`, and
/// [`Error::NonConvergence`] if the modulus descent does not reach 0.
pub fn arc_jac_sn(w: Complex64, k: f64) -> Result<Complex64> {
    if !(0.0..=1.0).contains(&k) {
        return Err(Error::InvalidModulus(k));
    }
    #[allow(clippy::float_cmp)]
    let degenerate = k == 1.0;
    if degenerate {
        return Ok(w.atanh());
    }

    let mut moduli = vec![k];
    let mut current = k;
    while current != 0.0 {
        if moduli.len() > MAX_ITERATIONS {
            warn!(k, "Landen descent did not converge");
            return Err(Error::NonConvergence {
                routine: "arc_jac_sn",
                iterations: MAX_ITERATIONS,
            });
        }
        let c = complement(current);
        current = (1.0 - c) / (1.0 + c);
        moduli.push(current);
    }

    let quarter_period = moduli[1..].iter().map(|kn| 1.0 + kn).product::<f64>() * FRAC_PI_2;
    let wn = moduli.windows(2).fold(w, |wn, pair| {
        let x = wn * pair[0];
        let root = ((1.0 - x) * (1.0 + x)).sqrt();
        wn * 2.0 / ((1.0 + pair[1]) * (1.0 + root))
    });
    Ok(wn.asin() * (quarter_period / FRAC_PI_2))
}

/// Real inverse of `sc(·, k')` where `k'` is the complement of `k`,
/// computed as `Im(arc_jac_sn(i·w, k))`.
///
/// # Errors
///
/// Same as [`arc_jac_sn`].
pub fn arc_jac_sc1(w: f64, k: f64) -> Result<f64> {
    Ok(arc_jac_sn(Complex64::new(0.0, w), k)?.im)
}

/// Solves the degree equation `n·K'(k₁)/K(k₁) = K'(k)/K(k)` for the
/// selectivity modulus `k`, through the nome `q = exp(−π·K'(k₁) / (n·K(k₁)))`.
///
/// # Errors
///
/// Returns [`Error::InvalidModulus`] unless `0 < k₁ < 1`, or if the result
/// is not a modulus.
pub fn elliptic_degree(n: u16, k1: f64, tolerance: f64) -> Result<f64> {
    if !(k1 > 0.0 && k1 < 1.0) {
        return Err(Error::InvalidModulus(k1));
    }
    if n == 0 {
        return Err(Error::InvalidParameter("order must be positive".to_owned()));
    }
    let quarter = complete_elliptic_integral(k1, tolerance)?;
    let complementary = complementary_elliptic_integral(k1, tolerance)?;
    let q = (-PI * complementary / (quarter * f64::from(n))).exp();

    let numerator: f64 = (0..=7).map(|j| q.powi(j * (j + 1))).sum();
    let denominator = 1.0 + 2.0 * (1..=7).map(|j| q.powi(j * j)).sum::<f64>();
    let k = 4.0 * q.sqrt() * (numerator / denominator).powi(2);
    check_modulus(k)
}
