//! Minimum order estimates.

use super::{given, Approximation, FilterConfig, Response};
use crate::special::elliptic::{
    complementary_elliptic_integral, complete_elliptic_integral, TOLERANCE,
};
use crate::{Error, Result};
use std::f64::consts::PI;
use tracing::debug;

/// Bilinear pre-warp of `frequency` (Hz) to an analog angular frequency,
/// `(2/T)·tan(ωT/2)` with `ω = 2πf`.
#[must_use]
pub fn prewarp(frequency: f64, sampling_period: f64) -> f64 {
    2.0 / sampling_period * (PI * frequency * sampling_period).tan()
}

/// Estimates the minimum order meeting the ripple and band-edge figures of
/// `config`.
///
/// # Errors
///
/// Returns [`Error::UnsupportedApproximation`] for Bessel and Thiran,
/// [`Error::MissingParameter`] if a ripple figure or band edge is absent,
/// and [`Error::InvalidParameter`] if the figures admit no filter.
pub fn estimate_order(config: &FilterConfig) -> Result<u16> {
    let estimate: fn(f64, f64, f64) -> Result<u16> = match config.approximation {
        Approximation::Butterworth => butterworth_order,
        Approximation::Chebyshev | Approximation::InverseChebyshev => chebyshev_order,
        Approximation::Elliptic => elliptic_order,
        Approximation::Bessel | Approximation::Thiran => {
            return Err(Error::UnsupportedApproximation(
                config.approximation.to_string(),
            ))
        }
    };
    let epsilon_pass = config
        .epsilon_pass()
        .ok_or(Error::MissingParameter("passband ripple or attenuation"))?;
    let epsilon_stop = config
        .epsilon_stop()
        .ok_or(Error::MissingParameter("stopband ripple or attenuation"))?;
    let ratio = normalized_frequency(config)?;
    let order = estimate(epsilon_pass, epsilon_stop, ratio)?;
    debug!(
        approximation = %config.approximation,
        epsilon_pass,
        epsilon_stop,
        ratio,
        order,
        "estimated order"
    );
    Ok(order)
}

/// `⌈ln(εs/εp) / ln Ω⌉`.
///
/// # Errors
///
/// Returns [`Error::InvalidParameter`] unless `0 < εp < εs` and `Ω > 1`.
pub fn butterworth_order(epsilon_pass: f64, epsilon_stop: f64, ratio: f64) -> Result<u16> {
    check_figures(epsilon_pass, epsilon_stop, ratio)?;
    to_order((epsilon_stop / epsilon_pass).ln() / ratio.ln())
}

/// `⌈acosh(εs/εp) / acosh Ω⌉`, shared by both Chebyshev kinds.
///
/// # Errors
///
/// Returns [`Error::InvalidParameter`] unless `0 < εp < εs` and `Ω > 1`.
pub fn chebyshev_order(epsilon_pass: f64, epsilon_stop: f64, ratio: f64) -> Result<u16> {
    check_figures(epsilon_pass, epsilon_stop, ratio)?;
    to_order((epsilon_stop / epsilon_pass).acosh() / ratio.acosh())
}

/// `⌈K(1/Ω)·K'(εp/εs) / (K(εp/εs)·K'(1/Ω))⌉`.
///
/// # Errors
///
/// Returns [`Error::InvalidParameter`] unless `0 < εp < εs` and `Ω > 1`,
/// and any error of the elliptic integrals.
pub fn elliptic_order(epsilon_pass: f64, epsilon_stop: f64, ratio: f64) -> Result<u16> {
    check_figures(epsilon_pass, epsilon_stop, ratio)?;
    let discrimination = epsilon_pass / epsilon_stop;
    let selectivity = 1.0 / ratio;
    let numerator = complete_elliptic_integral(selectivity, TOLERANCE)?
        * complementary_elliptic_integral(discrimination, TOLERANCE)?;
    let denominator = complete_elliptic_integral(discrimination, TOLERANCE)?
        * complementary_elliptic_integral(selectivity, TOLERANCE)?;
    to_order(numerator / denominator)
}

fn check_figures(epsilon_pass: f64, epsilon_stop: f64, ratio: f64) -> Result<()> {
    if !(epsilon_pass > 0.0 && epsilon_pass < epsilon_stop && epsilon_stop.is_finite()) {
        return Err(Error::InvalidParameter(format!(
            "stopband ripple factor {} must exceed passband ripple factor {}",
            epsilon_stop, epsilon_pass
        )));
    }
    if !(ratio > 1.0 && ratio.is_finite()) {
        return Err(Error::InvalidParameter(format!(
            "normalized stopband frequency {} must exceed 1",
            ratio
        )));
    }
    Ok(())
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // range checked first.
fn to_order(estimate: f64) -> Result<u16> {
    let order = estimate.ceil().max(1.0);
    if order.is_finite() && order <= f64::from(u16::MAX) {
        Ok(order as u16)
    } else {
        Err(Error::InvalidParameter(format!(
            "order estimate {} is out of range",
            estimate
        )))
    }
}

/// Ratio of the stopband to the passband edge of the equivalent low-pass
/// prototype.
///
/// Band responses take the tighter of the two stopband edges.
///
/// # Errors
///
/// Returns [`Error::MissingParameter`] if an edge the response needs is
/// absent, and [`Error::InvalidParameter`] if the ratio does not exceed 1.
pub fn normalized_frequency(config: &FilterConfig) -> Result<f64> {
    let period = config.sampling_period()?;
    let angular = |frequency: f64| match period {
        Some(t) => prewarp(frequency, t),
        None => 2.0 * PI * frequency,
    };
    let edge = |value: Option<f64>, name: &'static str| {
        given(value)
            .map(&angular)
            .ok_or(Error::MissingParameter(name))
    };

    let ratio = match config.response {
        Response::Lowpass | Response::Highpass => {
            let pass = edge(
                given(config.cutoff_frequency).or(config.lower_passband_edge),
                "cutoff frequency",
            )?;
            let stop = edge(
                given(config.lower_stopband_edge).or(config.upper_stopband_edge),
                "stopband edge frequency",
            )?;
            if config.response == Response::Lowpass {
                stop / pass
            } else {
                pass / stop
            }
        }
        Response::Bandpass | Response::Bandstop => {
            let lower = edge(config.lower_passband_edge, "lower passband edge frequency")?;
            let upper = edge(config.upper_passband_edge, "upper passband edge frequency")?;
            let bandwidth = upper - lower;
            let center_squared = match given(config.center_frequency) {
                Some(center) => angular(center).powi(2),
                None => lower * upper,
            };
            let stops = [config.lower_stopband_edge, config.upper_stopband_edge]
                .iter()
                .filter_map(|&value| given(value).map(&angular))
                .collect::<Vec<_>>();
            if stops.is_empty() {
                return Err(Error::MissingParameter("stopband edge frequency"));
            }
            stops
                .into_iter()
                .map(|stop| {
                    let offset = (stop * stop - center_squared).abs();
                    if config.response == Response::Bandpass {
                        offset / (stop * bandwidth)
                    } else {
                        stop * bandwidth / offset
                    }
                })
                .fold(f64::INFINITY, f64::min)
        }
    };
    debug!(response = %config.response, ratio, "normalized stopband frequency");

    if ratio > 1.0 && ratio.is_finite() {
        Ok(ratio)
    } else {
        Err(Error::InvalidParameter(format!(
            "normalized stopband frequency {} must exceed 1",
            ratio
        )))
    }
}
