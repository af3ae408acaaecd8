//! Filters.

pub mod design;
pub mod order;

use crate::{Error, Polynomial, Result};
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Time domain of the final filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Domain {
    Analogue,
    Digital,
}

/// Frequency response shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Response {
    Lowpass,
    Highpass,
    Bandpass,
    Bandstop,
}

/// Approximation family.
///
/// `Bessel` and `Thiran` are recognized tags without an order estimate or a
/// prototype; both are rejected with [`Error::UnsupportedApproximation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Approximation {
    Butterworth,
    Chebyshev,
    InverseChebyshev,
    Elliptic,
    Bessel,
    Thiran,
}

impl Default for Domain {
    fn default() -> Self {
        Self::Analogue
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::Lowpass
    }
}

impl Default for Approximation {
    fn default() -> Self {
        Self::Butterworth
    }
}

impl FromStr for Domain {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "analogue" | "analog" => Ok(Self::Analogue),
            "digital" => Ok(Self::Digital),
            _ => Err(Error::InvalidParameter(format!("unknown domain `{}`", s))),
        }
    }
}

impl FromStr for Response {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "lpf" | "lowpass" => Ok(Self::Lowpass),
            "hpf" | "highpass" => Ok(Self::Highpass),
            "bpf" | "bandpass" => Ok(Self::Bandpass),
            "bsf" | "brf" | "notch" | "bandstop" => Ok(Self::Bandstop),
            _ => Err(Error::UnsupportedResponse(s.to_owned())),
        }
    }
}

impl FromStr for Approximation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "butterworth" => Ok(Self::Butterworth),
            "chebyshev" | "chebyshev type 1" | "chebyshev type i" => Ok(Self::Chebyshev),
            "inverse chebyshev" | "chebyshev type 2" | "chebyshev type ii" => {
                Ok(Self::InverseChebyshev)
            }
            "elliptic" | "cauer" | "zolotarev" => Ok(Self::Elliptic),
            "bessel" => Ok(Self::Bessel),
            "thiran" => Ok(Self::Thiran),
            _ => Err(Error::UnsupportedApproximation(s.to_owned())),
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Analogue => "analogue",
            Self::Digital => "digital",
        })
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Lowpass => "lpf",
            Self::Highpass => "hpf",
            Self::Bandpass => "bpf",
            Self::Bandstop => "bsf",
        })
    }
}

impl fmt::Display for Approximation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Butterworth => "butterworth",
            Self::Chebyshev => "chebyshev",
            Self::InverseChebyshev => "inverse chebyshev",
            Self::Elliptic => "elliptic",
            Self::Bessel => "bessel",
            Self::Thiran => "thiran",
        })
    }
}

macro_rules! string_conversions {
    ($($tag:ty),*) => {
        $(
            impl TryFrom<String> for $tag {
                type Error = Error;

                fn try_from(s: String) -> Result<Self> {
                    s.parse()
                }
            }

            impl From<$tag> for String {
                fn from(tag: $tag) -> String {
                    tag.to_string()
                }
            }
        )*
    };
}

string_conversions!(Domain, Response, Approximation);

/// Normalized filter specification handed over by the intake layer.
///
/// Frequencies are in hertz, attenuations in decibels and ripples are
/// linear ripple factors. Values are taken as already consistent; absent
/// or non-positive figures count as not given.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub domain: Domain,
    pub response: Response,
    pub approximation: Approximation,
    pub order: Option<u16>,
    pub passband_ripple: Option<f64>,
    pub stopband_ripple: Option<f64>,
    pub passband_attenuation: Option<f64>,
    pub stopband_attenuation: Option<f64>,
    pub cutoff_frequency: Option<f64>,
    pub lower_passband_edge: Option<f64>,
    pub upper_passband_edge: Option<f64>,
    pub lower_stopband_edge: Option<f64>,
    pub upper_stopband_edge: Option<f64>,
    pub bandwidth: Option<f64>,
    pub center_frequency: Option<f64>,
    pub sampling_frequency: Option<f64>,
}

impl FilterConfig {
    /// Passband ripple factor εp, if the passband is specified.
    #[must_use]
    pub fn epsilon_pass(&self) -> Option<f64> {
        ripple_factor(self.passband_ripple, self.passband_attenuation)
    }

    /// Stopband ripple factor εs, if the stopband is specified.
    #[must_use]
    pub fn epsilon_stop(&self) -> Option<f64> {
        ripple_factor(self.stopband_ripple, self.stopband_attenuation)
    }

    /// Sampling period of a digital design.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingParameter`] for a digital design without a
    /// sampling frequency.
    pub fn sampling_period(&self) -> Result<Option<f64>> {
        match (self.domain, given(self.sampling_frequency)) {
            (Domain::Analogue, _) => Ok(None),
            (Domain::Digital, Some(fs)) => Ok(Some(1.0 / fs)),
            (Domain::Digital, None) => Err(Error::MissingParameter("sampling frequency")),
        }
    }
}

/// Treats absent, non-positive and non-finite figures alike.
pub(crate) fn given(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

/// A linear ripple figure is ε itself; an attenuation `A` in decibels gives
/// `ε = √(10^(A/10) − 1)`.
#[must_use]
pub fn ripple_factor(ripple: Option<f64>, attenuation: Option<f64>) -> Option<f64> {
    given(ripple).or_else(|| given(attenuation).map(|a| (10_f64.powf(a / 10.0) - 1.0).sqrt()))
}

/// Designs the analog low-pass prototype for `config`.
///
/// The order is estimated from the ripple and band-edge figures unless the
/// configuration fixes it; an explicit order of 0 counts as absent.
///
/// # Errors
///
/// Returns [`Error::UnsupportedApproximation`] for families without a
/// prototype, [`Error::MissingParameter`] when a figure the design needs is
/// absent, and any error of the order estimate or the elliptic functions.
pub fn design_filter(config: &FilterConfig) -> Result<Polynomial> {
    let order = match config.order.filter(|&n| n > 0) {
        Some(n) => n,
        None => order::estimate_order(config)?,
    };
    debug!(
        approximation = %config.approximation,
        response = %config.response,
        order,
        "designing analog prototype"
    );
    design::analog_prototype(
        config.approximation,
        order,
        config.epsilon_pass(),
        config.epsilon_stop(),
    )
}
