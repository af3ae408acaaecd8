//! Analog prototype design for classical IIR filter approximations.
//!
//! The crate estimates the minimum order of Butterworth, Chebyshev, inverse
//! Chebyshev and elliptic (Cauer) low-pass prototypes, synthesizes them as a
//! cascade of first- and second-order sections, and keeps the result as a
//! rational function of the Laplace variable that can be evaluated and
//! rendered as text.

pub mod polynomial;
pub mod signal;
pub mod special;

pub use polynomial::{Expression, Polynomial, PolynomialSpec, Term, TermMap};
pub use signal::filter::{design_filter, Approximation, Domain, FilterConfig, Response};

use thiserror::Error;

/// Result type for filter design operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The error type for filter design and the numerical routines behind it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Modulus outside `[0, 1)`.
    #[error("elliptic modulus {0} is outside [0, 1)")]
    InvalidModulus(f64),

    /// Negative or non-finite convergence tolerance.
    #[error("tolerance {0} is not a non-negative finite number")]
    InvalidTolerance(f64),

    /// An iteration hit its step limit before reaching the tolerance.
    #[error("{routine} did not converge within {iterations} iterations")]
    NonConvergence {
        routine: &'static str,
        iterations: usize,
    },

    /// Approximation tag that cannot be estimated or synthesized.
    #[error("unsupported approximation: {0}")]
    UnsupportedApproximation(String),

    /// Response tag outside lowpass, highpass, bandpass and bandstop.
    #[error("unsupported response: {0}")]
    UnsupportedResponse(String),

    /// A field required by the requested design is absent.
    #[error("missing parameter: {0}")]
    MissingParameter(&'static str),

    /// A field is present but its value cannot be used.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}
