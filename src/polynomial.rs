//! Rational functions of a single symbolic variable.

mod expression;

pub use expression::{dot_product, superscript, Expression, Term, TermMap};

use num_complex::Complex64;
use std::cmp::max;
use std::fmt;
use std::ops::Mul;

/// Explicit construction input for a [`Polynomial`].
///
/// An empty numerator is the constant 1. The denominator is read only when
/// `denominator_explicit` is set, and an explicit but empty denominator is
/// the constant 1 as well, never 0.
#[derive(Debug, Clone, PartialEq)]
pub struct PolynomialSpec {
    pub variable: String,
    pub numerator: TermMap,
    pub denominator: TermMap,
    pub denominator_explicit: bool,
}

impl PolynomialSpec {
    /// An empty specification in `variable`.
    #[must_use]
    pub fn new(variable: &str) -> Self {
        Self {
            variable: variable.to_owned(),
            numerator: TermMap::new(),
            denominator: TermMap::new(),
            denominator_explicit: false,
        }
    }

    /// Sets the numerator from `(exponent, coefficient)` pairs.
    #[must_use]
    pub fn numerator<I>(mut self, terms: I) -> Self
    where
        I: IntoIterator<Item = (i64, f64)>,
    {
        self.numerator = terms.into_iter().collect();
        self
    }

    /// Sets the denominator from `(exponent, coefficient)` pairs.
    #[must_use]
    pub fn denominator<I>(mut self, terms: I) -> Self
    where
        I: IntoIterator<Item = (i64, f64)>,
    {
        self.denominator = terms.into_iter().collect();
        self.denominator_explicit = true;
        self
    }
}

impl Default for PolynomialSpec {
    fn default() -> Self {
        Self::new("s")
    }
}

/// A transfer function `numerator / denominator`.
#[derive(Debug, Clone, PartialEq)]
pub struct Polynomial {
    numerator: Expression,
    denominator: Expression,
    transfer_function: String,
}

impl Polynomial {
    #[must_use]
    pub fn new(spec: &PolynomialSpec) -> Self {
        let numerator = unpack(&spec.numerator, &spec.variable);
        let denominator = if spec.denominator_explicit {
            unpack(&spec.denominator, &spec.variable)
        } else {
            Expression::constant(1.0, &spec.variable)
        };
        Self::from_expressions(numerator, denominator)
    }

    /// The constant transfer function `gain`.
    #[must_use]
    pub fn constant(gain: f64, variable: &str) -> Self {
        Self::from_expressions(
            Expression::constant(gain, variable),
            Expression::constant(1.0, variable),
        )
    }

    fn from_expressions(numerator: Expression, denominator: Expression) -> Self {
        let mut polynomial = Self {
            numerator,
            denominator,
            transfer_function: String::new(),
        };
        polynomial.build();
        polynomial
    }

    #[must_use]
    pub fn numerator(&self) -> &Expression {
        &self.numerator
    }

    #[must_use]
    pub fn denominator(&self) -> &Expression {
        &self.denominator
    }

    #[must_use]
    pub fn variable(&self) -> &str {
        self.numerator.variable()
    }

    /// The cached fraction rendering without a label.
    #[must_use]
    pub fn transfer_function(&self) -> &str {
        &self.transfer_function
    }

    /// Regenerates the fraction rendering from the operand renderings.
    fn build(&mut self) {
        let numerator = self.numerator.rendered();
        if self.denominator.is_unit_constant() {
            self.transfer_function = numerator.to_owned();
            return;
        }

        let denominator = self.denominator.rendered();
        let numerator_len = numerator.chars().count();
        let denominator_len = denominator.chars().count();
        let width = max(numerator_len, denominator_len) + 4;
        let rule = "-".repeat(width);
        self.transfer_function = if numerator_len >= denominator_len {
            format!(
                "  {}\n{}\n{}",
                numerator,
                rule,
                centered(denominator, denominator_len, width)
            )
        } else {
            format!(
                "{}\n{}\n  {}",
                centered(numerator, numerator_len, width),
                rule,
                denominator
            )
        };
    }

    /// Multiplies numerators and denominators by convolution.
    ///
    /// An operand with an empty numerator or denominator leaves `self`
    /// unchanged.
    #[must_use]
    pub fn multiply(self, other: &Self) -> Self {
        if self.numerator.terms().is_empty()
            || self.denominator.terms().is_empty()
            || other.numerator.terms().is_empty()
            || other.denominator.terms().is_empty()
        {
            return self;
        }

        let variable = self.denominator.variable();
        let numerator = Expression::new(
            &dot_product(self.numerator.terms(), other.numerator.terms()),
            variable,
        );
        let denominator = Expression::new(
            &dot_product(self.denominator.terms(), other.denominator.terms()),
            variable,
        );
        Self::from_expressions(numerator, denominator)
    }

    /// Multiplies the transfer function by a constant gain.
    #[must_use]
    pub fn scale(self, gain: f64) -> Self {
        let factor = Self::constant(gain, self.variable());
        self.multiply(&factor)
    }

    /// Evaluates `numerator(s) / denominator(s)`.
    ///
    /// Returns 0 when the denominator vanishes; callers that care about poles
    /// must evaluate the denominator themselves.
    #[must_use]
    pub fn evaluate(&self, s: f64) -> f64 {
        let denominator = self.denominator.evaluate(s);
        if denominator == 0.0 {
            return 0.0;
        }
        self.numerator.evaluate(s) / denominator
    }

    /// Evaluates the transfer function on the imaginary axis, `H(jω)`.
    ///
    /// Returns 0 at a pole, like [`Polynomial::evaluate`]. The expanded
    /// coefficients are summed directly, which is ill-conditioned when many
    /// roots cluster near the axis, as in high-order elliptic prototypes.
    #[must_use]
    pub fn frequency_response(&self, omega: f64) -> Complex64 {
        let s = Complex64::new(0.0, omega);
        let denominator = self.denominator.evaluate_complex(s);
        if denominator.norm_sqr() == 0.0 {
            return Complex64::new(0.0, 0.0);
        }
        self.numerator.evaluate_complex(s) / denominator
    }

    /// Renders `<label>(<variable>) = <fraction>` with the label on the rule
    /// line; the label defaults to `H`.
    #[must_use]
    pub fn representation(&self, label: Option<&str>) -> String {
        let head = format!("{}({}) = ", label.unwrap_or("H"), self.variable());
        if self.denominator.is_unit_constant() {
            return format!("{}{}", head, self.transfer_function);
        }

        let indent = " ".repeat(head.chars().count());
        let mut lines = self.transfer_function.lines();
        let upper = lines.next().unwrap_or_default();
        let rule = lines.next().unwrap_or_default();
        let lower = lines.next().unwrap_or_default();
        format!(
            "{}{}\n{}{}\n{}{}",
            indent, upper, head, rule, indent, lower
        )
    }
}

impl Default for Polynomial {
    fn default() -> Self {
        Self::new(&PolynomialSpec::default())
    }
}

impl Mul<&Polynomial> for Polynomial {
    type Output = Polynomial;

    fn mul(self, rhs: &Polynomial) -> Polynomial {
        self.multiply(rhs)
    }
}

impl Mul for Polynomial {
    type Output = Polynomial;

    fn mul(self, rhs: Polynomial) -> Polynomial {
        self.multiply(&rhs)
    }
}

impl fmt::Display for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.representation(None))
    }
}

fn unpack(mapping: &TermMap, variable: &str) -> Expression {
    if mapping.is_empty() {
        Expression::constant(1.0, variable)
    } else {
        Expression::new(mapping, variable)
    }
}

fn centered(text: &str, len: usize, width: usize) -> String {
    format!("{}{}", " ".repeat((width - len) / 2), text)
}

#[cfg(test)]
mod test {
    use super::{Polynomial, PolynomialSpec};
    use approx::assert_abs_diff_eq;

    fn section(terms: &[(i64, f64)]) -> Polynomial {
        Polynomial::new(
            &PolynomialSpec::new("s")
                .numerator(vec![(0, 1.0)])
                .denominator(terms.iter().copied()),
        )
    }

    #[test]
    fn first_order_rendering() {
        let p = section(&[(0, 1.0), (1, 1.0)]);
        assert_eq!(p.numerator().rendered(), "1");
        assert_eq!(p.denominator().rendered(), "s + 1");
        assert_eq!(p.transfer_function(), "    1\n---------\n  s + 1");
        assert_eq!(
            p.representation(None),
            "           1\nH(s) = ---------\n         s + 1"
        );
    }

    #[test]
    fn longer_numerator_goes_on_top() {
        let p = Polynomial::new(
            &PolynomialSpec::new("s")
                .numerator(vec![(0, 3.72), (2, -4.09)])
                .denominator(vec![(1, 2.0)]),
        );
        assert_eq!(p.numerator().rendered(), "-4.09s² + 3.72");
        assert_eq!(
            p.transfer_function(),
            "  -4.09s² + 3.72\n------------------\n        2s"
        );
        assert_eq!(
            p.representation(Some("G")),
            "         -4.09s² + 3.72\nG(s) = ------------------\n               2s"
        );
    }

    #[test]
    fn defaults() {
        let p = Polynomial::new(&PolynomialSpec::new("s"));
        assert_eq!(p.numerator().rendered(), "1");
        assert!(p.denominator().is_unit_constant());
        assert_eq!(p.transfer_function(), "1");
        assert_eq!(p.to_string(), "H(s) = 1");

        let p = Polynomial::new(&PolynomialSpec::new("s").denominator(Vec::new()));
        assert!(p.denominator().is_unit_constant());

        let p = Polynomial::new(
            &PolynomialSpec::new("s")
                .numerator(vec![(1, 2.0)])
                .denominator(vec![(0, 2.0)]),
        );
        assert_eq!(p.transfer_function(), "  2s\n------\n  2");
    }

    #[test]
    fn zero_terms_do_not_block_collapse() {
        let p = Polynomial::new(
            &PolynomialSpec::new("s")
                .numerator(vec![(0, 1.0), (1, 1.0)])
                .denominator(vec![(0, 1.0), (1, 0.0), (2, 0.0)]),
        );
        assert!(p.denominator().is_unit_constant());
        assert_eq!(p.transfer_function(), "s + 1");
        assert_eq!(p.representation(None), "H(s) = s + 1");

        // (s + 1)(1 − s) cancels its first-order term but is not constant.
        let p = section(&[(0, 1.0), (1, 1.0)]) * section(&[(0, 1.0), (1, -1.0)]);
        assert_eq!(p.denominator().rendered(), "-s² + 1");
        assert!(!p.denominator().is_unit_constant());
    }

    #[test]
    fn multiply_first_order_sections() {
        let p = section(&[(0, 2.0), (1, 1.0)]) * section(&[(0, 3.0), (1, 1.0)]);
        assert_abs_diff_eq!(p.denominator().coefficient(0), 6.0);
        assert_abs_diff_eq!(p.denominator().coefficient(1), 5.0);
        assert_abs_diff_eq!(p.denominator().coefficient(2), 1.0);
        assert_eq!(p.denominator().rendered(), "s² + 5s + 6");
        assert_eq!(p.numerator().rendered(), "1");
    }

    #[test]
    fn multiply_keeps_operand() {
        let q = section(&[(0, 3.0), (1, 1.0)]);
        let before = q.clone();
        let _ = section(&[(0, 2.0), (1, 1.0)]).multiply(&q);
        assert_eq!(q, before);
    }

    #[test]
    fn scale() {
        let p = section(&[(0, 2.0), (1, 1.0)]).scale(2.0);
        assert_eq!(p.numerator().rendered(), "2");
        assert_abs_diff_eq!(p.evaluate(0.0), 1.0);
    }

    #[test]
    fn evaluate_saturates_at_pole() {
        let p = section(&[(0, 2.0), (1, 1.0)]);
        assert_abs_diff_eq!(p.evaluate(0.0), 0.5);
        assert_abs_diff_eq!(p.evaluate(-2.0), 0.0);
    }

    #[test]
    fn frequency_response() {
        let p = section(&[(0, 1.0), (1, 1.0)]);
        let h = p.frequency_response(1.0);
        assert_abs_diff_eq!(h.norm(), std::f64::consts::FRAC_1_SQRT_2, epsilon = 1e-12);
        assert_abs_diff_eq!(h.arg(), -std::f64::consts::FRAC_PI_4, epsilon = 1e-12);
    }
}
