//! Sparse polynomial expressions in a single symbolic variable.

use num_complex::Complex64;
use std::collections::BTreeMap;

/// Mapping from exponent to coefficient.
pub type TermMap = BTreeMap<i64, f64>;

const SUPERSCRIPT_DIGITS: [char; 10] = ['⁰', '¹', '²', '³', '⁴', '⁵', '⁶', '⁷', '⁸', '⁹'];
const SUPERSCRIPT_MINUS: char = '⁻';

/// One monomial `coefficient·variable^exponent`.
#[derive(Debug, Clone, PartialEq)]
pub struct Term {
    coefficient: f64,
    exponent: i64,
    variable: String,
}

impl Term {
    #[must_use]
    pub fn new(coefficient: f64, exponent: i64, variable: &str) -> Self {
        Self {
            coefficient,
            exponent,
            variable: variable.to_owned(),
        }
    }

    #[must_use]
    pub fn coefficient(&self) -> f64 {
        self.coefficient
    }

    #[must_use]
    pub fn exponent(&self) -> i64 {
        self.exponent
    }

    #[must_use]
    pub fn variable(&self) -> &str {
        &self.variable
    }

    #[allow(clippy::cast_possible_truncation)] // section exponents stay far below `i32::MAX`.
    fn evaluate(&self, s: f64) -> f64 {
        self.coefficient * s.powi(self.exponent as i32)
    }

    #[allow(clippy::cast_possible_truncation)]
    fn evaluate_complex(&self, s: Complex64) -> Complex64 {
        s.powi(self.exponent as i32) * self.coefficient
    }

    /// Renders the term. A leading term carries its own sign; any other term
    /// renders its magnitude and leaves the sign to the separator.
    fn render(&self, leading: bool) -> String {
        let value = if leading {
            self.coefficient
        } else {
            self.coefficient.abs()
        };
        if self.exponent == 0 {
            return format!("{}", value);
        }

        #[allow(clippy::float_cmp)]
        let coefficient = if value == 1.0 {
            String::new()
        } else if value == -1.0 {
            "-".to_owned()
        } else {
            format!("{}", value)
        };
        if self.exponent == 1 {
            format!("{}{}", coefficient, self.variable)
        } else {
            format!(
                "{}{}{}",
                coefficient,
                self.variable,
                superscript(&self.exponent.to_string())
            )
        }
    }
}

/// A polynomial numerator or denominator.
///
/// `terms` keeps the sparse input; `expansion` holds one coefficient for
/// every integer exponent between the lowest and the highest one;
/// `reduction` mirrors the sparse mapping the expression was built from.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Expression {
    variable: String,
    terms: Vec<Term>,
    expansion: TermMap,
    reduction: TermMap,
    representation: String,
}

impl Expression {
    /// Builds an expanded, sorted and rendered expression from a sparse
    /// mapping.
    #[must_use]
    pub fn new(mapping: &TermMap, variable: &str) -> Self {
        let mut expression = Self::default();
        expression.transform(mapping, variable);
        expression.expand();
        expression.build();
        expression
    }

    /// Builds the constant expression `value`.
    #[must_use]
    pub fn constant(value: f64, variable: &str) -> Self {
        let mut mapping = TermMap::new();
        mapping.insert(0, value);
        Self::new(&mapping, variable)
    }

    /// Replaces the terms with those of `mapping`.
    ///
    /// The cached rendering is cleared; call [`Expression::build`] to
    /// regenerate it.
    pub fn transform(&mut self, mapping: &TermMap, variable: &str) {
        self.variable = variable.to_owned();
        self.expansion = mapping.clone();
        self.reduction = mapping.clone();
        self.terms = mapping
            .iter()
            .map(|(&exponent, &coefficient)| Term::new(coefficient, exponent, variable))
            .collect();
        self.representation.clear();
    }

    /// Fills every missing exponent between the lowest and the highest one
    /// with a zero coefficient.
    pub fn expand(&mut self) {
        let exponents = self.terms.iter().map(Term::exponent);
        let (min, max) = match (exponents.clone().min(), exponents.max()) {
            (Some(min), Some(max)) => (min, max),
            _ => return,
        };
        for exponent in min..=max {
            self.expansion.entry(exponent).or_insert(0.0);
        }
    }

    /// Orders the terms by descending exponent with the constant term last.
    pub fn sort(&mut self) {
        let constant = self
            .terms
            .iter()
            .position(|term| term.exponent == 0)
            .map(|index| self.terms.remove(index));
        self.terms.sort_by(|a, b| b.exponent.cmp(&a.exponent));
        self.terms.extend(constant);
    }

    /// Sorts the terms and regenerates the cached rendering.
    pub fn build(&mut self) {
        self.sort();
        let mut text = String::new();
        for (index, term) in self
            .terms
            .iter()
            .filter(|term| term.coefficient != 0.0)
            .enumerate()
        {
            if index > 0 {
                text.push_str(if term.coefficient < 0.0 { " - " } else { " + " });
            }
            text.push_str(&term.render(index == 0));
        }
        if text.is_empty() {
            text.push('0');
        }
        self.representation = text;
    }

    #[must_use]
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    #[must_use]
    pub fn expansion(&self) -> &TermMap {
        &self.expansion
    }

    #[must_use]
    pub fn reduction(&self) -> &TermMap {
        &self.reduction
    }

    #[must_use]
    pub fn variable(&self) -> &str {
        &self.variable
    }

    /// The cached rendering, e.g. `s² + 5s + 6`.
    #[must_use]
    pub fn rendered(&self) -> &str {
        &self.representation
    }

    /// The coefficient of `exponent`, zero when absent.
    #[must_use]
    pub fn coefficient(&self, exponent: i64) -> f64 {
        self.expansion.get(&exponent).copied().unwrap_or(0.0)
    }

    /// The highest exponent present, if any.
    #[must_use]
    pub fn degree(&self) -> Option<i64> {
        self.terms.iter().map(Term::exponent).max()
    }

    /// Whether the expression renders as the bare constant 1; zero terms are
    /// ignored.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn is_unit_constant(&self) -> bool {
        let mut rendered = self.terms.iter().filter(|term| term.coefficient != 0.0);
        match (rendered.next(), rendered.next()) {
            (Some(term), None) => term.exponent == 0 && term.coefficient == 1.0,
            _ => false,
        }
    }

    /// Evaluates the expression at a real point.
    #[must_use]
    pub fn evaluate(&self, s: f64) -> f64 {
        self.terms.iter().map(|term| term.evaluate(s)).sum()
    }

    /// Evaluates the expression at a complex point.
    #[must_use]
    pub fn evaluate_complex(&self, s: Complex64) -> Complex64 {
        self.terms.iter().map(|term| term.evaluate_complex(s)).sum()
    }

    /// Renders `<label>(<variable>) = <expression>`; the label defaults to `H`.
    #[must_use]
    pub fn representation(&self, label: Option<&str>) -> String {
        format!(
            "{}({}) = {}",
            label.unwrap_or("H"),
            self.variable,
            self.representation
        )
    }
}

/// Multiplies two term sequences by direct convolution.
///
/// Every pair contributes the product of its coefficients at the sum of its
/// exponents; colliding exponents are summed.
#[must_use]
pub fn dot_product(p: &[Term], q: &[Term]) -> TermMap {
    let mut product = TermMap::new();
    for pv in p {
        for qv in q {
            *product.entry(pv.exponent + qv.exponent).or_insert(0.0) +=
                pv.coefficient * qv.coefficient;
        }
    }
    product
}

/// Maps the decimal digits (and a leading minus sign) of `exponent` to their
/// superscript glyphs. Other characters are dropped.
#[must_use]
pub fn superscript(exponent: &str) -> String {
    let mut power = String::new();
    if exponent.starts_with('-') {
        power.push(SUPERSCRIPT_MINUS);
    }
    power.extend(
        exponent
            .chars()
            .filter_map(|c| c.to_digit(10))
            .map(|digit| SUPERSCRIPT_DIGITS[digit as usize]),
    );
    power
}
