
//! Dense polynomials in one variable with `f64` coefficients.

use serde::{Serialize, Deserialize};

use std::fmt::{self, Display, Formatter};

/// A polynomial `a_0 + a_1 t + ... + a_d t^d`.
///
/// Coefficients are stored in ascending order of power, so
/// `coefficients()[k]` is the coefficient of `t^k`. The nominal
/// degree is kept even when the leading coefficient is zero, which
/// lets a Pade numerator of order `m` always report degree `m`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polynomial {
  coefficients: Vec<f64>,
}

/// [`Display`] adapter for a [`Polynomial`], printing terms in
/// descending order of power in terms of a named variable.
#[derive(Debug, Clone, Copy)]
pub struct PolynomialDisplay<'a> {
  polynomial: &'a Polynomial,
  variable: &'a str,
}

impl Polynomial {
  /// Constructs a polynomial from ascending coefficients. An empty
  /// vector is the zero polynomial of degree 0.
  pub fn new(mut coefficients: Vec<f64>) -> Self {
    if coefficients.is_empty() {
      coefficients.push(0.0);
    }
    Self { coefficients }
  }

  pub fn constant(value: f64) -> Self {
    Self::new(vec![value])
  }

  pub fn coefficients(&self) -> &[f64] {
    &self.coefficients
  }

  /// Coefficient of `t^k`, which is zero past the degree.
  pub fn coefficient(&self, k: usize) -> f64 {
    self.coefficients.get(k).copied().unwrap_or(0.0)
  }

  pub fn degree(&self) -> usize {
    self.coefficients.len() - 1
  }

  /// Coefficients from the highest power down to the constant term.
  pub fn descending(&self) -> impl Iterator<Item = f64> + '_ {
    self.coefficients.iter().rev().copied()
  }

  /// Evaluates by Horner's rule.
  pub fn evaluate(&self, t: f64) -> f64 {
    self.descending().fold(0.0, |acc, c| acc * t + c)
  }

  /// The first `order + 1` power series coefficients of
  /// `self / denominator` about `t = 0`, or `None` if the constant
  /// term of `denominator` is zero.
  pub fn series_quotient(&self, denominator: &Polynomial, order: usize) -> Option<Vec<f64>> {
    let q0 = denominator.coefficient(0);
    if q0 == 0.0 {
      return None;
    }
    let mut series: Vec<f64> = Vec::with_capacity(order + 1);
    for k in 0..=order {
      let correction: f64 = (1..=k.min(denominator.degree()))
        .map(|j| denominator.coefficient(j) * series[k - j])
        .sum();
      series.push((self.coefficient(k) - correction) / q0);
    }
    Some(series)
  }

  pub fn display_in<'a>(&'a self, variable: &'a str) -> PolynomialDisplay<'a> {
    PolynomialDisplay { polynomial: self, variable }
  }
}

impl Display for PolynomialDisplay<'_> {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    let mut first = true;
    for (power, coefficient) in self.polynomial.coefficients.iter().enumerate().rev() {
      if *coefficient == 0.0 {
        continue;
      }
      let magnitude = coefficient.abs();
      match (first, coefficient.is_sign_negative()) {
        (true, true) => write!(f, "-")?,
        (true, false) => {}
        (false, true) => write!(f, " - ")?,
        (false, false) => write!(f, " + ")?,
      }
      first = false;
      if power == 0 {
        write!(f, "{magnitude}")?;
        continue;
      }
      if magnitude != 1.0 {
        write!(f, "{magnitude}*")?;
      }
      if power == 1 {
        write!(f, "{}", self.variable)?;
      } else {
        write!(f, "{}^{power}", self.variable)?;
      }
    }
    if first {
      write!(f, "0")?;
    }
    Ok(())
  }
}
