
//! Pade rational approximations built from Taylor coefficients.

use crate::error::{Error, non_negative};
use crate::expr::Expr;
use crate::expr::number::Number;
use crate::expr::var::Var;
use crate::poly::Polynomial;
use crate::sampling::{Approximant, Sampled};
use crate::taylor::{CoefficientMethod, TaylorApproximation, shifted_variable};
use crate::util::matrix::{Matrix, MatrixIndex, ReducibleMatrix};

use log::debug;
use once_cell::sync::OnceCell;

use std::fmt::{self, Display, Formatter};

/// Pivots at or below this fraction of the largest entry of the Pade
/// system count as zero.
pub const SINGULAR_TOLERANCE: f64 = 1e-12;

/// A rational function `P(t) / Q(t)` in `t = x - point`, with
/// `deg P = order_m`, `deg Q = order_n` and `Q(0) = 1`, whose power
/// series agrees with the expanded function through `t^(order_m + order_n)`.
///
/// The approximation may have poles. Evaluating at or near a root of
/// `Q` yields infinity or NaN rather than an error.
#[derive(Debug, Clone)]
pub struct PadeApproximation {
  variable: Var,
  function: Expr,
  order_m: usize,
  order_n: usize,
  point: Number,
  numerator: Polynomial,
  denominator: Polynomial,
}

fn series_term(series: &[f64], k: i64) -> f64 {
  usize::try_from(k).ok()
    .and_then(|k| series.get(k))
    .copied()
    .unwrap_or(0.0)
}

/// Solves the Pade matching conditions
///
/// ```text
/// Σ_{j=0..n} q_j c_{k-j} = p_k    for k = 0..=m
/// Σ_{j=0..n} q_j c_{k-j} = 0      for k = m+1..=m+n
/// ```
///
/// with `q_0 = 1`. The second block is an `n x n` Toeplitz system for
/// `q_1..q_n`; the first then gives `p` directly.
fn solve_pade(series: &[f64], order_m: usize, order_n: usize) -> Result<(Polynomial, Polynomial), Error> {
  let (m, n) = (order_m as i64, order_n as i64);
  let mut system = Matrix::from_generator(order_n, order_n + 1, |MatrixIndex { y, x }| {
    let (y, x) = (y as i64, x as i64);
    if x == n {
      - series_term(series, m + 1 + y)
    } else {
      series_term(series, m + y - x)
    }
  });
  let solution = ReducibleMatrix::new(&mut system)
    .solve_augmented(SINGULAR_TOLERANCE)
    .map_err(|err| {
      debug!("Pade system (M={order_m}, N={order_n}) rejected: {err}");
      Error::SingularSystem { order_m, order_n }
    })?;

  let mut denominator = Vec::with_capacity(order_n + 1);
  denominator.push(1.0);
  denominator.extend(solution.values);
  let numerator = (0..=order_m)
    .map(|k| {
      (0..=k.min(order_n))
        .map(|j| denominator[j] * series_term(series, (k - j) as i64))
        .sum()
    })
    .collect();
  debug!("Pade system (M={order_m}, N={order_n}) solved, det = {}, q = {denominator:?}", solution.determinant);
  Ok((Polynomial::new(numerator), Polynomial::new(denominator)))
}

impl PadeApproximation {
  /// Builds the `(order_m, order_n)` approximation from an existing
  /// Taylor expansion, which must have degree at least
  /// `order_m + order_n`. Higher coefficients are ignored.
  pub fn from_taylor(taylor: &TaylorApproximation, order_m: usize, order_n: usize) -> Result<Self, Error> {
    let total = order_m + order_n;
    if total > taylor.degree() {
      return Err(Error::InvalidParameter {
        name: "order_m + order_n",
        value: i64::try_from(total).unwrap_or(i64::MAX),
      });
    }
    let series = &taylor.coefficients_f64()[..=total];
    let (numerator, denominator) = solve_pade(series, order_m, order_n)?;
    Ok(Self {
      variable: taylor.variable().clone(),
      function: taylor.function().clone(),
      order_m,
      order_n,
      point: taylor.point().clone(),
      numerator,
      denominator,
    })
  }

  pub fn variable(&self) -> &Var {
    &self.variable
  }

  pub fn function(&self) -> &Expr {
    &self.function
  }

  pub fn order_m(&self) -> usize {
    self.order_m
  }

  pub fn order_n(&self) -> usize {
    self.order_n
  }

  pub fn point(&self) -> &Number {
    &self.point
  }

  pub fn numerator(&self) -> &Polynomial {
    &self.numerator
  }

  pub fn denominator(&self) -> &Polynomial {
    &self.denominator
  }

  /// The first `order + 1` power series coefficients of `P / Q` about
  /// the expansion point.
  pub fn series_coefficients(&self, order: usize) -> Vec<f64> {
    self.numerator.series_quotient(&self.denominator, order)
      .unwrap() // unwrap: the denominator is normalized so that q_0 = 1
  }

  pub fn evaluate<S: Sampled>(&self, xs: S) -> S::Output {
    xs.map_samples(|x| self.evaluate_at(x))
  }
}

impl Approximant for PadeApproximation {
  fn evaluate_at(&self, x: f64) -> f64 {
    let t = x - self.point.to_f64_or_nan();
    self.numerator.evaluate(t) / self.denominator.evaluate(t)
  }
}

impl Display for PadeApproximation {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    let shifted = shifted_variable(&self.variable, &self.point);
    let label = if matches!(shifted, Expr::Atom(_)) { shifted.to_string() } else { format!("({shifted})") };
    write!(
      f,
      "Pade Approximation (M={}, N={}) at {}={}: ({}) / ({})",
      self.order_m,
      self.order_n,
      self.variable,
      self.point,
      self.numerator.display_in(&label),
      self.denominator.display_in(&label),
    )
  }
}

/// Pade approximation of a function built over the engine's own
/// variable. The approximation is computed at most once.
#[derive(Debug)]
pub struct PadeEngine {
  variable: Var,
  function: Expr,
  order_m: usize,
  order_n: usize,
  point: Number,
  method: CoefficientMethod,
  approximation: OnceCell<PadeApproximation>,
}

impl PadeEngine {
  /// Applies `function_ctor` to a fresh variable `x` to obtain the
  /// function to approximate. Fails if either order is negative.
  pub fn new<F>(function_ctor: F, order_m: i64, order_n: i64, point: impl Into<Number>) -> Result<Self, Error>
  where F: FnOnce(Expr) -> Expr {
    let order_m = non_negative("order_m", order_m)?;
    let order_n = non_negative("order_n", order_n)?;
    let variable = Var::default();
    let function = function_ctor(Expr::from(variable.clone()));
    Ok(Self {
      variable,
      function,
      order_m,
      order_n,
      point: point.into(),
      method: CoefficientMethod::default(),
      approximation: OnceCell::new(),
    })
  }

  /// Chooses how the underlying Taylor coefficients are found.
  pub fn with_method(mut self, method: CoefficientMethod) -> Self {
    self.method = method;
    self
  }

  pub fn method(&self) -> CoefficientMethod {
    self.method
  }

  /// Builds an approximation directly from precomputed Taylor
  /// coefficients, without an engine.
  pub fn from_taylor(taylor: &TaylorApproximation, order_m: i64, order_n: i64) -> Result<PadeApproximation, Error> {
    let order_m = non_negative("order_m", order_m)?;
    let order_n = non_negative("order_n", order_n)?;
    PadeApproximation::from_taylor(taylor, order_m, order_n)
  }

  pub fn variable(&self) -> &Var {
    &self.variable
  }

  pub fn function(&self) -> &Expr {
    &self.function
  }

  pub fn order_m(&self) -> usize {
    self.order_m
  }

  pub fn order_n(&self) -> usize {
    self.order_n
  }

  pub fn point(&self) -> &Number {
    &self.point
  }

  /// Expands the function to degree `order_m + order_n` and solves for
  /// the rational approximation, or returns the result of an earlier
  /// call.
  pub fn compute_coefficients(&self) -> Result<&PadeApproximation, Error> {
    self.approximation.get_or_try_init(|| {
      let taylor = TaylorApproximation::expand(
        self.function.clone(),
        self.variable.clone(),
        self.point.clone(),
        self.order_m + self.order_n,
        self.method,
      )?;
      PadeApproximation::from_taylor(&taylor, self.order_m, self.order_n)
    })
  }

  pub fn is_computed(&self) -> bool {
    self.approximation.get().is_some()
  }

  fn computed(&self, operation: &'static str) -> Result<&PadeApproximation, Error> {
    self.approximation.get().ok_or(Error::UninitializedState(operation))
  }

  pub fn approximation(&self) -> Result<&PadeApproximation, Error> {
    self.computed("approximation")
  }

  pub fn numerator(&self) -> Result<&Polynomial, Error> {
    Ok(self.computed("numerator")?.numerator())
  }

  pub fn denominator(&self) -> Result<&Polynomial, Error> {
    Ok(self.computed("denominator")?.denominator())
  }

  pub fn evaluate<S: Sampled>(&self, xs: S) -> Result<S::Output, Error> {
    Ok(self.computed("evaluate")?.evaluate(xs))
  }

  pub fn describe(&self) -> Result<String, Error> {
    Ok(self.computed("describe")?.to_string())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  use approx::assert_abs_diff_eq;

  fn sin(x: Expr) -> Expr {
    Expr::call("sin", vec![x])
  }

  #[test]
  fn test_solve_sine_three_two() {
    let series = [0.0, 1.0, 0.0, -1.0 / 6.0, 0.0, 1.0 / 120.0];
    let (numerator, denominator) = solve_pade(&series, 3, 2).unwrap();
    assert_abs_diff_eq!(numerator.coefficients(), [0.0, 1.0, 0.0, -7.0 / 60.0].as_slice(), epsilon = 1e-14);
    assert_abs_diff_eq!(denominator.coefficients(), [1.0, 0.0, 1.0 / 20.0].as_slice(), epsilon = 1e-14);
  }

  #[test]
  fn test_solve_geometric_series() {
    // 1 / (1 - t) is its own [0/1] approximant.
    let (numerator, denominator) = solve_pade(&[1.0, 1.0], 0, 1).unwrap();
    assert_eq!(numerator.coefficients(), &[1.0]);
    assert_eq!(denominator.coefficients(), &[1.0, -1.0]);
  }

  #[test]
  fn test_solve_zero_series_is_singular() {
    let err = solve_pade(&[0.0; 5], 2, 2).unwrap_err();
    assert!(matches!(err, Error::SingularSystem { order_m: 2, order_n: 2 }));
  }

  #[test]
  fn test_trivial_order() {
    let engine = PadeEngine::new(|x| Expr::call("exp", vec![x]), 0, 0, 0).unwrap();
    let approximation = engine.compute_coefficients().unwrap();
    assert_eq!(approximation.numerator().coefficients(), &[1.0]);
    assert_eq!(approximation.denominator().coefficients(), &[1.0]);
    assert_eq!(approximation.evaluate(0.7), 1.0);
  }

  #[test]
  fn test_display() {
    let engine = PadeEngine::new(sin, 3, 2, 0).unwrap();
    let text = engine.compute_coefficients().unwrap().to_string();
    assert!(text.starts_with("Pade Approximation (M=3, N=2) at x=0: ("), "{text}");
    assert!(text.ends_with("*x^2 + 1)"), "{text}");
    assert!(text.contains("*x^3 + x) / ("), "{text}");
  }

  #[test]
  fn test_shifted_point() {
    // 1 / (3 - x) about x = 2 is 1 / (1 - t) with t = x - 2.
    let engine = PadeEngine::new(
      |x| Expr::call("/", vec![Expr::one(), Expr::call("-", vec![Expr::from(3), x])]),
      0,
      1,
      2,
    ).unwrap();
    let approximation = engine.compute_coefficients().unwrap();
    assert_abs_diff_eq!(approximation.denominator().coefficients(), [1.0, -1.0].as_slice(), epsilon = 1e-14);
    assert_abs_diff_eq!(approximation.evaluate(2.5), 2.0, epsilon = 1e-12);
    assert!(approximation.to_string().contains("(x - 2)"));
  }

  #[test]
  fn test_from_taylor_requires_enough_terms() {
    let taylor = TaylorApproximation::expand(sin(Expr::from(Var::default())), Var::default(), Number::from(0), 4, CoefficientMethod::Series).unwrap();
    let err = PadeEngine::from_taylor(&taylor, 3, 2).unwrap_err();
    assert!(matches!(err, Error::InvalidParameter { name: "order_m + order_n", value: 5 }));
    let approximation = PadeEngine::from_taylor(&taylor, 1, 2).unwrap();
    assert_abs_diff_eq!(approximation.evaluate(0.1), 0.1f64.sin(), epsilon = 1e-4);
  }

  #[test]
  fn test_negative_orders() {
    assert!(matches!(PadeEngine::new(sin, -1, 2, 0), Err(Error::InvalidParameter { name: "order_m", value: -1 })));
    assert!(matches!(PadeEngine::new(sin, 1, -2, 0), Err(Error::InvalidParameter { name: "order_n", value: -2 })));
  }

  #[test]
  fn test_uninitialized_engine() {
    let engine = PadeEngine::new(sin, 1, 1, 0).unwrap();
    assert!(matches!(engine.evaluate(0.0), Err(Error::UninitializedState("evaluate"))));
    assert!(matches!(engine.describe(), Err(Error::UninitializedState("describe"))));
    assert!(matches!(engine.numerator(), Err(Error::UninitializedState("numerator"))));
  }
}
