
//! Truncated Taylor expansions with exact coefficients.

use crate::error::{Error, non_negative};
use crate::expr::Expr;
use crate::expr::calculus;
use crate::expr::evaluator::evaluate_exact;
use crate::expr::function::library::builtin_functions;
use crate::expr::lambda::Lambda;
use crate::expr::number::Number;
use crate::expr::simplifier::ArithmeticSimplifier;
use crate::expr::var::Var;
use crate::sampling::{Approximant, Sampled};

use log::debug;
use num::{Zero, One};
use once_cell::sync::OnceCell;

use std::fmt::{self, Display, Formatter};

/// How the Taylor coefficients of a function are found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CoefficientMethod {
  /// Truncated power series arithmetic on the expression tree. The
  /// cost is polynomial in the degree.
  #[default]
  Series,
  /// Repeated symbolic differentiation, then substitution of the
  /// point. Derivatives of quotients grow quickly with the order, so
  /// this is only practical for small degrees.
  Derivatives,
}

/// The coefficients `c_n = f^(n)(point) / n!` for `n` in `0..=degree`.
///
/// Each coefficient is exact whenever the function's value at the
/// point is, which for the elementary functions at `0` is almost
/// always the case. Both methods yield the same values.
pub fn taylor_coefficients(
  function: &Expr,
  variable: &Var,
  point: &Number,
  degree: usize,
  method: CoefficientMethod,
) -> Result<Vec<Number>, Error> {
  let table = builtin_functions();
  let coefficients = match method {
    CoefficientMethod::Series => {
      calculus::taylor_series(table, function, variable, point, degree)?.into_coefficients()
    }
    CoefficientMethod::Derivatives => {
      let simplifier = ArithmeticSimplifier::new(table);
      let derivatives = calculus::nth_derivatives(table, &simplifier, function.clone(), variable, degree)?;
      let point = Expr::from(point.clone());
      derivatives.into_iter()
        .enumerate()
        .map(|(n, derivative)| {
          let value = evaluate_exact(&derivative.substitute(variable, &point), table)?;
          Ok(value / Number::factorial(n))
        })
        .collect::<Result<Vec<_>, Error>>()?
    }
  };
  for (n, coefficient) in coefficients.iter().enumerate() {
    debug!("c_{n} = {coefficient}");
  }
  Ok(coefficients)
}

/// `variable - point` as an expression, written `variable + |point|`
/// for negative points.
pub(crate) fn shifted_variable(variable: &Var, point: &Number) -> Expr {
  let variable = Expr::from(variable.clone());
  if point.is_zero() {
    variable
  } else if point.is_negative() {
    Expr::call("+", vec![variable, Expr::from(point.abs())])
  } else {
    Expr::call("-", vec![variable, Expr::from(point.clone())])
  }
}

fn build_series(shifted: &Expr, coefficients: &[Number]) -> Expr {
  let mut terms: Vec<Expr> = coefficients.iter()
    .enumerate()
    .filter(|(_, c)| !c.is_zero())
    .map(|(n, c)| {
      let power = match n {
        0 => return Expr::from(c.clone()),
        1 => shifted.clone(),
        n => Expr::call("^", vec![shifted.clone(), Expr::from(n as i64)]),
      };
      if c.is_one() {
        power
      } else {
        Expr::call("*", vec![Expr::from(c.clone()), power])
      }
    })
    .collect();
  match terms.len() {
    0 => Expr::zero(),
    1 => terms.swap_remove(0),
    _ => Expr::call("+", terms),
  }
}

/// A computed Taylor polynomial. Immutable once built.
#[derive(Debug)]
pub struct TaylorApproximation {
  variable: Var,
  function: Expr,
  degree: usize,
  point: Number,
  coefficients: Vec<Number>,
  series: Expr,
  evaluator: Lambda,
}

impl TaylorApproximation {
  pub fn expand(function: Expr, variable: Var, point: Number, degree: usize, method: CoefficientMethod) -> Result<Self, Error> {
    let coefficients = taylor_coefficients(&function, &variable, &point, degree, method)?;
    let series = build_series(&shifted_variable(&variable, &point), &coefficients);
    let evaluator = Lambda::compile(&series, &variable, builtin_functions())?;
    Ok(Self { variable, function, degree, point, coefficients, series, evaluator })
  }

  pub fn variable(&self) -> &Var {
    &self.variable
  }

  pub fn function(&self) -> &Expr {
    &self.function
  }

  pub fn degree(&self) -> usize {
    self.degree
  }

  pub fn point(&self) -> &Number {
    &self.point
  }

  /// Always `degree + 1` coefficients, lowest power first.
  pub fn coefficients(&self) -> &[Number] {
    &self.coefficients
  }

  pub fn coefficients_f64(&self) -> Vec<f64> {
    self.coefficients.iter().map(Number::to_f64_or_nan).collect()
  }

  /// `Σ c_n (x - point)^n`, with vanishing terms left out.
  pub fn series(&self) -> &Expr {
    &self.series
  }

  pub fn evaluate_series<S: Sampled>(&self, xs: S) -> S::Output {
    xs.map_samples(|x| self.evaluator.call(x))
  }
}

impl Approximant for TaylorApproximation {
  fn evaluate_at(&self, x: f64) -> f64 {
    self.evaluator.call(x)
  }
}

impl Display for TaylorApproximation {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    write!(f, "Taylor series expansion at {}={}: {}", self.variable, self.point, self.series)
  }
}

/// Taylor expansion of a function built over the engine's own
/// variable. The coefficients are computed at most once.
#[derive(Debug)]
pub struct TaylorEngine {
  variable: Var,
  function: Expr,
  degree: usize,
  point: Number,
  method: CoefficientMethod,
  approximation: OnceCell<TaylorApproximation>,
}

impl TaylorEngine {
  /// Applies `function_ctor` to a fresh variable `x` to obtain the
  /// function to expand. Fails if `degree` is negative.
  pub fn new<F>(function_ctor: F, degree: i64, point: impl Into<Number>) -> Result<Self, Error>
  where F: FnOnce(Expr) -> Expr {
    let degree = non_negative("degree", degree)?;
    let variable = Var::default();
    let function = function_ctor(Expr::from(variable.clone()));
    Ok(Self {
      variable,
      function,
      degree,
      point: point.into(),
      method: CoefficientMethod::default(),
      approximation: OnceCell::new(),
    })
  }

  pub fn with_method(mut self, method: CoefficientMethod) -> Self {
    self.method = method;
    self
  }

  pub fn method(&self) -> CoefficientMethod {
    self.method
  }

  pub fn variable(&self) -> &Var {
    &self.variable
  }

  pub fn function(&self) -> &Expr {
    &self.function
  }

  pub fn degree(&self) -> usize {
    self.degree
  }

  pub fn point(&self) -> &Number {
    &self.point
  }

  /// Computes the coefficients, or returns the ones computed by an
  /// earlier call.
  pub fn compute_coefficients(&self) -> Result<&TaylorApproximation, Error> {
    self.approximation.get_or_try_init(|| {
      debug!("expanding {} at {}={} to degree {}", self.function, self.variable, self.point, self.degree);
      TaylorApproximation::expand(self.function.clone(), self.variable.clone(), self.point.clone(), self.degree, self.method)
    })
  }

  pub fn is_computed(&self) -> bool {
    self.approximation.get().is_some()
  }

  fn computed(&self, operation: &'static str) -> Result<&TaylorApproximation, Error> {
    self.approximation.get().ok_or(Error::UninitializedState(operation))
  }

  pub fn approximation(&self) -> Result<&TaylorApproximation, Error> {
    self.computed("approximation")
  }

  pub fn coefficients(&self) -> Result<&[Number], Error> {
    Ok(self.computed("coefficients")?.coefficients())
  }

  pub fn series(&self) -> Result<&Expr, Error> {
    Ok(self.computed("series")?.series())
  }

  pub fn evaluate_series<S: Sampled>(&self, xs: S) -> Result<S::Output, Error> {
    Ok(self.computed("evaluate_series")?.evaluate_series(xs))
  }

  pub fn describe(&self) -> Result<String, Error> {
    Ok(self.computed("describe")?.to_string())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::assert_strict_eq;

  use approx::assert_abs_diff_eq;

  fn sin(x: Expr) -> Expr {
    Expr::call("sin", vec![x])
  }

  #[test]
  fn test_sine_coefficients_are_exact() {
    let engine = TaylorEngine::new(sin, 4, 0).unwrap();
    let approximation = engine.compute_coefficients().unwrap();
    assert_strict_eq!(
      approximation.coefficients().to_vec(),
      vec![Number::from(0), Number::from(1), Number::from(0), Number::ratio(-1, 6), Number::from(0)],
    );
    assert_eq!(approximation.to_string(), "Taylor series expansion at x=0: x - 1/6*x^3");
  }

  #[test]
  fn test_exponential_coefficients() {
    let engine = TaylorEngine::new(|x| Expr::call("exp", vec![x]), 5, 0).unwrap();
    let coefficients = engine.compute_coefficients().unwrap().coefficients().to_vec();
    let expected: Vec<Number> = (0..=5).map(|n| Number::factorial(n).recip()).collect();
    assert_strict_eq!(coefficients, expected);
  }

  #[test]
  fn test_shifted_expansion() {
    // x^2 = 1 + 2(x - 1) + (x - 1)^2
    let engine = TaylorEngine::new(|x| Expr::call("^", vec![x, Expr::from(2)]), 3, 1).unwrap();
    let approximation = engine.compute_coefficients().unwrap();
    assert_strict_eq!(
      approximation.coefficients().to_vec(),
      vec![Number::from(1), Number::from(2), Number::from(1), Number::from(0)],
    );
    assert_eq!(approximation.series().to_string(), "1 + 2*(x - 1) + (x - 1)^2");
    assert_abs_diff_eq!(approximation.evaluate_series(3.0), 9.0, epsilon = 1e-12);
  }

  #[test]
  fn test_negative_point_label() {
    let engine = TaylorEngine::new(|x| x, 1, -2).unwrap();
    let approximation = engine.compute_coefficients().unwrap();
    assert_eq!(approximation.series().to_string(), "-2 + (x + 2)");
    assert_eq!(approximation.evaluate_series(5.0), 5.0);
  }

  #[test]
  fn test_inexact_point_gives_float_coefficients() {
    let engine = TaylorEngine::new(sin, 2, 0.5).unwrap();
    let coefficients = engine.compute_coefficients().unwrap().coefficients_f64();
    assert_abs_diff_eq!(coefficients[0], 0.5f64.sin(), epsilon = 1e-15);
    assert_abs_diff_eq!(coefficients[1], 0.5f64.cos(), epsilon = 1e-15);
    assert_abs_diff_eq!(coefficients[2], -0.5f64.sin() / 2.0, epsilon = 1e-15);
  }

  #[test]
  fn test_uninitialized_engine() {
    let engine = TaylorEngine::new(sin, 3, 0).unwrap();
    assert!(!engine.is_computed());
    assert!(matches!(engine.series(), Err(Error::UninitializedState("series"))));
    assert!(matches!(engine.evaluate_series(0.5), Err(Error::UninitializedState("evaluate_series"))));
    assert!(matches!(engine.describe(), Err(Error::UninitializedState("describe"))));
    assert!(matches!(engine.coefficients(), Err(Error::UninitializedState("coefficients"))));
  }

  #[test]
  fn test_compute_is_idempotent() {
    let engine = TaylorEngine::new(sin, 4, 0).unwrap();
    let first = engine.compute_coefficients().unwrap() as *const TaylorApproximation;
    let second = engine.compute_coefficients().unwrap() as *const TaylorApproximation;
    assert_eq!(first, second);
    assert_eq!(engine.coefficients().unwrap().len(), 5);
  }

  #[test]
  fn test_not_analytic_at_point() {
    let engine = TaylorEngine::new(|x| Expr::call("ln", vec![x]), 2, 0).unwrap();
    assert!(matches!(engine.compute_coefficients(), Err(Error::SymbolicEvaluation(_))));
    assert!(!engine.is_computed());
  }

  #[test]
  fn test_methods_agree() {
    let functions: [fn(Expr) -> Expr; 3] = [
      |x| Expr::call("tan", vec![x]),
      |x| Expr::call("/", vec![Expr::one(), Expr::call("-", vec![Expr::from(3), x])]),
      |x| Expr::call("exp", vec![Expr::call("sin", vec![x])]),
    ];
    for function in functions {
      let by_series = TaylorEngine::new(function, 5, 2).unwrap();
      let by_derivatives = TaylorEngine::new(function, 5, 2).unwrap().with_method(CoefficientMethod::Derivatives);
      let series = by_series.compute_coefficients().unwrap().coefficients_f64();
      let derivatives = by_derivatives.compute_coefficients().unwrap().coefficients_f64();
      assert_abs_diff_eq!(series.as_slice(), derivatives.as_slice(), epsilon = 1e-9);
    }
  }

  #[test]
  fn test_derivative_method_keeps_exactness() {
    let engine = TaylorEngine::new(sin, 4, 0).unwrap().with_method(CoefficientMethod::Derivatives);
    assert_eq!(engine.method(), CoefficientMethod::Derivatives);
    assert_strict_eq!(
      engine.compute_coefficients().unwrap().coefficients().to_vec(),
      vec![Number::from(0), Number::from(1), Number::from(0), Number::ratio(-1, 6), Number::from(0)],
    );
  }

  #[test]
  fn test_negative_degree() {
    let err = TaylorEngine::new(sin, -1, 0).unwrap_err();
    assert!(matches!(err, Error::InvalidParameter { name: "degree", value: -1 }));
  }
}
