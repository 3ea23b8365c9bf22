
//! Builder API for [`Function`] objects.

use super::{Function, ExactRule, NumericRule, FunctionDeriv, FunctionSeries, EvaluationError};
use crate::expr::Expr;
use crate::expr::number::Number;
use crate::expr::calculus::{DerivativeEngine, DifferentiationFailure, DifferentiationError};
use crate::expr::calculus::series::{PowerSeries, SeriesEngine};

use thiserror::Error;

use std::fmt::{self, Display, Formatter};

pub struct FunctionBuilder {
  name: String,
  arity: Arity,
  exact_rule: Option<Box<ExactRule>>,
  numeric_rule: Option<NumericRule>,
  derivative_rule: Option<Box<FunctionDeriv>>,
  series_rule: Option<Box<FunctionSeries>>,
}

/// How many arguments a function accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
  Exactly(usize),
  AtLeast(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Expected {expected} argument(s), got {actual}")]
pub struct ArityError {
  pub expected: Arity,
  pub actual: usize,
}

impl Arity {
  pub fn accepts(self, count: usize) -> bool {
    match self {
      Arity::Exactly(n) => count == n,
      Arity::AtLeast(n) => count >= n,
    }
  }
}

impl Display for Arity {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    match self {
      Arity::Exactly(n) => write!(f, "{n}"),
      Arity::AtLeast(n) => write!(f, "at least {n}"),
    }
  }
}

impl FunctionBuilder {
  /// Constructs a new `FunctionBuilder` object for the function with
  /// the given name. The function accepts exactly one argument unless
  /// [`FunctionBuilder::arity`] says otherwise.
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      arity: Arity::Exactly(1),
      exact_rule: None,
      numeric_rule: None,
      derivative_rule: None,
      series_rule: None,
    }
  }

  pub fn arity(mut self, arity: Arity) -> Self {
    self.arity = arity;
    self
  }

  /// Sets the rule for evaluating the function on exact arguments.
  /// Without one, every evaluation goes through the numeric rule.
  pub fn set_exact(mut self, rule: impl Fn(&[Number]) -> Result<Option<Number>, EvaluationError> + Send + Sync + 'static) -> Self {
    self.exact_rule = Some(Box::new(rule));
    self
  }

  pub fn set_numeric(mut self, rule: NumericRule) -> Self {
    self.numeric_rule = Some(rule);
    self
  }

  /// Sets the rule for how to differentiate this function. If a
  /// derivative rule has already been set, then `set_derivative`
  /// panics.
  pub fn set_derivative(mut self, rule: impl Fn(Vec<Expr>, &DerivativeEngine) -> Result<Expr, DifferentiationFailure> + Send + Sync + 'static) -> Self {
    assert!(
      self.derivative_rule.is_none(),
      "Cannot set derivative rule on function {} that already has one.",
      self.name,
    );
    self.derivative_rule = Some(Box::new(rule));
    self
  }

  /// Sets the rule for expanding this function as a power series,
  /// given the series of its arguments. Panics if one has already
  /// been set.
  pub fn set_series(mut self, rule: impl Fn(Vec<PowerSeries>, &SeriesEngine) -> Result<PowerSeries, EvaluationError> + Send + Sync + 'static) -> Self {
    assert!(
      self.series_rule.is_none(),
      "Cannot set series rule on function {} that already has one.",
      self.name,
    );
    self.series_rule = Some(Box::new(rule));
    self
  }

  /// Consumes `self` and builds it into a completed [`Function`]
  /// value.
  ///
  /// Panics if no numeric rule was given.
  pub fn build(self) -> Function {
    let numeric_rule = self.numeric_rule.unwrap_or_else(|| {
      panic!("Function {} was built without a numeric rule", self.name)
    });
    Function {
      name: self.name,
      arity: self.arity,
      exact_rule: self.exact_rule.unwrap_or_else(|| Box::new(|_| Ok(None))),
      numeric_rule,
      derivative_rule: self.derivative_rule,
      series_rule: self.series_rule,
    }
  }
}

pub fn arity_one_deriv(
  function_name: &str,
  f: impl Fn(Expr, &DerivativeEngine) -> Result<Expr, DifferentiationFailure> + Send + Sync + 'static
) -> impl Fn(Vec<Expr>, &DerivativeEngine) -> Result<Expr, DifferentiationFailure> + Send + Sync + 'static {
  let function_name = function_name.to_owned();
  move |mut args, engine| {
    if args.len() != 1 {
      let err = ArityError { expected: Arity::Exactly(1), actual: args.len() };
      return Err(engine.error(DifferentiationError::ArityError(function_name.clone(), err)));
    }
    let arg = args.pop().unwrap(); // unwrap: len() == 1
    f(arg, engine)
  }
}

pub fn arity_two_deriv(
  function_name: &str,
  f: impl Fn(Expr, Expr, &DerivativeEngine) -> Result<Expr, DifferentiationFailure> + Send + Sync + 'static
) -> impl Fn(Vec<Expr>, &DerivativeEngine) -> Result<Expr, DifferentiationFailure> + Send + Sync + 'static {
  let function_name = function_name.to_owned();
  move |mut args, engine| {
    if args.len() != 2 {
      let err = ArityError { expected: Arity::Exactly(2), actual: args.len() };
      return Err(engine.error(DifferentiationError::ArityError(function_name.clone(), err)));
    }
    let arg2 = args.pop().unwrap(); // unwrap: len() == 2
    let arg1 = args.pop().unwrap(); // unwrap: len() == 2
    f(arg1, arg2, engine)
  }
}

pub fn arity_one_series(
  function_name: &str,
  f: impl Fn(PowerSeries, &SeriesEngine) -> Result<PowerSeries, EvaluationError> + Send + Sync + 'static
) -> impl Fn(Vec<PowerSeries>, &SeriesEngine) -> Result<PowerSeries, EvaluationError> + Send + Sync + 'static {
  let function_name = function_name.to_owned();
  move |mut args, engine| {
    if args.len() != 1 {
      let err = ArityError { expected: Arity::Exactly(1), actual: args.len() };
      return Err(EvaluationError::ArityError(function_name.clone(), err));
    }
    let arg = args.pop().unwrap(); // unwrap: len() == 1
    f(arg, engine)
  }
}

pub fn arity_two_series(
  function_name: &str,
  f: impl Fn(PowerSeries, PowerSeries, &SeriesEngine) -> Result<PowerSeries, EvaluationError> + Send + Sync + 'static
) -> impl Fn(Vec<PowerSeries>, &SeriesEngine) -> Result<PowerSeries, EvaluationError> + Send + Sync + 'static {
  let function_name = function_name.to_owned();
  move |mut args, engine| {
    if args.len() != 2 {
      let err = ArityError { expected: Arity::Exactly(2), actual: args.len() };
      return Err(EvaluationError::ArityError(function_name.clone(), err));
    }
    let arg2 = args.pop().unwrap(); // unwrap: len() == 2
    let arg1 = args.pop().unwrap(); // unwrap: len() == 2
    f(arg1, arg2, engine)
  }
}
