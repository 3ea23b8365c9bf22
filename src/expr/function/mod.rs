
pub mod builder;
pub mod library;
pub mod table;

use builder::{Arity, ArityError};
use crate::expr::Expr;
use crate::expr::number::Number;
use crate::expr::var::Var;
use crate::expr::calculus::{DerivativeEngine, DifferentiationFailure, DifferentiationError};
use crate::expr::calculus::series::{PowerSeries, SeriesEngine};

use itertools::Itertools;
use thiserror::Error;

use std::fmt::{self, Formatter, Debug};

/// A mathematical function known to the engine. A function knows how
/// to evaluate itself, both on exact [`Number`] arguments and on
/// plain `f64` samples, and optionally how to differentiate itself
/// and how to expand itself as a power series.
/// Functions cannot be constructed directly and must be constructed
/// through the builder API.
pub struct Function {
  name: String,
  arity: Arity,
  exact_rule: Box<ExactRule>,
  numeric_rule: NumericRule,
  derivative_rule: Option<Box<FunctionDeriv>>,
  series_rule: Option<Box<FunctionSeries>>,
}

/// An error evaluating a closed expression down to a [`Number`].
#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum EvaluationError {
  #[error("Unknown function '{0}'")]
  UnknownFunction(String),
  #[error("Variable '{0}' has no value")]
  UnboundVariable(Var),
  #[error("Function '{0}': {1}")]
  ArityError(String, ArityError),
  #[error("Division by zero")]
  DivisionByZero,
  #[error("Function '{function}' is undefined at ({args})")]
  Undefined { function: String, args: String },
  #[error("Function '{0}' has no power series rule")]
  NoSeries(String),
  #[error("Function '{function}' has no power series about {point}")]
  NotAnalytic { function: String, point: Number },
}

/// Exact evaluation rule. `Ok(None)` means "no exact answer", in
/// which case the numeric rule is applied to the arguments as floats.
pub type ExactRule =
  dyn Fn(&[Number]) -> Result<Option<Number>, EvaluationError> + Send + Sync;

pub type NumericRule = fn(&[f64]) -> f64;

pub type FunctionDeriv =
  dyn Fn(Vec<Expr>, &DerivativeEngine) -> Result<Expr, DifferentiationFailure> + Send + Sync;

pub type FunctionSeries =
  dyn Fn(Vec<PowerSeries>, &SeriesEngine) -> Result<PowerSeries, EvaluationError> + Send + Sync;

impl Function {
  /// The function's name.
  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn arity(&self) -> Arity {
    self.arity
  }

  pub fn check_arity(&self, actual: usize) -> Result<(), ArityError> {
    if self.arity.accepts(actual) {
      Ok(())
    } else {
      Err(ArityError { expected: self.arity, actual })
    }
  }

  /// Evaluates the function on numerical arguments, staying exact
  /// where the function has an exact rule for these arguments.
  ///
  /// The result is always finite. A non-finite floating-point result
  /// means the function is not defined at the arguments and is
  /// reported as [`EvaluationError::Undefined`].
  pub fn evaluate_exact(&self, args: Vec<Number>) -> Result<Number, EvaluationError> {
    self.check_arity(args.len()).map_err(|err| EvaluationError::ArityError(self.name.clone(), err))?;
    let result = match (self.exact_rule)(&args)? {
      Some(exact) => exact,
      None => {
        let floats: Vec<f64> = args.iter().map(Number::to_f64_or_nan).collect();
        Number::from((self.numeric_rule)(&floats))
      }
    };
    if result.is_finite() {
      Ok(result)
    } else {
      Err(EvaluationError::Undefined {
        function: self.name.clone(),
        args: args.iter().join(", "),
      })
    }
  }

  /// Evaluates the function on floats. No domain checking happens
  /// here; out-of-domain arguments produce NaN or infinity.
  pub fn evaluate_numeric(&self, args: &[f64]) -> f64 {
    (self.numeric_rule)(args)
  }

  pub fn numeric_rule(&self) -> NumericRule {
    self.numeric_rule
  }

  pub fn differentiate(
    &self,
    args: Vec<Expr>,
    engine: &DerivativeEngine,
  ) -> Result<Expr, DifferentiationFailure> {
    let Some(derivative_rule) = &self.derivative_rule else {
      return Err(engine.error(DifferentiationError::UnknownDerivative(self.name().to_owned())));
    };
    derivative_rule(args, engine)
  }

  /// Expands the function applied to the given argument series.
  pub fn expand_series(
    &self,
    args: Vec<PowerSeries>,
    engine: &SeriesEngine,
  ) -> Result<PowerSeries, EvaluationError> {
    self.check_arity(args.len()).map_err(|err| EvaluationError::ArityError(self.name.clone(), err))?;
    let Some(series_rule) = &self.series_rule else {
      return Err(EvaluationError::NoSeries(self.name.clone()));
    };
    series_rule(args, engine)
  }
}

impl Debug for Function {
  fn fmt(&self, f: &mut Formatter) -> Result<(), fmt::Error> {
    write!(f, "Function {{ name: {:?}, arity: {:?}, body: ... }}", self.name, self.arity)
  }
}
