
use crate::expr::calculus::DifferentiationFailure;
use crate::expr::function::EvaluationError;

use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
  #[error("Invalid parameter {name} = {value}")]
  InvalidParameter { name: &'static str, value: i64 },
  #[error("{0}")]
  SymbolicEvaluation(#[from] SymbolicFailure),
  #[error("Pade system of order (M={order_m}, N={order_n}) is singular")]
  SingularSystem { order_m: usize, order_n: usize },
  #[error("{0} called before the coefficients were computed")]
  UninitializedState(&'static str),
}

/// The computer-algebra layer could not produce a coefficient.
#[derive(Debug, Clone, Error)]
pub enum SymbolicFailure {
  #[error("{0}")]
  Differentiation(#[from] DifferentiationFailure),
  #[error("{0}")]
  Evaluation(#[from] EvaluationError),
}

impl From<DifferentiationFailure> for Error {
  fn from(err: DifferentiationFailure) -> Self {
    Self::SymbolicEvaluation(err.into())
  }
}

impl From<EvaluationError> for Error {
  fn from(err: EvaluationError) -> Self {
    Self::SymbolicEvaluation(err.into())
  }
}

/// Converts a user-supplied order into a `usize`, rejecting negative
/// values.
pub(crate) fn non_negative(name: &'static str, value: i64) -> Result<usize, Error> {
  usize::try_from(value).map_err(|_| Error::InvalidParameter { name, value })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_non_negative() {
    assert_eq!(non_negative("degree", 4).unwrap(), 4);
    assert_eq!(non_negative("degree", 0).unwrap(), 0);
    let err = non_negative("degree", -1).unwrap_err();
    assert!(matches!(err, Error::InvalidParameter { name: "degree", value: -1 }));
    assert_eq!(err.to_string(), "Invalid parameter degree = -1");
  }

  #[test]
  fn test_symbolic_failures_convert() {
    let err = Error::from(EvaluationError::DivisionByZero);
    assert!(matches!(err, Error::SymbolicEvaluation(SymbolicFailure::Evaluation(EvaluationError::DivisionByZero))));
    assert_eq!(err.to_string(), "Division by zero");
  }
}
