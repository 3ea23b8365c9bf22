
use std::fmt::{self, Display, Formatter};

/// The different ways a number can be represented, ordered by
/// priority: arithmetic on two numbers happens in the larger of the
/// two representations. Integers and ratios are exact; a coefficient
/// computed entirely in exact representations is the true Taylor
/// coefficient, not an approximation of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum NumberRepr {
  /// An integer, exact.
  Integer,
  /// A rational number, exact.
  Ratio,
  /// An inexact IEEE 754 floating-point value.
  Float,
}

impl NumberRepr {
  /// Returns true if the numerical representation represents exact
  /// known quantities, as opposed to approximations.
  pub fn is_exact(&self) -> bool {
    match self {
      NumberRepr::Integer | NumberRepr::Ratio => true,
      NumberRepr::Float => false,
    }
  }
}

impl Display for NumberRepr {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    match self {
      NumberRepr::Integer => write!(f, "integer"),
      NumberRepr::Ratio => write!(f, "ratio"),
      NumberRepr::Float => write!(f, "float"),
    }
  }
}
