
use super::number::Number;
use super::var::Var;
use crate::util::stricteq::StrictEq;

use std::fmt::{self, Display, Formatter};

#[derive(Debug, Clone, PartialEq)]
pub enum Atom {
  Number(Number),
  Var(Var),
}

impl From<Number> for Atom {
  fn from(n: Number) -> Self {
    Self::Number(n)
  }
}

impl From<Var> for Atom {
  fn from(v: Var) -> Self {
    Self::Var(v)
  }
}

impl From<i64> for Atom {
  fn from(n: i64) -> Self {
    Self::Number(Number::from(n))
  }
}

impl From<f64> for Atom {
  fn from(n: f64) -> Self {
    Self::Number(Number::from(n))
  }
}

impl StrictEq for Atom {
  fn strict_eq(&self, other: &Self) -> bool {
    match (self, other) {
      (Atom::Number(a), Atom::Number(b)) => a.strict_eq(b),
      (Atom::Var(a), Atom::Var(b)) => a == b,
      _ => false,
    }
  }
}

impl Display for Atom {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    match self {
      Atom::Number(n) => write!(f, "{n}"),
      Atom::Var(v) => write!(f, "{v}"),
    }
  }
}
