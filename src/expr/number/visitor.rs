//! Promotion of two numbers to a common representation. Private to
//! `crate::expr::number`.

use super::{Number, NumberImpl};

use num::{BigInt, BigRational, ToPrimitive};

#[derive(Debug, Clone, PartialEq, PartialOrd)]
pub enum NumberPair {
  Integers(BigInt, BigInt),
  Ratios(BigRational, BigRational),
  Floats(f64, f64),
}

impl NumberPair {
  /// Promote two numbers to the larger of their two representations,
  /// so we can do arithmetic on them.
  pub fn promote(left: Number, right: Number) -> NumberPair {
    use NumberImpl::*;
    use NumberPair::*;
    match (left.inner, right.inner) {
      (Integer(left), Integer(right)) => Integers(left, right),
      (Integer(left), Ratio(right)) => Ratios(BigRational::from_integer(left), right),
      (Ratio(left), Integer(right)) => Ratios(left, BigRational::from_integer(right)),
      (Ratio(left), Ratio(right)) => Ratios(left, right),
      (Float(left), right) => Floats(left, impl_to_float(right)),
      (left, Float(right)) => Floats(impl_to_float(left), right),
    }
  }
}

fn impl_to_float(n: NumberImpl) -> f64 {
  match n {
    NumberImpl::Integer(i) => i.to_f64().unwrap_or(f64::NAN),
    NumberImpl::Ratio(r) => r.to_f64().unwrap_or(f64::NAN),
    NumberImpl::Float(f) => f,
  }
}
