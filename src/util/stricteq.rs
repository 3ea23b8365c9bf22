
//! Equality which also compares numerical representation.

use std::fmt::{self, Debug, Formatter};

/// Trait for defining a stricter notion of equality than the usual
/// [`PartialEq`].
///
/// `a.strict_eq(b)` should imply `a == b`. For numbers this is used
/// to tell an exact `1/6` apart from its floating-point neighbor,
/// which matters when checking that symbolic coefficients stayed
/// exact.
pub trait StrictEq: PartialEq {
  fn strict_eq(&self, other: &Self) -> bool;
}

/// Lifts a [`StrictEq`] relation into `PartialEq` for use with macros
/// like `assert_eq!`. Prints like the wrapped value.
pub struct Strictly<'a, T: ?Sized>(pub &'a T);

impl<T: StrictEq + ?Sized> PartialEq for Strictly<'_, T> {
  fn eq(&self, other: &Self) -> bool {
    self.0.strict_eq(other.0)
  }
}

impl<T: Debug + ?Sized> Debug for Strictly<'_, T> {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    write!(f, "{:?}", self.0)
  }
}

impl<T: StrictEq> StrictEq for [T] {
  fn strict_eq(&self, other: &Self) -> bool {
    self.len() == other.len() && self.iter().zip(other).all(|(a, b)| a.strict_eq(b))
  }
}

impl<T: StrictEq> StrictEq for Vec<T> {
  fn strict_eq(&self, other: &Self) -> bool {
    self.as_slice().strict_eq(other.as_slice())
  }
}

#[macro_export]
macro_rules! assert_strict_eq {
  ($left:expr, $right:expr $(,)?) => {
    match (&$left, &$right) {
      (left_val, right_val) => {
        assert_eq!(
          $crate::util::stricteq::Strictly(left_val),
          $crate::util::stricteq::Strictly(right_val),
        )
      }
    }
  }
}

#[macro_export]
macro_rules! assert_strict_ne {
  ($left:expr, $right:expr $(,)?) => {
    match (&$left, &$right) {
      (left_val, right_val) => {
        assert_ne!(
          $crate::util::stricteq::Strictly(left_val),
          $crate::util::stricteq::Strictly(right_val),
        )
      }
    }
  }
}
