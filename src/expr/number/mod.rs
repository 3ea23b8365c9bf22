
//! Real numbers which stay exact for as long as the arithmetic
//! allows.

mod repr;
mod visitor;

pub use repr::NumberRepr;

use visitor::NumberPair;
use crate::util::stricteq::StrictEq;

use num::{BigInt, BigRational, Zero, One, Signed};
use num::traits::ToPrimitive;
use thiserror::Error;
use once_cell::sync::Lazy;
use regex::Regex;
use approx::{AbsDiffEq, RelativeEq};
use serde::{Serialize, Serializer, Deserialize, Deserializer};

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;
use std::ops;
use std::cmp::Ordering;

/// General-purpose real number type, capable of automatically
/// switching between representations when mathematical functions
/// demand it.
///
/// A real number can be represented as an exact (arbitrary-precision)
/// integer, a rational number, or an IEEE 754 floating point value.
/// Use [`Number::repr`] to get the number's current representation.
/// Exact representations are preferred; a computation only becomes
/// inexact once a float enters it.
#[derive(Debug, Clone)]
pub struct Number {
  inner: NumberImpl,
}

#[derive(Debug, Clone)]
enum NumberImpl {
  Integer(BigInt),
  Ratio(BigRational),
  Float(f64),
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("Failed to parse number")]
#[non_exhaustive]
pub struct ParseNumberError {}

impl Number {
  /// Gets the current representation of the number.
  pub fn repr(&self) -> NumberRepr {
    match &self.inner {
      NumberImpl::Integer(_) => NumberRepr::Integer,
      NumberImpl::Ratio(_) => NumberRepr::Ratio,
      NumberImpl::Float(_) => NumberRepr::Float,
    }
  }

  pub fn is_exact(&self) -> bool {
    self.repr().is_exact()
  }

  /// Produces a rational number. If the denominator divides evenly
  /// into the numerator, then the resulting value will have
  /// reprentation `NumberRepr::Integer`. Otherwise, the resulting
  /// value will have representation `NumberRepr::Ratio`.
  ///
  /// Panics if `denom == 0`.
  pub fn ratio(numer: impl Into<BigInt>, denom: impl Into<BigInt>) -> Number {
    Number::from(BigRational::new(numer.into(), denom.into()))
  }

  /// `n!` as an exact integer.
  pub fn factorial(n: usize) -> Number {
    let product = (1..=n).fold(BigInt::one(), |acc, k| acc * BigInt::from(k));
    Number::from(product)
  }

  /// Simplify representation. If the number is stored as a rational
  /// but is in fact an integer, convert to an integer representation.
  /// This function will never simplify a floating-point
  /// representation to an exact representation, even if the
  /// represented float is current integral in value.
  fn simplify(self) -> Number {
    if let NumberImpl::Ratio(r) = &self.inner {
      if r.denom().is_one() {
        return Number::from(r.numer().clone());
      }
    }
    self
  }

  /// Division which refuses an exact zero divisor instead of
  /// panicking. Floating-point division by zero is allowed and
  /// follows IEEE semantics.
  pub fn checked_div(&self, other: &Number) -> Option<Number> {
    if other.is_exact() && other.is_zero() {
      None
    } else {
      Some(self / other)
    }
  }

  pub fn recip(&self) -> Number {
    &Number::one() / self
  }

  /// Raises a `Number` to an integer power.
  ///
  /// The indeterminate form `0^0` is treated as 1.
  pub fn powi(&self, exp: BigInt) -> Number {
    match exp.cmp(&BigInt::zero()) {
      Ordering::Equal => {
        // Exponent is zero, so return 1.
        Number::one()
      }
      Ordering::Less => {
        // Exponent is negative, so make it positive and apply to
        // reciprocal.
        self.recip().powi(- exp)
      }
      Ordering::Greater => {
        match &self.inner {
          NumberImpl::Integer(n) => Number::from(powi_by_repeated_square(n.clone(), exp)),
          NumberImpl::Ratio(r) => Number::from(powi_by_repeated_square(r.clone(), exp)),
          NumberImpl::Float(f) =>
            // In the floating case, we're already going to end up
            // with an inexact result, so just rely on the hardware
            // powf implementation instead of repeated squaring.
            Number::from(f.powf(exp.to_f64().unwrap_or(f64::NAN))),
        }
      }
    }
  }

  /// Returns the value as an integer if it is exactly integral.
  pub fn to_integer(&self) -> Option<BigInt> {
    match &self.inner {
      NumberImpl::Integer(i) => Some(i.clone()),
      NumberImpl::Ratio(_) | NumberImpl::Float(_) => None,
    }
  }

  /// Converts `self` to an `f64` on a best-effort basis.
  pub fn to_f64(&self) -> Option<f64> {
    match &self.inner {
      NumberImpl::Integer(i) => i.to_f64(),
      NumberImpl::Ratio(r) => r.to_f64(),
      NumberImpl::Float(d) => Some(*d),
    }
  }

  /// Converts `self` to an `f64`, using NaN if the conversion fails.
  pub fn to_f64_or_nan(&self) -> f64 {
    self.to_f64().unwrap_or(f64::NAN)
  }

  pub fn is_finite(&self) -> bool {
    match &self.inner {
      NumberImpl::Integer(_) | NumberImpl::Ratio(_) => true,
      NumberImpl::Float(f) => f.is_finite(),
    }
  }

  /// The absolute value of `self`.
  pub fn abs(&self) -> Number {
    match &self.inner {
      NumberImpl::Integer(i) => Number::from(i.abs()),
      NumberImpl::Ratio(r) => Number::from(r.abs()),
      NumberImpl::Float(f) => Number::from(f.abs()),
    }
  }

  pub fn is_negative(&self) -> bool {
    self < &Number::zero()
  }

  /// If `self` is an exact rational whose numerator and denominator
  /// are both perfect squares, returns the exact square root.
  pub fn exact_sqrt(&self) -> Option<Number> {
    fn int_sqrt(i: &BigInt) -> Option<BigInt> {
      if i.is_negative() {
        return None;
      }
      let root = i.sqrt();
      (&root * &root == *i).then_some(root)
    }
    match &self.inner {
      NumberImpl::Integer(i) => int_sqrt(i).map(Number::from),
      NumberImpl::Ratio(r) => {
        let numer = int_sqrt(r.numer())?;
        let denom = int_sqrt(r.denom())?;
        Some(Number::ratio(numer, denom))
      }
      NumberImpl::Float(_) => None,
    }
  }
}

// Precondition: exp > 0.
fn powi_by_repeated_square<T>(mut input: T, mut exp: BigInt) -> T
where T: One + ops::MulAssign + Clone {
  assert!(exp > BigInt::zero());
  let mut result = T::one();
  while exp > BigInt::one() {
    if exp.clone() % BigInt::from(2) == BigInt::zero() {
      input *= input.clone();
      exp /= BigInt::from(2);
    } else {
      result *= input.clone();
      exp -= BigInt::one();
    }
  }
  result *= input;
  result
}

/// Constructs an integer number from an `i64`.
impl From<i64> for Number {
  fn from(i: i64) -> Number {
    Number { inner: NumberImpl::Integer(i.into()) }
  }
}

/// Constructs an integer number from an `i32`.
impl From<i32> for Number {
  fn from(i: i32) -> Number {
    Number { inner: NumberImpl::Integer(i.into()) }
  }
}

/// Constructs an integer number from an arbitrary-sized `BigInt`
/// integer.
impl From<BigInt> for Number {
  fn from(i: BigInt) -> Number {
    Number { inner: NumberImpl::Integer(i) }
  }
}

/// Constructs a rational number from a `BigRational` value.
impl From<BigRational> for Number {
  fn from(r: BigRational) -> Number {
    Number { inner: NumberImpl::Ratio(r) }.simplify()
  }
}

/// Constructs a floating-point number from an `f64` value.
impl From<f64> for Number {
  fn from(f: f64) -> Number {
    Number { inner: NumberImpl::Float(f) }
  }
}

impl Default for Number {
  fn default() -> Number {
    Number::from(0)
  }
}

impl Display for Number {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    match &self.inner {
      NumberImpl::Integer(i) => {
        i.fmt(f)
      }
      NumberImpl::Ratio(r) => {
        write!(f, "{}/{}", r.numer(), r.denom())
      }
      NumberImpl::Float(d) => {
        // If the float is actually a (small) integer, force one decimal
        // point. Otherwise, use default printer.
        if d.fract().is_zero() && d.abs() < u64::MAX as f64 {
          write!(f, "{:.1}", d)
        } else {
          write!(f, "{}", d)
        }
      }
    }
  }
}

/// `PartialEq` impl for `Number` compares the numerical value and
/// ignores the representation. To include the representation, use
/// [`StrictEq::strict_eq`].
impl PartialEq for Number {
  fn eq(&self, other: &Number) -> bool {
    match NumberPair::promote(self.clone(), other.clone()) {
      NumberPair::Integers(left, right) => left == right,
      NumberPair::Ratios(left, right) => left == right,
      NumberPair::Floats(left, right) => left == right,
    }
  }
}

impl StrictEq for Number {
  /// Compares both the representation and the value of the type. This
  /// is stricter than the standard [`PartialEq`] implementation.
  fn strict_eq(&self, other: &Number) -> bool {
    self.repr() == other.repr() && self == other
  }
}

impl PartialOrd for Number {
  fn partial_cmp(&self, other: &Number) -> Option<Ordering> {
    match NumberPair::promote(self.clone(), other.clone()) {
      NumberPair::Integers(left, right) => left.partial_cmp(&right),
      NumberPair::Ratios(left, right) => left.partial_cmp(&right),
      NumberPair::Floats(left, right) => left.partial_cmp(&right),
    }
  }
}

impl ops::Add for Number {
  type Output = Number;

  fn add(self, other: Number) -> Number {
    match NumberPair::promote(self, other) {
      NumberPair::Integers(left, right) => Number::from(left + right),
      NumberPair::Ratios(left, right) => Number::from(left + right),
      NumberPair::Floats(left, right) => Number::from(left + right),
    }
  }
}

impl ops::Add for &Number {
  type Output = Number;

  fn add(self, other: &Number) -> Number {
    self.clone() + other.clone()
  }
}

impl ops::Sub for Number {
  type Output = Number;

  fn sub(self, other: Number) -> Number {
    match NumberPair::promote(self, other) {
      NumberPair::Integers(left, right) => Number::from(left - right),
      NumberPair::Ratios(left, right) => Number::from(left - right),
      NumberPair::Floats(left, right) => Number::from(left - right),
    }
  }
}

impl ops::Sub for &Number {
  type Output = Number;

  fn sub(self, other: &Number) -> Number {
    self.clone() - other.clone()
  }
}

impl ops::Mul for Number {
  type Output = Number;

  fn mul(self, other: Number) -> Number {
    match NumberPair::promote(self, other) {
      NumberPair::Integers(left, right) => Number::from(left * right),
      NumberPair::Ratios(left, right) => Number::from(left * right),
      NumberPair::Floats(left, right) => Number::from(left * right),
    }
  }
}

impl ops::Mul for &Number {
  type Output = Number;

  fn mul(self, other: &Number) -> Number {
    self.clone() * other.clone()
  }
}

/// This division operation will not truncate, even if given two
/// values of representation `NumberRepr::Integer`. However, it will
/// preserve exactness, so given two exact inputs, the output will be
/// exact as well.
///
/// Panics on an exact zero divisor; see [`Number::checked_div`].
impl ops::Div for Number {
  type Output = Number;

  fn div(self, other: Number) -> Number {
    match NumberPair::promote(self, other) {
      NumberPair::Integers(left, right) =>
        Number::from(BigRational::from(left) / BigRational::from(right)),
      NumberPair::Ratios(left, right) => Number::from(left / right),
      NumberPair::Floats(left, right) => Number::from(left / right),
    }
  }
}

impl ops::Div for &Number {
  type Output = Number;

  fn div(self, other: &Number) -> Number {
    self.clone() / other.clone()
  }
}

impl ops::Neg for Number {
  type Output = Number;

  fn neg(self) -> Number {
    match self.inner {
      NumberImpl::Integer(i) => Number::from(-i),
      NumberImpl::Ratio(r) => Number::from(-r),
      NumberImpl::Float(f) => Number::from(-f),
    }
  }
}

impl ops::Neg for &Number {
  type Output = Number;

  fn neg(self) -> Number {
    self.clone().neg()
  }
}

impl Zero for Number {
  fn zero() -> Number {
    Number::from(0i64)
  }
  fn is_zero(&self) -> bool {
    match &self.inner {
      NumberImpl::Integer(i) => i.is_zero(),
      NumberImpl::Ratio(r) => r.is_zero(),
      NumberImpl::Float(f) => f.is_zero(),
    }
  }
}

impl One for Number {
  fn one() -> Number {
    Number::from(1i64)
  }
  fn is_one(&self) -> bool {
    match &self.inner {
      NumberImpl::Integer(i) => i.is_one(),
      NumberImpl::Ratio(r) => r.is_one(),
      NumberImpl::Float(f) => f.is_one(),
    }
  }
}

impl AbsDiffEq for Number {
  type Epsilon = f64;

  fn default_epsilon() -> f64 {
    <f64 as AbsDiffEq>::default_epsilon()
  }

  fn abs_diff_eq(&self, other: &Number, epsilon: f64) -> bool {
    self.to_f64_or_nan().abs_diff_eq(&other.to_f64_or_nan(), epsilon)
  }
}

impl RelativeEq for Number {
  fn default_max_relative() -> f64 {
    <f64 as RelativeEq>::default_max_relative()
  }

  fn relative_eq(&self, other: &Number, epsilon: f64, max_relative: f64) -> bool {
    self.to_f64_or_nan().relative_eq(&other.to_f64_or_nan(), epsilon, max_relative)
  }
}

impl FromStr for Number {
  type Err = ParseNumberError;

  /// Accepts integers (`7`), ratios (`1:2` or `1/2`) and floats
  /// (`0.5`, `3e-6`).
  fn from_str(s: &str) -> Result<Number, ParseNumberError> {
    let s = s.trim();
    parse_integer(s).or_else(|| {
      parse_ratio(s)
    }).or_else(|| {
      parse_float(s)
    }).ok_or(ParseNumberError {})
  }
}

/// Numbers serialize as their display string, so that exact
/// rationals survive a round trip.
impl Serialize for Number {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where S: Serializer {
    serializer.collect_str(self)
  }
}

impl<'de> Deserialize<'de> for Number {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where D: Deserializer<'de> {
    let s = String::deserialize(deserializer)?;
    Number::from_str(&s).map_err(serde::de::Error::custom)
  }
}

fn parse_integer(s: &str) -> Option<Number> {
  BigInt::from_str(s).map(Number::from).ok()
}

fn parse_ratio(s: &str) -> Option<Number> {
  static RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([+-]?\d+)[:/]([+-]?\d+)$").unwrap());
  let caps = RE.captures(s)?;
  let numerator = BigInt::from_str(&caps[1]).ok()?;
  let denominator = BigInt::from_str(&caps[2]).ok()?;
  if denominator.is_zero() {
    // Fail the parse.
    return None;
  }
  Some(Number::ratio(numerator, denominator))
}

fn parse_float(s: &str) -> Option<Number> {
  f64::from_str(s).map(Number::from).ok()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{assert_strict_eq, assert_strict_ne};

  fn roundtrip_display(number: Number) -> Number {
    Number::from_str(&number.to_string()).unwrap()
  }

  fn assert_roundtrip_display(number: Number) {
    assert_strict_eq!(number.clone(), roundtrip_display(number));
  }

  #[test]
  fn test_display_roundtrip() {
    assert_roundtrip_display(Number::from(0i64));
    assert_roundtrip_display(Number::from(-99i64));
    assert_roundtrip_display(Number::factorial(25));
    assert_roundtrip_display(Number::ratio(9, 100));
    assert_roundtrip_display(Number::ratio(-100, 3));
    assert_roundtrip_display(Number::from(3.1415));
    assert_roundtrip_display(Number::from(-8.0));
  }

  #[test]
  fn test_parse_ratio() {
    assert_strict_eq!(Number::from_str("1:2").unwrap(), Number::ratio(1, 2));
    assert_strict_eq!(Number::from_str("-1/6").unwrap(), Number::ratio(-1, 6));
    assert_strict_eq!(Number::from_str("7:-9").unwrap(), Number::ratio(-7, 9));
    assert_eq!(Number::from_str("1:0"), Err(ParseNumberError {}));
    assert_eq!(Number::from_str("1.5:2"), Err(ParseNumberError {}));
  }

  #[test]
  fn test_parse_float() {
    assert_strict_eq!(Number::from_str("1.9").unwrap(), Number::from(1.9f64));
    assert_strict_eq!(Number::from_str(" 3e-6 ").unwrap(), Number::from(3e-6f64));
  }

  #[test]
  fn test_ratio_repr_simplification() {
    assert_eq!(Number::ratio(2, 1).repr(), NumberRepr::Integer);
    assert_eq!(Number::ratio(9, -3).repr(), NumberRepr::Integer);
    assert_eq!(Number::ratio(1, 6).repr(), NumberRepr::Ratio);
  }

  #[test]
  fn test_strict_eq() {
    assert_strict_eq!(Number::from(3), Number::ratio(9, 3));
    assert_strict_ne!(Number::from(3), Number::from(3.0));
    assert_strict_ne!(Number::from(0.5), Number::ratio(1, 2));
    assert_eq!(Number::from(0.5), Number::ratio(1, 2));
  }

  #[test]
  fn test_arithmetic_preserves_exactness() {
    assert_strict_eq!(Number::from(-1) / Number::factorial(3), Number::ratio(-1, 6));
    assert_strict_eq!(Number::ratio(1, 2) + Number::ratio(1, 2), Number::from(1));
    assert_strict_eq!(Number::ratio(1, 3) * Number::from(3), Number::from(1));
    assert_strict_eq!(Number::ratio(1, 2) - Number::from(3.0), Number::from(-2.5));
  }

  #[test]
  fn test_factorial() {
    assert_strict_eq!(Number::factorial(0), Number::from(1));
    assert_strict_eq!(Number::factorial(5), Number::from(120));
  }

  #[test]
  fn test_checked_div() {
    assert_eq!(Number::from(1).checked_div(&Number::from(0)), None);
    assert_strict_eq!(Number::from(1).checked_div(&Number::from(4)).unwrap(), Number::ratio(1, 4));
    let inf = Number::from(1).checked_div(&Number::from(0.0)).unwrap();
    assert!(!inf.is_finite());
  }

  #[test]
  fn test_powi() {
    assert_strict_eq!(Number::from(0).powi(BigInt::zero()), Number::from(1));
    assert_strict_eq!(Number::ratio(3, 2).powi(BigInt::from(10)), Number::ratio(59049, 1024));
    assert_strict_eq!(Number::from(3).powi(BigInt::from(-2)), Number::ratio(1, 9));
    assert_strict_eq!(Number::from(2.0).powi(BigInt::from(-2)), Number::from(0.25));
  }

  #[test]
  fn test_exact_sqrt() {
    assert_strict_eq!(Number::from(16).exact_sqrt().unwrap(), Number::from(4));
    assert_strict_eq!(Number::ratio(9, 4).exact_sqrt().unwrap(), Number::ratio(3, 2));
    assert_eq!(Number::from(2).exact_sqrt(), None);
    assert_eq!(Number::from(-4).exact_sqrt(), None);
    assert_eq!(Number::from(4.0).exact_sqrt(), None);
  }

  #[test]
  fn test_serde_as_string() {
    let json = serde_json::to_string(&Number::ratio(-1, 6)).unwrap();
    assert_eq!(json, "\"-1/6\"");
    let back: Number = serde_json::from_str(&json).unwrap();
    assert_strict_eq!(back, Number::ratio(-1, 6));
  }
}
