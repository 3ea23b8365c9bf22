
//! Truncated power series about an expansion point, with exact
//! coefficients.
//!
//! Every builtin function knows how to expand itself given the series
//! of its arguments, so a whole expression is expanded bottom-up in
//! time polynomial in the order. The coefficient of `t^k` is
//! `f^(k)(point) / k!`.

use crate::expr::Expr;
use crate::expr::atom::Atom;
use crate::expr::function::EvaluationError;
use crate::expr::function::table::FunctionTable;
use crate::expr::number::Number;
use crate::expr::var::Var;

use num::{BigInt, Zero, One};

use std::ops;

/// The coefficients `a_0 .. a_order` of `Σ a_k t^k`, where `t` is the
/// distance from the expansion point.
#[derive(Debug, Clone, PartialEq)]
pub struct PowerSeries {
  coefficients: Vec<Number>,
}

#[derive(Debug)]
pub struct SeriesEngine<'a> {
  variable: Var,
  point: Number,
  order: usize,
  function_table: &'a FunctionTable,
}

fn index(k: usize) -> Number {
  Number::from(BigInt::from(k))
}

impl PowerSeries {
  /// Pads with zeroes or truncates to exactly `order + 1`
  /// coefficients.
  pub fn new(mut coefficients: Vec<Number>, order: usize) -> Self {
    coefficients.resize(order + 1, Number::zero());
    Self { coefficients }
  }

  pub fn constant(value: Number, order: usize) -> Self {
    Self::new(vec![value], order)
  }

  /// The series of the variable itself about `point`: `point + t`.
  pub fn variable(point: Number, order: usize) -> Self {
    Self::new(vec![point, Number::one()], order)
  }

  pub fn order(&self) -> usize {
    self.coefficients.len() - 1
  }

  pub fn into_coefficients(self) -> Vec<Number> {
    self.coefficients
  }

  /// The value of the expanded function at the expansion point.
  pub fn constant_term(&self) -> &Number {
    &self.coefficients[0]
  }

  pub fn is_constant(&self) -> bool {
    self.coefficients[1..].iter().all(Number::is_zero)
  }

  fn zeroes(&self) -> Vec<Number> {
    vec![Number::zero(); self.coefficients.len()]
  }

  pub fn scale(&self, factor: &Number) -> Self {
    Self { coefficients: self.coefficients.iter().map(|c| c * factor).collect() }
  }

  /// `self / other`, or `None` if `other` vanishes at the expansion
  /// point.
  ///
  /// `c_k = (a_k - Σ_{j=1}^{k} b_j c_{k-j}) / b_0`
  pub fn checked_div(&self, other: &PowerSeries) -> Option<PowerSeries> {
    let b0 = other.constant_term();
    if b0.is_zero() {
      return None;
    }
    let mut quotient = self.zeroes();
    for k in 0..quotient.len() {
      let correction = (1..=k).fold(Number::zero(), |acc, j| acc + &other.coefficients[j] * &quotient[k - j]);
      quotient[k] = &(&self.coefficients[k] - &correction) / b0;
    }
    Some(PowerSeries { coefficients: quotient })
  }

  /// Raises the series to an integer power by repeated squaring. A
  /// negative exponent requires a nonzero constant term.
  pub fn powi(&self, exponent: &BigInt) -> Option<PowerSeries> {
    let one = PowerSeries::constant(Number::one(), self.order());
    if exponent < &BigInt::zero() {
      let positive = self.powi(&-exponent)?;
      return one.checked_div(&positive);
    }
    let mut result = one;
    let mut base = self.clone();
    let mut exponent = exponent.clone();
    let two = BigInt::from(2);
    while exponent > BigInt::zero() {
      if &exponent % &two == BigInt::one() {
        result = &result * &base;
      }
      exponent /= &two;
      if exponent > BigInt::zero() {
        base = &base * &base;
      }
    }
    Some(result)
  }

  /// `b^p` for a constant real `p`, given `leading = b_0^p`. Requires
  /// `b_0 != 0` unless only the constant term is wanted.
  ///
  /// `b_0 c_k = (1/k) Σ_{j=1}^{k} ((p + 1) j - k) b_j c_{k-j}`
  pub fn powf(&self, exponent: &Number, leading: Number) -> Option<PowerSeries> {
    let b0 = self.constant_term();
    if self.order() > 0 && b0.is_zero() {
      return None;
    }
    let mut power = self.zeroes();
    power[0] = leading;
    let p_plus_one = exponent + &Number::one();
    for k in 1..power.len() {
      let sum = (1..=k).fold(Number::zero(), |acc, j| {
        let weight = &(&p_plus_one * &index(j)) - &index(k);
        acc + &(&weight * &self.coefficients[j]) * &power[k - j]
      });
      power[k] = &sum / &(&index(k) * b0);
    }
    Some(PowerSeries { coefficients: power })
  }

  /// `exp(a)`, given `leading = exp(a_0)`.
  ///
  /// `c_k = (1/k) Σ_{j=1}^{k} j a_j c_{k-j}`
  pub fn exp(&self, leading: Number) -> PowerSeries {
    let mut result = self.zeroes();
    result[0] = leading;
    for k in 1..result.len() {
      let sum = (1..=k).fold(Number::zero(), |acc, j| {
        acc + &(&index(j) * &self.coefficients[j]) * &result[k - j]
      });
      result[k] = &sum / &index(k);
    }
    PowerSeries { coefficients: result }
  }

  /// `ln(a)`, given `leading = ln(a_0)`. Requires `a_0 != 0`.
  ///
  /// `c_k = (a_k - (1/k) Σ_{j=1}^{k-1} j c_j a_{k-j}) / a_0`
  pub fn ln(&self, leading: Number) -> Option<PowerSeries> {
    let a0 = self.constant_term();
    if self.order() > 0 && a0.is_zero() {
      return None;
    }
    let mut result = self.zeroes();
    result[0] = leading;
    for k in 1..result.len() {
      let sum = (1..k).fold(Number::zero(), |acc, j| {
        acc + &(&index(j) * &result[j]) * &self.coefficients[k - j]
      });
      let correction = &sum / &index(k);
      result[k] = &(&self.coefficients[k] - &correction) / a0;
    }
    Some(PowerSeries { coefficients: result })
  }

  /// `sqrt(a)`, given `leading = sqrt(a_0)`. The square root is not
  /// analytic where it vanishes.
  ///
  /// `c_k = (a_k - Σ_{j=1}^{k-1} c_j c_{k-j}) / (2 c_0)`
  pub fn sqrt(&self, leading: Number) -> Option<PowerSeries> {
    if self.order() > 0 && leading.is_zero() {
      return None;
    }
    let mut result = self.zeroes();
    let twice_leading = &leading * &Number::from(2);
    result[0] = leading;
    for k in 1..result.len() {
      let sum = (1..k).fold(Number::zero(), |acc, j| acc + &result[j] * &result[k - j]);
      result[k] = &(&self.coefficients[k] - &sum) / &twice_leading;
    }
    Some(PowerSeries { coefficients: result })
  }

  /// `(sin(a), cos(a))`, given their values at `a_0`.
  ///
  /// `s_k = (1/k) Σ_{j=1}^{k} j a_j c_{k-j}`, and
  /// `c_k = -(1/k) Σ_{j=1}^{k} j a_j s_{k-j}`
  pub fn sin_cos(&self, sin_leading: Number, cos_leading: Number) -> (PowerSeries, PowerSeries) {
    let mut sin = self.zeroes();
    let mut cos = self.zeroes();
    sin[0] = sin_leading;
    cos[0] = cos_leading;
    for k in 1..sin.len() {
      let (mut sin_sum, mut cos_sum) = (Number::zero(), Number::zero());
      for j in 1..=k {
        let weight = &index(j) * &self.coefficients[j];
        sin_sum = sin_sum + &weight * &cos[k - j];
        cos_sum = cos_sum + &weight * &sin[k - j];
      }
      sin[k] = &sin_sum / &index(k);
      cos[k] = -(&cos_sum / &index(k));
    }
    (PowerSeries { coefficients: sin }, PowerSeries { coefficients: cos })
  }

  /// `tan(a)`, given `leading = tan(a_0)`, from `tan' = a' (1 + tan^2)`.
  pub fn tan(&self, leading: Number) -> PowerSeries {
    let len = self.coefficients.len();
    let mut result = self.zeroes();
    // secant_squared[m] is the coefficient of t^m in 1 + tan(a)^2.
    let mut secant_squared = Vec::with_capacity(len);
    result[0] = leading;
    secant_squared.push(&Number::one() + &(&result[0] * &result[0]));
    for k in 1..len {
      let sum = (1..=k).fold(Number::zero(), |acc, j| {
        acc + &(&index(j) * &self.coefficients[j]) * &secant_squared[k - j]
      });
      result[k] = &sum / &index(k);
      let square = (0..=k).fold(Number::zero(), |acc, i| acc + &result[i] * &result[k - i]);
      secant_squared.push(square);
    }
    PowerSeries { coefficients: result }
  }
}

impl ops::Add for &PowerSeries {
  type Output = PowerSeries;

  fn add(self, other: &PowerSeries) -> PowerSeries {
    let coefficients = self.coefficients.iter().zip(&other.coefficients).map(|(a, b)| a + b).collect();
    PowerSeries { coefficients }
  }
}

impl ops::Sub for &PowerSeries {
  type Output = PowerSeries;

  fn sub(self, other: &PowerSeries) -> PowerSeries {
    let coefficients = self.coefficients.iter().zip(&other.coefficients).map(|(a, b)| a - b).collect();
    PowerSeries { coefficients }
  }
}

/// Cauchy product, truncated to the common order.
impl ops::Mul for &PowerSeries {
  type Output = PowerSeries;

  fn mul(self, other: &PowerSeries) -> PowerSeries {
    let len = self.coefficients.len().min(other.coefficients.len());
    let coefficients = (0..len)
      .map(|k| (0..=k).fold(Number::zero(), |acc, j| acc + &self.coefficients[j] * &other.coefficients[k - j]))
      .collect();
    PowerSeries { coefficients }
  }
}

impl ops::Neg for &PowerSeries {
  type Output = PowerSeries;

  fn neg(self) -> PowerSeries {
    PowerSeries { coefficients: self.coefficients.iter().map(|c| -c).collect() }
  }
}

impl<'a> SeriesEngine<'a> {
  pub fn new(function_table: &'a FunctionTable, variable: Var, point: Number, order: usize) -> Self {
    Self { variable, point, order, function_table }
  }

  pub fn order(&self) -> usize {
    self.order
  }

  pub fn expand(&self, expr: &Expr) -> Result<PowerSeries, EvaluationError> {
    match expr {
      Expr::Atom(Atom::Number(n)) => Ok(PowerSeries::constant(n.clone(), self.order)),
      Expr::Atom(Atom::Var(v)) if v == &self.variable => Ok(PowerSeries::variable(self.point.clone(), self.order)),
      Expr::Atom(Atom::Var(v)) => Err(EvaluationError::UnboundVariable(v.clone())),
      Expr::Call(function_name, args) => {
        let Some(function) = self.function_table.get(function_name) else {
          return Err(EvaluationError::UnknownFunction(function_name.clone()));
        };
        let args = args.iter()
          .map(|arg| self.expand(arg))
          .collect::<Result<Vec<_>, _>>()?;
        function.expand_series(args, self)
      }
    }
  }

  /// Evaluates a known function on exact arguments, for the constant
  /// terms of composite series. `sin(0)` stays exactly `0` this way.
  pub fn evaluate_exact(&self, function_name: &str, args: Vec<Number>) -> Result<Number, EvaluationError> {
    let Some(function) = self.function_table.get(function_name) else {
      return Err(EvaluationError::UnknownFunction(function_name.to_owned()));
    };
    function.evaluate_exact(args)
  }

  pub fn not_analytic(&self, function_name: &str) -> EvaluationError {
    EvaluationError::NotAnalytic {
      function: function_name.to_owned(),
      point: self.point.clone(),
    }
  }
}

/// The power series of `expr` in `variable - point` up to `t^order`.
pub fn taylor_series(
  function_table: &FunctionTable,
  expr: &Expr,
  variable: &Var,
  point: &Number,
  order: usize,
) -> Result<PowerSeries, EvaluationError> {
  SeriesEngine::new(function_table, variable.clone(), point.clone(), order).expand(expr)
}
