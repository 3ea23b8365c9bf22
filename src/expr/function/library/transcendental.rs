
//! Evaluation rules for transcendental and trigonometric functions.
//!
//! Each function is exact only at the handful of arguments where its
//! value is rational (`sin(0)`, `exp(0)`, `ln(1)`, ...). Everywhere
//! else it falls back to floating point. The series rules take their
//! constant terms from the same exact rules.

use crate::expr::Expr;
use crate::expr::function::Function;
use crate::expr::function::table::FunctionTable;
use crate::expr::function::builder::{self, FunctionBuilder};
use crate::expr::calculus::series::{PowerSeries, SeriesEngine};
use crate::expr::function::EvaluationError;
use crate::expr::number::Number;

use num::{Zero, One};

pub fn append_transcendental_functions(table: &mut FunctionTable) {
  table.insert(sine());
  table.insert(cosine());
  table.insert(tangent());
  table.insert(exponent());
  table.insert(natural_log());
  table.insert(square_root());
}

fn is_exact_zero(n: &Number) -> bool {
  n.is_exact() && n.is_zero()
}

fn leading_value(function_name: &str, arg: &PowerSeries, engine: &SeriesEngine) -> Result<Number, EvaluationError> {
  engine.evaluate_exact(function_name, vec![arg.constant_term().clone()])
}

fn sine_and_cosine(arg: &PowerSeries, engine: &SeriesEngine) -> Result<(PowerSeries, PowerSeries), EvaluationError> {
  let sin_leading = leading_value("sin", arg, engine)?;
  let cos_leading = leading_value("cos", arg, engine)?;
  Ok(arg.sin_cos(sin_leading, cos_leading))
}

pub fn sine() -> Function {
  FunctionBuilder::new("sin")
    .set_exact(|args| Ok(is_exact_zero(&args[0]).then(Number::zero)))
    .set_numeric(|args| args[0].sin())
    .set_derivative(
      builder::arity_one_deriv("sin", |arg, engine| {
        let arg_deriv = engine.differentiate(arg.clone())?;
        Ok(Expr::call("*", vec![
          Expr::call("cos", vec![arg]),
          arg_deriv,
        ]))
      })
    )
    .set_series(builder::arity_one_series("sin", |arg, engine| Ok(sine_and_cosine(&arg, engine)?.0)))
    .build()
}

pub fn cosine() -> Function {
  FunctionBuilder::new("cos")
    .set_exact(|args| Ok(is_exact_zero(&args[0]).then(Number::one)))
    .set_numeric(|args| args[0].cos())
    .set_derivative(
      builder::arity_one_deriv("cos", |arg, engine| {
        let arg_deriv = engine.differentiate(arg.clone())?;
        Ok(Expr::call("*", vec![
          Expr::call("negate", vec![Expr::call("sin", vec![arg])]),
          arg_deriv,
        ]))
      })
    )
    .set_series(builder::arity_one_series("cos", |arg, engine| Ok(sine_and_cosine(&arg, engine)?.1)))
    .build()
}

pub fn tangent() -> Function {
  FunctionBuilder::new("tan")
    .set_exact(|args| Ok(is_exact_zero(&args[0]).then(Number::zero)))
    .set_numeric(|args| args[0].tan())
    .set_derivative(
      builder::arity_one_deriv("tan", |arg, engine| {
        let arg_deriv = engine.differentiate(arg.clone())?;
        Ok(Expr::call("/", vec![
          arg_deriv,
          Expr::call("^", vec![Expr::call("cos", vec![arg]), Expr::from(2)]),
        ]))
      })
    )
    .set_series(builder::arity_one_series("tan", |arg, engine| {
      Ok(arg.tan(leading_value("tan", &arg, engine)?))
    }))
    .build()
}

pub fn exponent() -> Function {
  FunctionBuilder::new("exp")
    .set_exact(|args| Ok(is_exact_zero(&args[0]).then(Number::one)))
    .set_numeric(|args| args[0].exp())
    .set_derivative(
      builder::arity_one_deriv("exp", |arg, engine| {
        let arg_deriv = engine.differentiate(arg.clone())?;
        Ok(Expr::call("*", vec![
          arg_deriv,
          Expr::call("exp", vec![arg]),
        ]))
      })
    )
    .set_series(builder::arity_one_series("exp", |arg, engine| {
      Ok(arg.exp(leading_value("exp", &arg, engine)?))
    }))
    .build()
}

pub fn natural_log() -> Function {
  FunctionBuilder::new("ln")
    .set_exact(|args| Ok((args[0].is_exact() && args[0].is_one()).then(Number::zero)))
    .set_numeric(|args| args[0].ln())
    .set_derivative(
      builder::arity_one_deriv("ln", |arg, engine| {
        let arg_deriv = engine.differentiate(arg.clone())?;
        Ok(Expr::call("/", vec![arg_deriv, arg]))
      })
    )
    .set_series(builder::arity_one_series("ln", |arg, engine| {
      let leading = leading_value("ln", &arg, engine)?;
      arg.ln(leading).ok_or_else(|| engine.not_analytic("ln"))
    }))
    .build()
}

pub fn square_root() -> Function {
  FunctionBuilder::new("sqrt")
    .set_exact(|args| Ok(args[0].exact_sqrt()))
    .set_numeric(|args| args[0].sqrt())
    .set_derivative(
      builder::arity_one_deriv("sqrt", |arg, engine| {
        let arg_deriv = engine.differentiate(arg.clone())?;
        Ok(Expr::call("/", vec![
          arg_deriv,
          Expr::call("*", vec![Expr::from(2), Expr::call("sqrt", vec![arg])]),
        ]))
      })
    )
    .set_series(builder::arity_one_series("sqrt", |arg, engine| {
      let leading = leading_value("sqrt", &arg, engine)?;
      arg.sqrt(leading).ok_or_else(|| engine.not_analytic("sqrt"))
    }))
    .build()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::assert_strict_eq;

  use approx::assert_abs_diff_eq;

  #[test]
  fn test_exact_special_values() {
    assert_strict_eq!(sine().evaluate_exact(vec![Number::from(0)]).unwrap(), Number::from(0));
    assert_strict_eq!(cosine().evaluate_exact(vec![Number::from(0)]).unwrap(), Number::from(1));
    assert_strict_eq!(tangent().evaluate_exact(vec![Number::from(0)]).unwrap(), Number::from(0));
    assert_strict_eq!(exponent().evaluate_exact(vec![Number::from(0)]).unwrap(), Number::from(1));
    assert_strict_eq!(natural_log().evaluate_exact(vec![Number::from(1)]).unwrap(), Number::from(0));
    assert_strict_eq!(square_root().evaluate_exact(vec![Number::ratio(4, 9)]).unwrap(), Number::ratio(2, 3));
  }

  #[test]
  fn test_inexact_fallback() {
    let value = sine().evaluate_exact(vec![Number::ratio(1, 2)]).unwrap();
    assert!(!value.is_exact());
    assert_abs_diff_eq!(value, Number::from(0.5f64.sin()), epsilon = 1e-15);
    let value = cosine().evaluate_exact(vec![Number::from(0.0)]).unwrap();
    assert_strict_eq!(value, Number::from(1.0));
  }

  #[test]
  fn test_outside_domain() {
    assert!(matches!(
      natural_log().evaluate_exact(vec![Number::from(0)]),
      Err(EvaluationError::Undefined { .. }),
    ));
    assert!(matches!(
      square_root().evaluate_exact(vec![Number::from(-1)]),
      Err(EvaluationError::Undefined { .. }),
    ));
  }
}
