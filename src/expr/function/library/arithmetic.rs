
//! Basic arithmetic function evaluation rules.

use crate::expr::Expr;
use crate::expr::function::{Function, EvaluationError};
use crate::expr::function::table::FunctionTable;
use crate::expr::function::builder::{self, Arity, FunctionBuilder};
use crate::expr::calculus::series::{PowerSeries, SeriesEngine};
use crate::expr::number::Number;

use num::{BigInt, Zero, One, Signed};

pub fn append_arithmetic_functions(table: &mut FunctionTable) {
  table.insert(addition());
  table.insert(subtraction());
  table.insert(multiplication());
  table.insert(division());
  table.insert(power());
  table.insert(arithmetic_negate());
}

pub fn addition() -> Function {
  FunctionBuilder::new("+")
    .arity(Arity::AtLeast(1))
    .set_exact(|args| {
      Ok(Some(args.iter().fold(Number::zero(), |acc, arg| acc + arg.clone())))
    })
    .set_numeric(|args| args.iter().sum())
    .set_derivative(|args, engine| {
      let derivs = args.into_iter()
        .map(|arg| engine.differentiate(arg))
        .collect::<Result<Vec<_>, _>>()?;
      Ok(Expr::call("+", derivs))
    })
    .set_series(|args, engine| {
      let sum = args.into_iter().reduce(|acc, arg| &acc + &arg);
      Ok(sum.unwrap_or_else(|| PowerSeries::constant(Number::zero(), engine.order())))
    })
    .build()
}

pub fn subtraction() -> Function {
  FunctionBuilder::new("-")
    .arity(Arity::Exactly(2))
    .set_exact(|args| Ok(Some(&args[0] - &args[1])))
    .set_numeric(|args| args[0] - args[1])
    .set_derivative(
      builder::arity_two_deriv("-", |left, right, engine| {
        Ok(Expr::call("-", vec![
          engine.differentiate(left)?,
          engine.differentiate(right)?,
        ]))
      })
    )
    .set_series(builder::arity_two_series("-", |left, right, _| Ok(&left - &right)))
    .build()
}

pub fn multiplication() -> Function {
  FunctionBuilder::new("*")
    .arity(Arity::AtLeast(1))
    .set_exact(|args| {
      Ok(Some(args.iter().fold(Number::one(), |acc, arg| acc * arg.clone())))
    })
    .set_numeric(|args| args.iter().product())
    .set_derivative(|args, engine| {
      // Product rule: one term per non-constant factor, with that
      // factor replaced by its derivative.
      let mut terms = Vec::with_capacity(args.len());
      for (i, arg) in args.iter().enumerate() {
        if engine.is_constant(arg) {
          continue;
        }
        let mut factors = args.clone();
        factors[i] = engine.differentiate(arg.clone())?;
        terms.push(Expr::call("*", factors));
      }
      if terms.is_empty() {
        Ok(Expr::zero())
      } else {
        Ok(Expr::call("+", terms))
      }
    })
    .set_series(|args, engine| {
      let product = args.into_iter().reduce(|acc, arg| &acc * &arg);
      Ok(product.unwrap_or_else(|| PowerSeries::constant(Number::one(), engine.order())))
    })
    .build()
}

pub fn division() -> Function {
  FunctionBuilder::new("/")
    .arity(Arity::Exactly(2))
    .set_exact(|args| {
      args[0].checked_div(&args[1])
        .map(Some)
        .ok_or(EvaluationError::DivisionByZero)
    })
    .set_numeric(|args| args[0] / args[1])
    .set_derivative(
      builder::arity_two_deriv("/", |numer, denom, engine| {
        // Quotient rule: (n' d - n d') / d^2
        let numer_deriv = engine.differentiate(numer.clone())?;
        let denom_deriv = engine.differentiate(denom.clone())?;
        Ok(Expr::call("/", vec![
          Expr::call("-", vec![
            Expr::call("*", vec![numer_deriv, denom.clone()]),
            Expr::call("*", vec![numer, denom_deriv]),
          ]),
          Expr::call("^", vec![denom, Expr::from(2)]),
        ]))
      })
    )
    .set_series(builder::arity_two_series("/", |numer, denom, _| {
      numer.checked_div(&denom).ok_or(EvaluationError::DivisionByZero)
    }))
    .build()
}

pub fn power() -> Function {
  FunctionBuilder::new("^")
    .arity(Arity::Exactly(2))
    .set_exact(|args| {
      let (base, exponent) = (&args[0], &args[1]);
      if let Some(exponent) = exponent.to_integer() {
        if base.is_exact() && base.is_zero() && exponent.is_negative() {
          return Err(EvaluationError::DivisionByZero);
        }
        return Ok(Some(base.powi(exponent)));
      }
      if *exponent == Number::ratio(1, 2) && exponent.is_exact() {
        return Ok(base.exact_sqrt());
      }
      Ok(None)
    })
    .set_numeric(|args| args[0].powf(args[1]))
    .set_derivative(
      builder::arity_two_deriv("^", |base, exponent, engine| {
        let base_deriv = engine.differentiate(base.clone())?;
        if engine.is_constant(&exponent) {
          // Power rule: e * b^(e - 1) * b'
          Ok(Expr::call("*", vec![
            exponent.clone(),
            Expr::call("^", vec![base, Expr::call("-", vec![exponent, Expr::one()])]),
            base_deriv,
          ]))
        } else {
          // General case: b^e * (e' ln(b) + e b' / b)
          let exponent_deriv = engine.differentiate(exponent.clone())?;
          Ok(Expr::call("*", vec![
            Expr::call("^", vec![base.clone(), exponent.clone()]),
            Expr::call("+", vec![
              Expr::call("*", vec![exponent_deriv, Expr::call("ln", vec![base.clone()])]),
              Expr::call("/", vec![Expr::call("*", vec![exponent, base_deriv]), base]),
            ]),
          ]))
        }
      })
    )
    .set_series(builder::arity_two_series("^", power_series))
    .build()
}

fn power_series(base: PowerSeries, exponent: PowerSeries, engine: &SeriesEngine) -> Result<PowerSeries, EvaluationError> {
  if !exponent.is_constant() {
    // b^e = exp(e ln(b))
    let log_leading = engine.evaluate_exact("ln", vec![base.constant_term().clone()])?;
    let log = base.ln(log_leading).ok_or_else(|| engine.not_analytic("^"))?;
    let product = &exponent * &log;
    let leading = engine.evaluate_exact("exp", vec![product.constant_term().clone()])?;
    return Ok(product.exp(leading));
  }
  let exponent = exponent.constant_term();
  if let Some(n) = exponent.to_integer() {
    return base.powi(&n).ok_or(EvaluationError::DivisionByZero);
  }
  if let Some(n) = exponent.to_f64().filter(|f| f.fract() == 0.0 && f.abs() < 1e15) {
    // Integral float exponent: same series, but inexact.
    let power = base.powi(&BigInt::from(n as i64)).ok_or(EvaluationError::DivisionByZero)?;
    return Ok(power.scale(&Number::from(1.0)));
  }
  let leading = engine.evaluate_exact("^", vec![base.constant_term().clone(), exponent.clone()])?;
  base.powf(exponent, leading).ok_or_else(|| engine.not_analytic("^"))
}

pub fn arithmetic_negate() -> Function {
  FunctionBuilder::new("negate")
    .set_exact(|args| Ok(Some(- &args[0])))
    .set_numeric(|args| - args[0])
    .set_derivative(
      builder::arity_one_deriv("negate", |arg, engine| {
        Ok(Expr::call("negate", vec![engine.differentiate(arg)?]))
      })
    )
    .set_series(builder::arity_one_series("negate", |arg, _| Ok(-&arg)))
    .build()
}
