
use super::base::Simplifier;
use crate::expr::Expr;
use crate::expr::atom::Atom;
use crate::expr::number::Number;
use crate::expr::function::table::FunctionTable;

use num::{Zero, One};

/// `ArithmeticSimplifier` is a [`Simplifier`] that removes the noise
/// differentiation leaves behind. It never changes the value of an
/// expression.
///
/// ```text
/// +(x, +(y, 0)) ==> +(x, y)
/// *(2, *(3, x), 1) ==> *(6, x)
/// *(0, sin(x)) ==> 0
/// negate(negate(x)) ==> x
/// x^1 ==> x
/// cos(0) ==> 1
/// ```
///
/// A call whose arguments are all numbers is evaluated with the
/// function table, but only when doing so loses no precision: the
/// result must be exact, or one of the arguments must already be
/// inexact. `sin(1)` is therefore left alone.
#[derive(Debug, Clone, Copy)]
pub struct ArithmeticSimplifier<'a> {
  function_table: &'a FunctionTable,
}

impl<'a> ArithmeticSimplifier<'a> {
  pub fn new(function_table: &'a FunctionTable) -> Self {
    Self { function_table }
  }

  fn fold_constant_call(&self, function_name: String, args: Vec<Expr>) -> Expr {
    let Some(numbers) = args.iter().map(Expr::as_number).collect::<Option<Vec<_>>>() else {
      return Expr::Call(function_name, args);
    };
    let Some(function) = self.function_table.get(&function_name) else {
      return Expr::Call(function_name, args);
    };
    let all_exact = numbers.iter().all(|n| n.is_exact());
    let numbers = numbers.into_iter().cloned().collect();
    match function.evaluate_exact(numbers) {
      Ok(value) if value.is_exact() || !all_exact => Expr::from(value),
      _ => Expr::Call(function_name, args),
    }
  }
}

fn flatten_nested(function_name: &str, args: Vec<Expr>) -> Vec<Expr> {
  let mut new_args = Vec::with_capacity(args.len());
  for arg in args {
    match arg {
      Expr::Call(f, sub_args) if f == function_name => {
        new_args.extend(flatten_nested(function_name, sub_args));
      }
      arg => {
        new_args.push(arg);
      }
    }
  }
  new_args
}

/// Splits `args` into the numeric constants (combined with `op`) and
/// the remaining symbolic terms.
fn partition_constants(args: Vec<Expr>, identity: Number, op: impl Fn(Number, Number) -> Number) -> (Number, Vec<Expr>) {
  let mut constant = identity;
  let mut terms = Vec::with_capacity(args.len());
  for arg in args {
    match arg {
      Expr::Atom(Atom::Number(n)) => constant = op(constant, n),
      arg => terms.push(arg),
    }
  }
  (constant, terms)
}

fn simplify_sum(args: Vec<Expr>) -> Expr {
  let (constant, mut terms) = partition_constants(flatten_nested("+", args), Number::zero(), |a, b| a + b);
  if !constant.is_zero() || terms.is_empty() {
    terms.push(Expr::from(constant));
  }
  if terms.len() == 1 {
    terms.swap_remove(0)
  } else {
    Expr::call("+", terms)
  }
}

fn simplify_product(args: Vec<Expr>) -> Expr {
  let (constant, mut factors) = partition_constants(flatten_nested("*", args), Number::one(), |a, b| a * b);
  if constant.is_zero() {
    return Expr::from(constant);
  }
  if !constant.is_one() || factors.is_empty() {
    factors.insert(0, Expr::from(constant));
  }
  if factors.len() == 1 {
    factors.swap_remove(0)
  } else {
    Expr::call("*", factors)
  }
}

fn simplify_negate(arg: Expr) -> Expr {
  match arg {
    Expr::Atom(Atom::Number(n)) => Expr::from(-n),
    Expr::Call(f, mut args) if f == "negate" && args.len() == 1 => args.swap_remove(0),
    Expr::Call(f, mut args) if f == "*" && args.first().and_then(Expr::as_number).is_some() => {
      if let Some(Expr::Atom(Atom::Number(n))) = args.first_mut() {
        *n = - &*n;
      }
      simplify_product(args)
    }
    arg => Expr::call("negate", vec![arg]),
  }
}

impl Simplifier for ArithmeticSimplifier<'_> {
  fn simplify_expr_part(&self, expr: Expr) -> Expr {
    let (function_name, mut args) = match expr {
      Expr::Call(function_name, args) => (function_name, args),
      expr => return expr,
    };
    let expr = match (function_name.as_str(), args.len()) {
      ("+", n) if n > 0 => simplify_sum(args),
      ("*", n) if n > 0 => simplify_product(args),
      ("negate", 1) => simplify_negate(args.swap_remove(0)),
      ("-", 2) => {
        if args[1].is_zero() {
          args.swap_remove(0)
        } else if args[0].is_zero() {
          simplify_negate(args.swap_remove(1))
        } else {
          Expr::Call(function_name, args)
        }
      }
      ("/", 2) => {
        if args[1].is_one() {
          args.swap_remove(0)
        } else if args[0].is_zero() && args[1].as_number().map_or(true, |n| !n.is_zero()) {
          args.swap_remove(0)
        } else {
          Expr::Call(function_name, args)
        }
      }
      ("^", 2) => {
        if args[1].as_number().is_some_and(|n| n.is_exact() && n.is_zero()) {
          Expr::one()
        } else if args[1].is_one() {
          args.swap_remove(0)
        } else {
          Expr::Call(function_name, args)
        }
      }
      _ => Expr::Call(function_name, args),
    };
    match expr {
      Expr::Call(function_name, args) => self.fold_constant_call(function_name, args),
      expr => expr,
    }
  }
}
