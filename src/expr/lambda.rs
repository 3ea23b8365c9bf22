
//! Compilation of expressions into plain `f64` closures.

use super::Expr;
use super::atom::Atom;
use super::var::Var;
use super::function::EvaluationError;
use super::function::table::FunctionTable;
use crate::sampling::Approximant;

use std::fmt::{self, Debug, Formatter};

type CompiledNode = Box<dyn Fn(f64) -> f64 + Send + Sync>;

/// An expression in one variable, compiled into a numeric function.
///
/// Compilation resolves every function name up front, so calling a
/// `Lambda` cannot fail. Out-of-domain samples produce NaN or
/// infinity, following IEEE semantics.
pub struct Lambda {
  variable: Var,
  body: CompiledNode,
}

impl Lambda {
  pub fn compile(expr: &Expr, variable: &Var, function_table: &FunctionTable) -> Result<Lambda, EvaluationError> {
    let body = compile_node(expr, variable, function_table)?;
    Ok(Lambda { variable: variable.clone(), body })
  }

  pub fn variable(&self) -> &Var {
    &self.variable
  }

  pub fn call(&self, x: f64) -> f64 {
    (self.body)(x)
  }
}

fn compile_node(expr: &Expr, variable: &Var, function_table: &FunctionTable) -> Result<CompiledNode, EvaluationError> {
  match expr {
    Expr::Atom(Atom::Number(n)) => {
      let value = n.to_f64_or_nan();
      Ok(Box::new(move |_| value))
    }
    Expr::Atom(Atom::Var(v)) => {
      if v == variable {
        Ok(Box::new(|x| x))
      } else {
        Err(EvaluationError::UnboundVariable(v.clone()))
      }
    }
    Expr::Call(function_name, args) => {
      let Some(function) = function_table.get(function_name) else {
        return Err(EvaluationError::UnknownFunction(function_name.clone()));
      };
      function.check_arity(args.len())
        .map_err(|err| EvaluationError::ArityError(function_name.clone(), err))?;
      let rule = function.numeric_rule();
      let mut args = args.iter()
        .map(|arg| compile_node(arg, variable, function_table))
        .collect::<Result<Vec<_>, _>>()?;
      // Unary and binary calls are the overwhelming majority, so they
      // skip the argument buffer.
      match args.len() {
        1 => {
          let arg = args.swap_remove(0);
          Ok(Box::new(move |x| rule(&[arg(x)])))
        }
        2 => {
          let right = args.swap_remove(1);
          let left = args.swap_remove(0);
          Ok(Box::new(move |x| rule(&[left(x), right(x)])))
        }
        _ => {
          Ok(Box::new(move |x| {
            let values: Vec<f64> = args.iter().map(|arg| arg(x)).collect();
            rule(&values)
          }))
        }
      }
    }
  }
}

impl Approximant for Lambda {
  fn evaluate_at(&self, x: f64) -> f64 {
    self.call(x)
  }
}

impl Debug for Lambda {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    write!(f, "Lambda {{ variable: {:?}, body: ... }}", self.variable)
  }
}
